//! Fixture project generator.
//!
//! Builds a deterministic shop-like project: lookup endpoints with no
//! relationships, endpoints pointing at them, and detail endpoints with
//! master-detail links, nested objects and arrays of related items.

use crate::fake::FakeData;
use crate::schema::{EndpointDef, Field, FieldKind, ProjectDef};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generation scale presets
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scale {
    /// A handful of records per endpoint
    Small,
    /// ~1,000 records in total
    Medium,
    /// ~50,000 records in total
    Large,
    /// ~250,000 records in total (for throughput testing)
    XLarge,
}

impl Scale {
    /// Records requested for endpoints without master-detail links
    pub fn base_count(&self) -> usize {
        match self {
            Scale::Small => 5,
            Scale::Medium => 50,
            Scale::Large => 500,
            Scale::XLarge => 2000,
        }
    }

    /// Records requested per parent for master-detail endpoints
    pub fn detail_count(&self) -> usize {
        match self {
            Scale::Small => 2,
            Scale::Medium => 3,
            Scale::Large => 10,
            Scale::XLarge => 25,
        }
    }

    /// Extra random primitive fields per endpoint
    pub fn extra_fields(&self) -> usize {
        match self {
            Scale::Small => 2,
            Scale::Medium => 4,
            Scale::Large => 8,
            Scale::XLarge => 12,
        }
    }

    /// Upper bound for array sizes
    pub fn max_items(&self) -> usize {
        match self {
            Scale::Small => 3,
            Scale::Medium => 5,
            Scale::Large => 8,
            Scale::XLarge => 10,
        }
    }
}

impl std::str::FromStr for Scale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "small" | "s" => Ok(Scale::Small),
            "medium" | "m" => Ok(Scale::Medium),
            "large" | "l" => Ok(Scale::Large),
            "xlarge" | "xl" | "x" => Ok(Scale::XLarge),
            _ => Err(format!(
                "Unknown scale: {}. Use small, medium, large, or xlarge",
                s
            )),
        }
    }
}

/// Main fixture generator
pub struct Generator {
    rng: StdRng,
    scale: Scale,
    fake: FakeData<StdRng>,
}

impl Generator {
    pub fn new(seed: u64, scale: Scale) -> Self {
        let rng = StdRng::seed_from_u64(seed);
        let fake_rng = StdRng::seed_from_u64(seed.wrapping_add(1));
        Self {
            rng,
            scale,
            fake: FakeData::new(fake_rng),
        }
    }

    /// Generate the standard shop project
    pub fn generate(&mut self) -> ProjectDef {
        let mut project = ProjectDef::new("shop");

        // Lookups first, detail endpoints last; the order in the file is
        // shuffled so consumers have to sort by dependency themselves.
        let mut endpoints = vec![
            self.categories(),
            self.customers(),
            self.products(),
            self.orders(),
            self.reviews(),
            self.drafts(),
        ];
        let rotate = self.rng.random_range(0..endpoints.len());
        endpoints.rotate_left(rotate);

        for endpoint in endpoints {
            project.add_endpoint(endpoint);
        }
        project
    }

    /// A single standalone record schema with `fields` primitive fields,
    /// one nested object and one array
    pub fn record_schema(&mut self, fields: usize) -> serde_json::Value {
        let mut endpoint = EndpointDef::new("records")
            .field(Field::new("id", FieldKind::generated("string", "string.uuid")).required());
        endpoint = self.with_extra_fields(endpoint, fields);

        let address = self.nested_fields(3);
        let (min_items, max_items) = self.fake.item_bounds(self.scale.max_items());
        endpoint
            .field(Field::new("address", FieldKind::Object(address)))
            .field(Field::new(
                "tags",
                FieldKind::Array {
                    item: Box::new(FieldKind::Text { length: Some(6) }),
                    min_items,
                    max_items,
                },
            ))
            .schema()
    }

    fn with_extra_fields(&mut self, mut endpoint: EndpointDef, count: usize) -> EndpointDef {
        let mut added = 0;
        let mut attempts = 0;
        while added < count && attempts < count * 10 {
            attempts += 1;
            let field = self.fake.primitive_field();
            if endpoint.fields.iter().any(|f| f.name == field.name) {
                continue;
            }
            endpoint = endpoint.field(field);
            added += 1;
        }
        endpoint
    }

    fn nested_fields(&mut self, count: usize) -> Vec<Field> {
        let mut fields: Vec<Field> = Vec::with_capacity(count);
        for _ in 0..count * 10 {
            if fields.len() == count {
                break;
            }
            let field = self.fake.string_field();
            if !fields.iter().any(|f| f.name == field.name) {
                fields.push(field);
            }
        }
        fields
    }

    fn seeded(&mut self, endpoint: EndpointDef) -> EndpointDef {
        let seed = self.fake.seed();
        endpoint.faker_seed(seed)
    }

    fn categories(&mut self) -> EndpointDef {
        let endpoint = EndpointDef::new("categories")
            .mock_count(self.scale.base_count().min(20))
            .field(Field::new("id", FieldKind::generated("string", "string.uuid")).required())
            .field(Field::new("name", FieldKind::generated("string", "commerce.department")))
            .field(Field::new("code", FieldKind::Text { length: Some(4) }));
        self.seeded(endpoint)
    }

    fn customers(&mut self) -> EndpointDef {
        let endpoint = EndpointDef::new("customers")
            .mock_count(self.scale.base_count())
            .field(Field::new("id", FieldKind::generated("string", "string.uuid")).required())
            .field(Field::new("name", FieldKind::generated("string", "person.fullName")))
            .field(Field::new("email", FieldKind::generated("string", "internet.email")));
        let endpoint = self.with_extra_fields(endpoint, self.scale.extra_fields());
        let address = self.nested_fields(3);
        let endpoint = endpoint.field(Field::new("address", FieldKind::Object(address)));
        self.seeded(endpoint)
    }

    fn products(&mut self) -> EndpointDef {
        let null_percentage = self.fake.null_percentage();
        let endpoint = EndpointDef::new("products")
            .mock_count(self.scale.base_count())
            .field(Field::new("id", FieldKind::generated("string", "string.uuid")).required())
            .field(Field::new("name", FieldKind::generated("string", "commerce.productName")))
            .field(Field::new("price", FieldKind::Number { min: 1.0, max: 999.0 }))
            .field(Field::new(
                "categoryId",
                FieldKind::relationship("categories", false, null_percentage),
            ));
        let endpoint = self.with_extra_fields(endpoint, self.scale.extra_fields());
        self.seeded(endpoint)
    }

    fn orders(&mut self) -> EndpointDef {
        let null_percentage = self.fake.null_percentage();
        let (min_items, max_items) = self.fake.item_bounds(self.scale.max_items());
        let line = FieldKind::Object(vec![
            Field::new(
                "productId",
                FieldKind::relationship("products", false, null_percentage),
            ),
            Field::new("quantity", FieldKind::Integer { min: 1, max: 10 }),
        ]);
        let endpoint = EndpointDef::new("orders")
            .mock_count(self.scale.detail_count())
            .field(Field::new("id", FieldKind::generated("string", "string.uuid")).required())
            .field(
                Field::new(
                    "customerId",
                    FieldKind::relationship("customers", true, 0),
                )
                .required(),
            )
            .field(Field::new(
                "status",
                FieldKind::Enum(vec![
                    "pending".to_string(),
                    "shipped".to_string(),
                    "delivered".to_string(),
                ]),
            ))
            .field(Field::new(
                "lines",
                FieldKind::Array {
                    item: Box::new(line),
                    min_items,
                    max_items,
                },
            ));
        self.seeded(endpoint)
    }

    fn reviews(&mut self) -> EndpointDef {
        let null_percentage = self.fake.null_percentage();
        let endpoint = EndpointDef::new("reviews")
            .mock_count(self.scale.detail_count())
            .field(Field::new("productId", FieldKind::relationship("products", true, 0)))
            .field(Field::new(
                "authorId",
                FieldKind::relationship("customers", false, null_percentage),
            ))
            .field(Field::new("rating", FieldKind::Integer { min: 1, max: 5 }))
            .field(Field::new("body", FieldKind::generated("string", "lorem.paragraph")));
        self.seeded(endpoint)
    }

    fn drafts(&mut self) -> EndpointDef {
        EndpointDef::new("drafts")
            .disabled()
            .field(Field::new("title", FieldKind::Text { length: None }))
    }
}
