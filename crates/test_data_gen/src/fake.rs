//! Random field choices for fixture schemas.
//!
//! Pools of realistic field names paired with the catalog generators that
//! fill them, plus enum value sets and reference dates.

use crate::schema::{Field, FieldKind};
use chrono::NaiveDate;
use rand::Rng;

/// String fields and the generator that fills them
const STRING_FIELDS: &[(&str, &str)] = &[
    ("firstName", "person.firstName"),
    ("lastName", "person.lastName"),
    ("fullName", "person.fullName"),
    ("jobTitle", "person.jobTitle"),
    ("email", "internet.email"),
    ("username", "internet.userName"),
    ("website", "internet.url"),
    ("ipAddress", "internet.ipv4"),
    ("phone", "phone.number"),
    ("company", "company.name"),
    ("slogan", "company.catchPhrase"),
    ("city", "location.city"),
    ("state", "location.state"),
    ("street", "location.streetAddress"),
    ("zipCode", "location.zipCode"),
    ("country", "location.country"),
    ("title", "lorem.sentence"),
    ("summary", "lorem.paragraph"),
    ("slug", "lorem.slug"),
    ("sku", "string.alphanumeric"),
    ("reference", "string.uuid"),
    ("productName", "commerce.productName"),
    ("department", "commerce.department"),
    ("currency", "finance.currencyCode"),
    ("iban", "finance.iban"),
    ("createdAt", "date.past"),
    ("updatedAt", "date.recent"),
    ("dueAt", "date.future"),
    ("birthdate", "date.birthdate"),
];

/// Numeric fields with their bounds
const NUMBER_FIELDS: &[(&str, f64, f64)] = &[
    ("price", 1.0, 500.0),
    ("weight", 0.1, 40.0),
    ("rating", 1.0, 5.0),
    ("discount", 0.0, 0.5),
    ("latitude", -90.0, 90.0),
];

const INTEGER_FIELDS: &[(&str, i64, i64)] = &[
    ("quantity", 1, 20),
    ("stock", 0, 1000),
    ("age", 18, 90),
    ("priority", 1, 5),
    ("views", 0, 100_000),
];

const BOOLEAN_FIELDS: &[&str] = &["active", "verified", "archived", "featured", "published"];

/// Enum fields and their value sets
const ENUM_FIELDS: &[(&str, &[&str])] = &[
    (
        "status",
        &["pending", "confirmed", "processing", "shipped", "delivered", "cancelled"],
    ),
    ("role", &["admin", "manager", "editor", "viewer", "member", "guest"]),
    ("plan", &["free", "starter", "pro", "enterprise"]),
    ("visibility", &["public", "private", "internal"]),
];

/// Seeded source of fixture field choices
pub struct FakeData<R: Rng> {
    rng: R,
}

impl<R: Rng> FakeData<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    fn pick<T: Copy>(&mut self, items: &[T]) -> T {
        items[self.rng.random_range(0..items.len())]
    }

    pub fn string_field(&mut self) -> Field {
        let (name, faker) = self.pick(STRING_FIELDS);
        if faker.starts_with("date.") {
            let ref_date = self.ref_date();
            return Field::new(
                name,
                FieldKind::Dated {
                    faker: faker.to_string(),
                    ref_date,
                },
            );
        }
        Field::new(name, FieldKind::generated("string", faker))
    }

    pub fn number_field(&mut self) -> Field {
        let (name, min, max) = self.pick(NUMBER_FIELDS);
        Field::new(name, FieldKind::Number { min, max })
    }

    pub fn integer_field(&mut self) -> Field {
        let (name, min, max) = self.pick(INTEGER_FIELDS);
        Field::new(name, FieldKind::Integer { min, max })
    }

    pub fn boolean_field(&mut self) -> Field {
        Field::new(self.pick(BOOLEAN_FIELDS), FieldKind::Boolean)
    }

    pub fn enum_field(&mut self) -> Field {
        let (name, values) = self.pick(ENUM_FIELDS);
        Field::new(
            name,
            FieldKind::Enum(values.iter().map(|v| v.to_string()).collect()),
        )
    }

    /// Any primitive field, weighted towards generated strings
    pub fn primitive_field(&mut self) -> Field {
        match self.rng.random_range(0..10) {
            0..=4 => self.string_field(),
            5 => self.number_field(),
            6 => self.integer_field(),
            7 => self.boolean_field(),
            _ => self.enum_field(),
        }
    }

    /// Null percentage for an optional relationship
    pub fn null_percentage(&mut self) -> u8 {
        self.pick(&[0u8, 5, 10, 10, 25, 50])
    }

    /// Array bounds with `min <= max`
    pub fn item_bounds(&mut self, max_cap: usize) -> (usize, usize) {
        let min = self.rng.random_range(0..=max_cap / 2);
        let max = self.rng.random_range(min.max(1)..=max_cap.max(1));
        (min, max)
    }

    /// RFC 3339 reference date between 2020 and 2024
    pub fn ref_date(&mut self) -> String {
        let year = self.rng.random_range(2020..=2024);
        let month = self.rng.random_range(1..=12);
        let day = self.rng.random_range(1..=28);
        match NaiveDate::from_ymd_opt(year, month, day) {
            Some(date) => format!("{}T00:00:00Z", date.format("%Y-%m-%d")),
            None => "2024-01-01T00:00:00Z".to_string(),
        }
    }

    pub fn seed(&mut self) -> u64 {
        self.rng.random_range(0..1_000_000)
    }
}
