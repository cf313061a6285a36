//! Content generator catalog.
//!
//! A static registry mapping dotted `namespace.method` references (the
//! `faker` key of a schema property) to generator functions:
//! - `person.*`, `internet.*`, `phone.*`, `company.*`, `location.*`
//! - `lorem.*`, `word.*`, `string.*`
//! - `number.*`, `datatype.*`, `commerce.*`, `finance.*`, `helpers.*`
//! - `date.*`
//!
//! Lookups never fail: an unknown reference yields the field's default
//! value, or null.

mod numeric;
mod params;
mod people;
mod temporal;
mod text;

pub use params::{decorate, GeneratorParams, Param};

use ahash::AHashMap;
use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use serde_json::Value;
use tracing::debug;

/// Signature shared by all generators.
pub type GeneratorFn = fn(&mut StdRng, &GeneratorParams) -> Value;

const NONE: &[Param] = &[];
const BOUNDS: &[Param] = &[Param::Bounds];
const LENGTH: &[Param] = &[Param::Length];
const STRING: &[Param] = &[Param::Affix, Param::Casing];
const STRING_LENGTH: &[Param] = &[Param::Length, Param::Affix, Param::Casing];

#[derive(Clone, Copy)]
struct Entry {
    accepts: &'static [Param],
    run: GeneratorFn,
}

static BUILTIN: Lazy<GeneratorCatalog> = Lazy::new(GeneratorCatalog::builtin);

/// Registry of named generators.
pub struct GeneratorCatalog {
    entries: AHashMap<&'static str, Entry>,
}

impl GeneratorCatalog {
    /// The built-in catalog, constructed on first use.
    pub fn global() -> &'static GeneratorCatalog {
        &BUILTIN
    }

    fn builtin() -> Self {
        let mut catalog = Self {
            entries: AHashMap::new(),
        };

        // person
        catalog.register("person.firstName", STRING, people::first_name);
        catalog.register("person.lastName", STRING, people::last_name);
        catalog.register("person.fullName", STRING, people::full_name);
        catalog.register("person.jobTitle", STRING, people::job_title);

        // internet
        catalog.register("internet.email", STRING, people::email);
        catalog.register("internet.userName", STRING, people::username);
        catalog.register("internet.domainName", STRING, people::domain_name);
        catalog.register("internet.url", NONE, people::url);
        catalog.register("internet.ipv4", NONE, people::ipv4);
        catalog.register("internet.ipv6", NONE, people::ipv6);
        catalog.register("internet.password", LENGTH, people::password);

        // phone, company, location
        catalog.register("phone.number", NONE, people::phone_number);
        catalog.register("company.name", STRING, people::company_name);
        catalog.register("company.catchPhrase", STRING, people::catch_phrase);
        catalog.register("location.city", STRING, people::city);
        catalog.register("location.state", STRING, people::state);
        catalog.register("location.street", STRING, people::street);
        catalog.register("location.streetAddress", STRING, people::street_address);
        catalog.register("location.zipCode", NONE, people::zip_code);
        catalog.register("location.country", STRING, people::country);
        catalog.register("location.latitude", BOUNDS, people::latitude);
        catalog.register("location.longitude", BOUNDS, people::longitude);

        // text
        catalog.register("lorem.word", STRING_LENGTH, text::word);
        catalog.register("lorem.words", STRING, text::words);
        catalog.register("lorem.sentence", STRING, text::sentence);
        catalog.register("lorem.paragraph", STRING, text::paragraph);
        catalog.register("lorem.slug", STRING, text::slug);
        catalog.register("word.sample", STRING_LENGTH, text::word);
        catalog.register("string.uuid", STRING, text::uuid);
        catalog.register("string.alpha", STRING_LENGTH, text::alpha);
        catalog.register("string.alphanumeric", STRING_LENGTH, text::alphanumeric);
        catalog.register("string.numeric", STRING_LENGTH, text::numeric);
        catalog.register("string.hexadecimal", STRING_LENGTH, text::hexadecimal);

        // numbers
        catalog.register("number.int", BOUNDS, numeric::int);
        catalog.register("number.float", BOUNDS, numeric::float);
        catalog.register("datatype.boolean", NONE, numeric::boolean);
        catalog.register("commerce.price", BOUNDS, numeric::price);
        catalog.register("commerce.productName", STRING, numeric::product_name);
        catalog.register("commerce.department", STRING, numeric::department);
        catalog.register("finance.amount", BOUNDS, numeric::amount);
        catalog.register("finance.currencyCode", NONE, numeric::currency_code);
        catalog.register("finance.iban", NONE, numeric::iban);
        catalog.register(
            "finance.creditCardNumber",
            NONE,
            numeric::credit_card_number,
        );
        catalog.register("helpers.arrayElement", NONE, numeric::array_element);

        // dates
        catalog.register("date.past", NONE, temporal::past);
        catalog.register("date.future", NONE, temporal::future);
        catalog.register("date.recent", NONE, temporal::recent);
        catalog.register("date.soon", NONE, temporal::soon);
        catalog.register("date.anytime", NONE, temporal::anytime);
        catalog.register("date.birthdate", BOUNDS, temporal::birthdate);

        catalog
    }

    fn register(&mut self, name: &'static str, accepts: &'static [Param], run: GeneratorFn) {
        self.entries.insert(name, Entry { accepts, run });
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// All registered references, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.entries.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Parameter groups a generator accepts, if it exists.
    pub fn accepts(&self, name: &str) -> Option<&'static [Param]> {
        self.entries.get(name).map(|e| e.accepts)
    }

    /// Generate one value.
    ///
    /// Known references run with the subset of `params` they accept; string
    /// results then get casing and prefix/suffix. Unknown or absent
    /// references return `default`, else null.
    pub fn generate(
        &self,
        generator_ref: Option<&str>,
        params: &GeneratorParams,
        default: Option<&Value>,
        rng: &mut StdRng,
    ) -> Value {
        let entry = match generator_ref.and_then(|name| self.entries.get(name)) {
            Some(entry) => entry,
            None => {
                if let Some(name) = generator_ref {
                    debug!(generator = name, "unknown generator, using default");
                }
                return default.cloned().unwrap_or(Value::Null);
            }
        };

        let accepted = params.restrict(entry.accepts);
        match (entry.run)(rng, &accepted) {
            Value::String(s) => Value::String(decorate(s, &accepted, rng)),
            other => other,
        }
    }
}
