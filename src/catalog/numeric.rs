//! Numeric, boolean, commerce and finance generators.

use super::params::{uniform_f64, GeneratorParams};
use rand::rngs::StdRng;
use rand::Rng;
use serde_json::{Number, Value};

const PRODUCT_ADJECTIVES: &[&str] = &[
    "Premium", "Pro", "Ultra", "Super", "Mega", "Mini", "Lite", "Plus", "Max", "Elite", "Advanced",
    "Basic", "Standard", "Classic", "Modern", "Smart", "Quick", "Easy", "Fast",
];

const PRODUCT_NOUNS: &[&str] = &[
    "Widget",
    "Gadget",
    "Device",
    "Tool",
    "Kit",
    "Pack",
    "Set",
    "Bundle",
    "System",
    "Module",
    "Component",
    "Unit",
    "Platform",
    "Service",
    "Package",
];

const DEPARTMENTS: &[&str] = &[
    "Electronics",
    "Clothing",
    "Home & Garden",
    "Sports",
    "Books",
    "Toys",
    "Food & Beverage",
    "Health",
    "Beauty",
    "Automotive",
    "Office",
    "Pet Supplies",
    "Music",
    "Movies",
    "Software",
];

const CURRENCY_CODES: &[&str] = &["USD", "EUR", "GBP", "JPY", "CHF", "CAD", "AUD", "SEK", "NOK"];

/// Round to `precision` decimals without leaving `[lo, hi]`.
fn round_within(value: f64, precision: usize, lo: f64, hi: f64) -> Value {
    let factor = 10f64.powi(precision.min(12) as i32);
    let rounded = (value * factor).round() / factor;
    // Scaling can overflow near f64::MAX; keep the unrounded draw then.
    let rounded = if rounded.is_finite() { rounded.clamp(lo, hi) } else { value };
    Number::from_f64(rounded)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

pub fn int(rng: &mut StdRng, params: &GeneratorParams) -> Value {
    let (lo, hi) = params.int_bounds();
    Value::from(rng.random_range(lo..=hi))
}

pub fn float(rng: &mut StdRng, params: &GeneratorParams) -> Value {
    let (lo, hi) = params.float_bounds();
    let precision = params.extra_usize("precision").unwrap_or(2);
    match uniform_f64(rng, lo, hi) {
        Some(v) => round_within(v, precision, lo, hi),
        None => Value::Null,
    }
}

pub fn boolean(rng: &mut StdRng, params: &GeneratorParams) -> Value {
    let p = params.extra_f64("probability").unwrap_or(0.5).clamp(0.0, 1.0);
    Value::Bool(rng.random_bool(p))
}

pub fn price(rng: &mut StdRng, params: &GeneratorParams) -> Value {
    let lo = params.min.unwrap_or(1.0);
    let hi = params.max.unwrap_or(1000.0).max(lo);
    match uniform_f64(rng, lo, hi) {
        Some(v) => round_within(v, 2, lo, hi),
        None => Value::Null,
    }
}

pub fn product_name(rng: &mut StdRng, _params: &GeneratorParams) -> Value {
    let adj = PRODUCT_ADJECTIVES[rng.random_range(0..PRODUCT_ADJECTIVES.len())];
    let noun = PRODUCT_NOUNS[rng.random_range(0..PRODUCT_NOUNS.len())];
    Value::String(format!("{} {}", adj, noun))
}

pub fn department(rng: &mut StdRng, _params: &GeneratorParams) -> Value {
    Value::String(DEPARTMENTS[rng.random_range(0..DEPARTMENTS.len())].to_string())
}

pub fn amount(rng: &mut StdRng, params: &GeneratorParams) -> Value {
    let (lo, hi) = params.float_bounds();
    match uniform_f64(rng, lo, hi) {
        Some(v) => Value::String(format!("{:.2}", v)),
        None => Value::Null,
    }
}

pub fn currency_code(rng: &mut StdRng, _params: &GeneratorParams) -> Value {
    Value::String(CURRENCY_CODES[rng.random_range(0..CURRENCY_CODES.len())].to_string())
}

pub fn iban(rng: &mut StdRng, _params: &GeneratorParams) -> Value {
    // Looks realistic; the check digits are not valid.
    Value::String(format!(
        "DE{:02}{:04}{:04}{:04}{:04}{:02}",
        rng.random_range(10..99),
        rng.random_range(1000..9999),
        rng.random_range(1000..9999),
        rng.random_range(1000..9999),
        rng.random_range(1000..9999),
        rng.random_range(10..99)
    ))
}

pub fn credit_card_number(rng: &mut StdRng, _params: &GeneratorParams) -> Value {
    Value::String(format!(
        "{:04}-{:04}-{:04}-{:04}",
        rng.random_range(1000..9999),
        rng.random_range(1000..9999),
        rng.random_range(1000..9999),
        rng.random_range(1000..9999)
    ))
}

/// Uniform pick from `fakerParams.values`; null when the list is missing or empty.
pub fn array_element(rng: &mut StdRng, params: &GeneratorParams) -> Value {
    match params.extra.get("values").and_then(Value::as_array) {
        Some(values) if !values.is_empty() => values[rng.random_range(0..values.len())].clone(),
        _ => Value::Null,
    }
}
