//! Person, contact, company and address generators.

use super::params::{uniform_f64, GeneratorParams};
use fake::faker::address::en::{
    BuildingNumber, CityName, CountryName, StateName, StreetName, ZipCode,
};
use fake::faker::company::en::{CatchPhrase, CompanyName};
use fake::faker::internet::en::{SafeEmail, Username};
use fake::faker::lorem::en::Word;
use fake::faker::name::en::{FirstName, LastName, Name};
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;
use rand::rngs::StdRng;
use rand::Rng;
use serde_json::Value;

const JOB_TITLES: &[&str] = &[
    "Software Engineer",
    "Product Manager",
    "Data Analyst",
    "Designer",
    "Marketing Manager",
    "Sales Representative",
    "Customer Support",
    "Operations Manager",
    "Account Executive",
    "QA Engineer",
];

const TLDS: &[&str] = &["com", "net", "org", "io", "dev", "app"];

const PASSWORD_CHARS: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$%^&*";

fn pick<'a>(rng: &mut StdRng, items: &[&'a str]) -> &'a str {
    items[rng.random_range(0..items.len())]
}

pub fn first_name(rng: &mut StdRng, _params: &GeneratorParams) -> Value {
    Value::String(FirstName().fake_with_rng(rng))
}

pub fn last_name(rng: &mut StdRng, _params: &GeneratorParams) -> Value {
    Value::String(LastName().fake_with_rng(rng))
}

pub fn full_name(rng: &mut StdRng, _params: &GeneratorParams) -> Value {
    Value::String(Name().fake_with_rng(rng))
}

pub fn job_title(rng: &mut StdRng, _params: &GeneratorParams) -> Value {
    Value::String(pick(rng, JOB_TITLES).to_string())
}

pub fn email(rng: &mut StdRng, _params: &GeneratorParams) -> Value {
    Value::String(SafeEmail().fake_with_rng(rng))
}

pub fn username(rng: &mut StdRng, _params: &GeneratorParams) -> Value {
    Value::String(Username().fake_with_rng(rng))
}

pub fn domain_name(rng: &mut StdRng, _params: &GeneratorParams) -> Value {
    let word: String = Word().fake_with_rng(rng);
    Value::String(format!("{}.{}", word, pick(rng, TLDS)))
}

pub fn url(rng: &mut StdRng, _params: &GeneratorParams) -> Value {
    let host: String = Word().fake_with_rng(rng);
    let path: String = Word().fake_with_rng(rng);
    Value::String(format!(
        "https://{}{}.{}/{}",
        host,
        rng.random_range(1..1000),
        pick(rng, TLDS),
        path
    ))
}

pub fn ipv4(rng: &mut StdRng, _params: &GeneratorParams) -> Value {
    Value::String(format!(
        "{}.{}.{}.{}",
        rng.random_range(1..255),
        rng.random_range(0..255),
        rng.random_range(0..255),
        rng.random_range(1..255)
    ))
}

pub fn ipv6(rng: &mut StdRng, _params: &GeneratorParams) -> Value {
    let groups: Vec<String> = (0..8)
        .map(|_| format!("{:x}", rng.random_range(0..0xFFFF_u16)))
        .collect();
    Value::String(groups.join(":"))
}

pub fn password(rng: &mut StdRng, params: &GeneratorParams) -> Value {
    let len = params.pick_length(rng, 12, 16);
    let s: String = (0..len)
        .map(|_| PASSWORD_CHARS[rng.random_range(0..PASSWORD_CHARS.len())] as char)
        .collect();
    Value::String(s)
}

pub fn phone_number(rng: &mut StdRng, _params: &GeneratorParams) -> Value {
    Value::String(PhoneNumber().fake_with_rng(rng))
}

pub fn company_name(rng: &mut StdRng, _params: &GeneratorParams) -> Value {
    Value::String(CompanyName().fake_with_rng(rng))
}

pub fn catch_phrase(rng: &mut StdRng, _params: &GeneratorParams) -> Value {
    Value::String(CatchPhrase().fake_with_rng(rng))
}

pub fn city(rng: &mut StdRng, _params: &GeneratorParams) -> Value {
    Value::String(CityName().fake_with_rng(rng))
}

pub fn state(rng: &mut StdRng, _params: &GeneratorParams) -> Value {
    Value::String(StateName().fake_with_rng(rng))
}

pub fn street(rng: &mut StdRng, _params: &GeneratorParams) -> Value {
    Value::String(StreetName().fake_with_rng(rng))
}

pub fn street_address(rng: &mut StdRng, _params: &GeneratorParams) -> Value {
    let number: String = BuildingNumber().fake_with_rng(rng);
    let street: String = StreetName().fake_with_rng(rng);
    Value::String(format!("{} {}", number, street))
}

pub fn zip_code(rng: &mut StdRng, _params: &GeneratorParams) -> Value {
    Value::String(ZipCode().fake_with_rng(rng))
}

pub fn country(rng: &mut StdRng, _params: &GeneratorParams) -> Value {
    Value::String(CountryName().fake_with_rng(rng))
}

pub fn latitude(rng: &mut StdRng, params: &GeneratorParams) -> Value {
    coordinate(rng, params, 90.0)
}

pub fn longitude(rng: &mut StdRng, params: &GeneratorParams) -> Value {
    coordinate(rng, params, 180.0)
}

fn coordinate(rng: &mut StdRng, params: &GeneratorParams, limit: f64) -> Value {
    let lo = params.min.unwrap_or(-limit).max(-limit);
    let hi = params.max.unwrap_or(limit).min(limit).max(lo);
    uniform_f64(rng, lo, hi)
        .map(|v| ((v * 10_000.0).round() / 10_000.0).clamp(lo, hi))
        .and_then(serde_json::Number::from_f64)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}
