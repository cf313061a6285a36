//! Text generators: lorem, words and synthetic strings.

use super::params::GeneratorParams;
use fake::faker::lorem::en::{Paragraph, Sentence, Word, Words};
use fake::Fake;
use rand::rngs::StdRng;
use rand::Rng;
use serde_json::Value;

const ALPHA: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const ALPHANUMERIC: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const DIGITS: &[u8] = b"0123456789";

/// Attempts at drawing a dictionary word that fits the length bounds.
const WORD_ATTEMPTS: usize = 16;

/// Upper bound for `count`, `wordCount` and `sentenceCount`.
const MAX_COUNT: usize = 1000;

fn count_param(params: &GeneratorParams, key: &str) -> Option<usize> {
    params.extra_usize(key).map(|n| n.min(MAX_COUNT))
}

fn random_from(rng: &mut StdRng, alphabet: &[u8], len: usize) -> String {
    (0..len)
        .map(|_| alphabet[rng.random_range(0..alphabet.len())] as char)
        .collect()
}

pub fn word(rng: &mut StdRng, params: &GeneratorParams) -> Value {
    if !params.has_length() {
        let w: String = Word().fake_with_rng(rng);
        return Value::String(w);
    }
    for _ in 0..WORD_ATTEMPTS {
        let w: String = Word().fake_with_rng(rng);
        if params.length_fits(w.chars().count()) {
            return Value::String(w);
        }
    }
    // No dictionary word fits; fall back to letters of a valid length.
    let len = params.pick_length(rng, 3, 10);
    Value::String(random_from(rng, ALPHA, len).to_lowercase())
}

pub fn words(rng: &mut StdRng, params: &GeneratorParams) -> Value {
    let count = count_param(params, "count").unwrap_or(3).max(1);
    let words: Vec<String> = Words(count..count + 1).fake_with_rng(rng);
    Value::String(words.join(" "))
}

pub fn sentence(rng: &mut StdRng, params: &GeneratorParams) -> Value {
    let words = count_param(params, "wordCount");
    let s: String = match words {
        Some(n) => Sentence(n..n + 1).fake_with_rng(rng),
        None => Sentence(5..10).fake_with_rng(rng),
    };
    Value::String(s)
}

pub fn paragraph(rng: &mut StdRng, params: &GeneratorParams) -> Value {
    let sentences = count_param(params, "sentenceCount");
    let p: String = match sentences {
        Some(n) => Paragraph(n..n + 1).fake_with_rng(rng),
        None => Paragraph(3..5).fake_with_rng(rng),
    };
    Value::String(p)
}

pub fn slug(rng: &mut StdRng, params: &GeneratorParams) -> Value {
    let count = count_param(params, "count").unwrap_or(3).max(1);
    let words: Vec<String> = Words(count..count + 1).fake_with_rng(rng);
    Value::String(words.join("-").to_lowercase())
}

pub fn uuid(rng: &mut StdRng, _params: &GeneratorParams) -> Value {
    Value::String(format!(
        "{:08x}-{:04x}-{:04x}-{:04x}-{:012x}",
        rng.random::<u32>(),
        rng.random::<u16>(),
        (rng.random::<u16>() & 0x0FFF) | 0x4000, // Version 4
        (rng.random::<u16>() & 0x3FFF) | 0x8000, // Variant
        rng.random::<u64>() & 0xFFFF_FFFF_FFFF_u64
    ))
}

pub fn alpha(rng: &mut StdRng, params: &GeneratorParams) -> Value {
    let len = params.pick_length(rng, 8, 8);
    Value::String(random_from(rng, ALPHA, len))
}

pub fn alphanumeric(rng: &mut StdRng, params: &GeneratorParams) -> Value {
    let len = params.pick_length(rng, 8, 8);
    Value::String(random_from(rng, ALPHANUMERIC, len))
}

pub fn numeric(rng: &mut StdRng, params: &GeneratorParams) -> Value {
    let len = params.pick_length(rng, 6, 6);
    Value::String(random_from(rng, DIGITS, len))
}

pub fn hexadecimal(rng: &mut StdRng, params: &GeneratorParams) -> Value {
    let len = params.pick_length(rng, 8, 8);
    let bytes: Vec<u8> = (0..len.div_ceil(2)).map(|_| rng.random()).collect();
    let mut encoded = hex::encode(bytes);
    encoded.truncate(len);
    Value::String(encoded)
}
