//! Parameters passed to catalog generators.

use crate::schema::{Casing, PrimitiveSchema};
use rand::distr::Uniform;
use rand::rngs::StdRng;
use rand::Rng;
use serde_json::{Map, Value};

/// Parameter groups a generator may accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Param {
    /// `min` / `max`
    Bounds,
    /// `length` / `minLength` / `maxLength`
    Length,
    /// `prefix` / `suffix`
    Affix,
    /// `casing`
    Casing,
}

/// Assembled generator parameters for one primitive field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneratorParams {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub length: Option<usize>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub prefix: Option<String>,
    pub suffix: Option<String>,
    pub casing: Option<Casing>,
    /// Generator-specific extras (`fakerParams`)
    pub extra: Map<String, Value>,
}

impl GeneratorParams {
    pub fn from_primitive(p: &PrimitiveSchema) -> Self {
        let c = &p.constraints;
        Self {
            min: c.min,
            max: c.max,
            length: c.length,
            min_length: c.min_length,
            max_length: c.max_length,
            prefix: c.prefix.clone(),
            suffix: c.suffix.clone(),
            casing: c.casing,
            extra: p.generator_params.clone(),
        }
    }

    /// Keep only the parameter groups in `accepts`; extras always pass through.
    pub fn restrict(&self, accepts: &[Param]) -> Self {
        let has = |p: Param| accepts.contains(&p);
        Self {
            min: self.min.filter(|_| has(Param::Bounds)),
            max: self.max.filter(|_| has(Param::Bounds)),
            length: self.length.filter(|_| has(Param::Length)),
            min_length: self.min_length.filter(|_| has(Param::Length)),
            max_length: self.max_length.filter(|_| has(Param::Length)),
            prefix: self.prefix.clone().filter(|_| has(Param::Affix)),
            suffix: self.suffix.clone().filter(|_| has(Param::Affix)),
            casing: self.casing.filter(|_| has(Param::Casing)),
            extra: self.extra.clone(),
        }
    }

    pub fn has_length(&self) -> bool {
        self.length.is_some() || self.min_length.is_some() || self.max_length.is_some()
    }

    /// Inclusive integer range from `min`/`max`, defaulting to a span of 1000.
    pub fn int_bounds(&self) -> (i64, i64) {
        let lo = self.min.map(|v| v.ceil() as i64);
        let hi = self.max.map(|v| v.floor() as i64);
        match (lo, hi) {
            (Some(l), Some(h)) => (l, h.max(l)),
            (Some(l), None) => (l, l.saturating_add(1000)),
            (None, Some(h)) => (h.saturating_sub(1000).max(0).min(h), h),
            (None, None) => (0, 1000),
        }
    }

    pub fn float_bounds(&self) -> (f64, f64) {
        let lo = self.min.unwrap_or(0.0);
        let hi = self.max.unwrap_or(lo + 1000.0);
        (lo, hi.max(lo))
    }

    /// Draw a length: exact `length`, else uniform in the bounds.
    pub fn pick_length(&self, rng: &mut StdRng, default_min: usize, default_max: usize) -> usize {
        if let Some(len) = self.length {
            return len;
        }
        let lo = self
            .min_length
            .unwrap_or_else(|| default_min.min(self.max_length.unwrap_or(default_min)));
        let hi = self.max_length.unwrap_or_else(|| default_max.max(lo));
        if lo >= hi {
            lo
        } else {
            rng.random_range(lo..=hi)
        }
    }

    /// Whether `len` satisfies the length parameters.
    pub fn length_fits(&self, len: usize) -> bool {
        if let Some(exact) = self.length {
            return len == exact;
        }
        self.min_length.is_none_or(|lo| len >= lo) && self.max_length.is_none_or(|hi| len <= hi)
    }

    pub fn extra_usize(&self, key: &str) -> Option<usize> {
        self.extra
            .get(key)
            .and_then(Value::as_u64)
            .map(|v| v as usize)
    }

    pub fn extra_f64(&self, key: &str) -> Option<f64> {
        self.extra.get(key).and_then(Value::as_f64)
    }

    pub fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(Value::as_str)
    }
}

/// Uniform draw in `[lo, hi]`.
///
/// Bounds whose span is not representable (e.g. `-1e308..=1e308`) are
/// interpolated instead, so any pair of finite bounds yields a value.
pub fn uniform_f64(rng: &mut StdRng, lo: f64, hi: f64) -> Option<f64> {
    if !lo.is_finite() || !hi.is_finite() {
        return None;
    }
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    match Uniform::new_inclusive(lo, hi) {
        Ok(dist) => Some(rng.sample(dist)),
        Err(_) => {
            let u: f64 = rng.random();
            Some((lo * (1.0 - u) + hi * u).clamp(lo, hi))
        }
    }
}

/// Apply casing, then prefix/suffix, to a generated string.
pub fn decorate(value: String, params: &GeneratorParams, rng: &mut StdRng) -> String {
    let cased = match params.casing {
        Some(Casing::Upper) => value.to_uppercase(),
        Some(Casing::Lower) => value.to_lowercase(),
        Some(Casing::Mixed) => value
            .chars()
            .map(|c| {
                if rng.random_bool(0.5) {
                    c.to_ascii_uppercase()
                } else {
                    c.to_ascii_lowercase()
                }
            })
            .collect(),
        None => value,
    };

    match (&params.prefix, &params.suffix) {
        (None, None) => cased,
        (prefix, suffix) => format!(
            "{}{}{}",
            prefix.as_deref().unwrap_or_default(),
            cased,
            suffix.as_deref().unwrap_or_default()
        ),
    }
}
