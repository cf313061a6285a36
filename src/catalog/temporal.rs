//! Date generators.
//!
//! Dates are offsets from a fixed reference instant rather than the wall
//! clock, otherwise seeded output would drift from one run to the next.
//! `fakerParams.refDate` (RFC 3339) moves the reference.

use super::params::GeneratorParams;
use chrono::{DateTime, Datelike, SecondsFormat, Utc};
use rand::rngs::StdRng;
use rand::Rng;
use serde_json::Value;

/// 2025-01-01T00:00:00Z
const REFERENCE_TIMESTAMP: i64 = 1_735_689_600;

const SECONDS_PER_DAY: i64 = 86_400;
const DAYS_PER_YEAR: i64 = 365;

fn reference(params: &GeneratorParams) -> DateTime<Utc> {
    params
        .extra_str("refDate")
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| {
            DateTime::from_timestamp(REFERENCE_TIMESTAMP, 0).unwrap_or(DateTime::UNIX_EPOCH)
        })
}

fn iso(ts: i64) -> Value {
    match DateTime::from_timestamp(ts, 0) {
        Some(dt) => Value::String(dt.to_rfc3339_opts(SecondsFormat::Millis, true)),
        None => Value::Null,
    }
}

fn min_timestamp() -> i64 {
    DateTime::<Utc>::MIN_UTC.timestamp()
}

fn max_timestamp() -> i64 {
    DateTime::<Utc>::MAX_UTC.timestamp()
}

/// `units × unit_secs`, saturating instead of overflowing.
fn span(units: usize, unit_secs: i64) -> i64 {
    i64::try_from(units)
        .unwrap_or(i64::MAX)
        .saturating_mul(unit_secs)
}

/// Instant uniformly within `span_secs` before or after the reference,
/// never past the range chrono can represent.
fn offset(rng: &mut StdRng, params: &GeneratorParams, span_secs: i64, forward: bool) -> Value {
    let base = reference(params).timestamp();
    let room = if forward {
        max_timestamp().saturating_sub(base)
    } else {
        base.saturating_sub(min_timestamp())
    };
    let delta = rng.random_range(1..=span_secs.min(room).max(1));
    let ts = if forward {
        base.saturating_add(delta)
    } else {
        base.saturating_sub(delta)
    };
    iso(ts.clamp(min_timestamp(), max_timestamp()))
}

pub fn past(rng: &mut StdRng, params: &GeneratorParams) -> Value {
    let years = params.extra_usize("years").unwrap_or(1);
    offset(rng, params, span(years, DAYS_PER_YEAR * SECONDS_PER_DAY), false)
}

pub fn future(rng: &mut StdRng, params: &GeneratorParams) -> Value {
    let years = params.extra_usize("years").unwrap_or(1);
    offset(rng, params, span(years, DAYS_PER_YEAR * SECONDS_PER_DAY), true)
}

pub fn recent(rng: &mut StdRng, params: &GeneratorParams) -> Value {
    let days = params.extra_usize("days").unwrap_or(1);
    offset(rng, params, span(days, SECONDS_PER_DAY), false)
}

pub fn soon(rng: &mut StdRng, params: &GeneratorParams) -> Value {
    let days = params.extra_usize("days").unwrap_or(1);
    offset(rng, params, span(days, SECONDS_PER_DAY), true)
}

pub fn anytime(rng: &mut StdRng, params: &GeneratorParams) -> Value {
    let span = 50 * DAYS_PER_YEAR * SECONDS_PER_DAY;
    let forward = rng.random_bool(0.5);
    offset(rng, params, span, forward)
}

/// Calendar date (`YYYY-MM-DD`) for an age between `min` and `max` years.
pub fn birthdate(rng: &mut StdRng, params: &GeneratorParams) -> Value {
    let year_secs = DAYS_PER_YEAR * SECONDS_PER_DAY;
    let min_age = params.min.map(|v| v.max(0.0) as i64).unwrap_or(18);
    let max_age = params.max.map(|v| v as i64).unwrap_or(80).max(min_age);
    let base = reference(params).timestamp();

    let earliest = base
        .saturating_sub(max_age.saturating_add(1).saturating_mul(year_secs))
        .saturating_add(SECONDS_PER_DAY);
    let latest = base.saturating_sub(min_age.saturating_mul(year_secs));
    let earliest = earliest.clamp(min_timestamp(), max_timestamp());
    let latest = latest.clamp(min_timestamp(), max_timestamp());
    let ts = rng.random_range(earliest.min(latest)..=latest);

    match DateTime::from_timestamp(ts, 0) {
        Some(dt) => Value::String(format!(
            "{:04}-{:02}-{:02}",
            dt.year(),
            dt.month(),
            dt.day()
        )),
        None => Value::Null,
    }
}
