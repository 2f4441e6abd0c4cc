//! Lenient field decoders for listing records.
//!
//! The marketplace backend is loose about types: prices arrive as numbers or
//! strings, counts can be null, phone numbers are sometimes numeric. Every
//! helper here degrades to a safe default instead of failing the whole record,
//! and none of them ever yield a NaN.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Interpret a JSON value the way a browser's `Number(x)` would, minus NaN.
fn number_like(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                0.0
            } else {
                trimmed.parse::<f64>().ok()?
            }
        }
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        _ => return None,
    };

    n.is_finite().then_some(n)
}

/// Coerce to a non-negative finite amount, 0 otherwise.
pub fn amount_from_value(value: &Value) -> f64 {
    match number_like(value) {
        Some(n) if n >= 0.0 => n,
        _ => 0.0,
    }
}

/// Coerce to a non-negative whole count, truncating fractions.
pub fn count_from_value(value: &Value) -> u32 {
    let n = amount_from_value(value).trunc();
    if n >= u32::MAX as f64 {
        u32::MAX
    } else {
        n as u32
    }
}

pub fn de_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(amount_from_value(&value))
}

pub fn de_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(count_from_value(&value))
}

/// Average rating, clamped into the 0..=5 star range.
pub fn de_rating<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(amount_from_value(&value).min(5.0))
}

pub fn de_id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(positive_integer(&value).unwrap_or(0))
}

/// Only whole positive ids count as a seller reference.
pub fn de_opt_id<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(positive_integer(&value))
}

fn positive_integer(value: &Value) -> Option<u64> {
    let n = number_like(value)?;
    if n >= 1.0 && n.fract() == 0.0 && n <= u64::MAX as f64 {
        Some(n as u64)
    } else {
        None
    }
}

/// A previously given star rating; 0 or garbage means there is none.
pub fn de_opt_stars<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(stars_from_value(&value))
}

fn stars_from_value(value: &Value) -> Option<u8> {
    number_like(value)?;
    match count_from_value(value).min(5) {
        0 => None,
        stars => Some(stars as u8),
    }
}

/// Free text that may come through as a string, a number or null.
pub fn de_opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(text_from_value(value))
}

fn text_from_value(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Enumerated labels that pass unknown values through verbatim.
pub fn de_opt_label<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<String>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(text_from_value(value).map(T::from))
}

/// Sequences where null, a missing key or a non-array all mean "none".
/// Elements that fail to decode are dropped.
pub fn de_seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect()),
        _ => Ok(Vec::new()),
    }
}

/// Image URL lists; non-string entries are skipped.
pub fn de_urls<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Array(items) => Ok(items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect()),
        _ => Ok(Vec::new()),
    }
}
