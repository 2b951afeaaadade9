//! Parse-or-default helpers for upstream numbers.
//!
//! Providers report numbers either as JSON numbers or as decimal strings,
//! and sometimes as `null`. Everything funnels through [`parse_f64`], which
//! only ever yields finite values. The default applied to a missing value is
//! decided per field by the caller:
//!
//! * liquidity defaults to `0.0` (pair selection and the liquidity risk check
//!   both treat "unknown" as "none");
//! * every other figure stays `None`, so an unknown market cap or volume can
//!   never masquerade as a real zero in a ratio.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Reads a finite `f64` from a JSON number or numeric string.
pub fn parse_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// Reads a non-negative integer count. Fractional or negative values are rejected.
pub fn parse_u64(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    parse_f64(value)
        .filter(|v| *v >= 0.0 && v.fract() == 0.0 && *v <= u64::MAX as f64)
        .map(|v| v as u64)
}

/// Keeps a value only when it is strictly positive.
pub fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v > 0.0)
}

/// `numerator / denominator` when both are known and the denominator is non-zero.
pub fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    match (numerator, denominator) {
        (Some(n), Some(d)) if d != 0.0 => Some(n / d).filter(|r| r.is_finite()),
        _ => None,
    }
}

pub fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(parse_f64))
}

pub fn lenient_u64<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(parse_u64))
}

/// Treats an explicit `null` like a missing field.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
