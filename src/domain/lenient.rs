//! Forgiving deserializers for values that arrive from HTML forms, older
//! backup files and spreadsheet imports.
//!
//! Flags may be encoded as booleans, `0`/`1`, or strings; record references
//! may be numbers or numeric strings.

use serde::{Deserialize, Deserializer, Serializer, de::Error};
use serde_json::Value;

/// Interprets a JSON value as a flag.
///
/// Strings are false only when empty or one of `0`, `false`, `no`, `off`.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "" | "0" | "false" | "no" | "off"
        ),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// `#[serde(default, deserialize_with = "lenient::flag")]`
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().is_some_and(is_truthy))
}

/// `#[serde(serialize_with = "lenient::flag_as_int")]`
///
/// Writes flags as `0`/`1`, the encoding older backup files use.
#[allow(clippy::trivially_copy_pass_by_ref)]
pub fn flag_as_int<S>(value: &bool, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u8(u8::from(*value))
}

/// `#[serde(default, deserialize_with = "lenient::opt_id")]`
///
/// Empty strings and `null` become `None`.
pub fn opt_id<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid record id: {n}"))),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse::<i32>()
            .map(Some)
            .map_err(|_| D::Error::custom(format!("invalid record id: {s}"))),
        Some(other) => Err(D::Error::custom(format!("invalid record id: {other}"))),
    }
}

/// `#[serde(default, deserialize_with = "lenient::opt_text")]`
///
/// Accepts strings and numbers (phone numbers often come through as numbers
/// from spreadsheets).
pub fn opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(D::Error::custom(format!("expected text, got {other}"))),
    }
}
