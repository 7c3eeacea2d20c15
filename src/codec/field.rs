//! Typed field extraction over `serde_json::Value` trees.
//!
//! Each helper takes the enclosing object, the path of that object, and the
//! wire key, so the error it returns carries the full dotted/indexed path
//! of the offending field. `null` is treated the same as an absent key.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde_json::Value;

use super::enums::WireEnum;
use super::{JsonCodec, JsonObject};
use crate::domain::DecodeError;

pub(crate) fn join(path: &str, key: &str) -> String {
    format!("{path}.{key}")
}

pub(crate) fn index(path: &str, i: usize) -> String {
    format!("{path}[{i}]")
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Returns the value at `key`, treating `null` as absent.
fn present<'a>(obj: &'a JsonObject, key: &str) -> Option<&'a Value> {
    obj.get(key).filter(|v| !v.is_null())
}

fn required<'a>(obj: &'a JsonObject, path: &str, key: &str) -> Result<&'a Value, DecodeError> {
    present(obj, key).ok_or_else(|| DecodeError::missing(join(path, key)))
}

pub(crate) fn as_object<'a>(value: &'a Value, path: &str) -> Result<&'a JsonObject, DecodeError> {
    value
        .as_object()
        .ok_or_else(|| DecodeError::malformed(path, "object", format!("got {}", type_name(value))))
}

// ── strings ──────────────────────────────────────────────────────────

fn str_at(value: &Value, path: String) -> Result<String, DecodeError> {
    value
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| DecodeError::malformed(path, "string", format!("got {}", type_name(value))))
}

pub(crate) fn req_str(obj: &JsonObject, path: &str, key: &str) -> Result<String, DecodeError> {
    str_at(required(obj, path, key)?, join(path, key))
}

pub(crate) fn opt_str(obj: &JsonObject, path: &str, key: &str) -> Result<Option<String>, DecodeError> {
    present(obj, key).map(|v| str_at(v, join(path, key))).transpose()
}

// ── integers ─────────────────────────────────────────────────────────

fn i64_at(value: &Value, path: String) -> Result<i64, DecodeError> {
    value
        .as_i64()
        .ok_or_else(|| DecodeError::malformed(path, "integer", format!("got {}", type_name(value))))
}

pub(crate) fn req_i64(obj: &JsonObject, path: &str, key: &str) -> Result<i64, DecodeError> {
    i64_at(required(obj, path, key)?, join(path, key))
}

pub(crate) fn opt_i64(obj: &JsonObject, path: &str, key: &str) -> Result<Option<i64>, DecodeError> {
    present(obj, key).map(|v| i64_at(v, join(path, key))).transpose()
}

fn u32_at(value: &Value, path: String) -> Result<u32, DecodeError> {
    value
        .as_u64()
        .and_then(|n| u32::try_from(n).ok())
        .ok_or_else(|| {
            DecodeError::malformed(path, "unsigned 32-bit integer", format!("got {value}"))
        })
}

pub(crate) fn req_u32(obj: &JsonObject, path: &str, key: &str) -> Result<u32, DecodeError> {
    u32_at(required(obj, path, key)?, join(path, key))
}

pub(crate) fn opt_u32(obj: &JsonObject, path: &str, key: &str) -> Result<Option<u32>, DecodeError> {
    present(obj, key).map(|v| u32_at(v, join(path, key))).transpose()
}

/// Missing counters default to zero.
pub(crate) fn u32_or_zero(obj: &JsonObject, path: &str, key: &str) -> Result<u32, DecodeError> {
    Ok(opt_u32(obj, path, key)?.unwrap_or(0))
}

/// Small bounded integer (e.g. a star rating). Values outside `range` are
/// malformed, not clamped.
pub(crate) fn req_u8_in_range(
    obj: &JsonObject,
    path: &str,
    key: &str,
    range: std::ops::RangeInclusive<u8>,
) -> Result<u8, DecodeError> {
    let full = join(path, key);
    let value = required(obj, path, key)?;
    let n = value
        .as_u64()
        .and_then(|n| u8::try_from(n).ok())
        .ok_or_else(|| {
            DecodeError::malformed(full.clone(), "unsigned 8-bit integer", format!("got {value}"))
        })?;
    if !range.contains(&n) {
        return Err(DecodeError::malformed(
            full,
            "unsigned 8-bit integer",
            format!("got {n}, allowed range is {}..={}", range.start(), range.end()),
        ));
    }
    Ok(n)
}

// ── booleans ─────────────────────────────────────────────────────────

/// Flags carry a declared `false` default, so a missing key is not an error.
pub(crate) fn bool_or_false(obj: &JsonObject, path: &str, key: &str) -> Result<bool, DecodeError> {
    match present(obj, key) {
        None => Ok(false),
        Some(v) => v.as_bool().ok_or_else(|| {
            DecodeError::malformed(join(path, key), "boolean", format!("got {}", type_name(v)))
        }),
    }
}

// ── timestamps ───────────────────────────────────────────────────────

fn timestamp_at(value: &Value, path: String) -> Result<DateTime<Utc>, DecodeError> {
    let raw = value.as_str().ok_or_else(|| {
        DecodeError::malformed(
            path.clone(),
            "RFC 3339 timestamp",
            format!("got {}", type_name(value)),
        )
    })?;
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DecodeError::malformed(path, "RFC 3339 timestamp", e.to_string()))
}

pub(crate) fn req_timestamp(
    obj: &JsonObject,
    path: &str,
    key: &str,
) -> Result<DateTime<Utc>, DecodeError> {
    timestamp_at(required(obj, path, key)?, join(path, key))
}

pub(crate) fn opt_timestamp(
    obj: &JsonObject,
    path: &str,
    key: &str,
) -> Result<Option<DateTime<Utc>>, DecodeError> {
    present(obj, key)
        .map(|v| timestamp_at(v, join(path, key)))
        .transpose()
}

// ── decimals ─────────────────────────────────────────────────────────

/// Decimals are written as strings but accepted as strings or numbers.
fn decimal_at(value: &Value, path: String) -> Result<Decimal, DecodeError> {
    let raw = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        other => {
            return Err(DecodeError::malformed(
                path,
                "decimal",
                format!("got {}", type_name(other)),
            ));
        }
    };
    raw.parse::<Decimal>()
        .map_err(|e| DecodeError::malformed(path, "decimal", e.to_string()))
}

pub(crate) fn req_decimal(obj: &JsonObject, path: &str, key: &str) -> Result<Decimal, DecodeError> {
    decimal_at(required(obj, path, key)?, join(path, key))
}

pub(crate) fn opt_decimal(
    obj: &JsonObject,
    path: &str,
    key: &str,
) -> Result<Option<Decimal>, DecodeError> {
    present(obj, key)
        .map(|v| decimal_at(v, join(path, key)))
        .transpose()
}

// ── enums ────────────────────────────────────────────────────────────

/// Required enum field. The key must be present and a string; an
/// unrecognized value maps to the enum's default variant.
pub(crate) fn req_enum<E: WireEnum>(obj: &JsonObject, path: &str, key: &str) -> Result<E, DecodeError> {
    let raw = req_str(obj, path, key)?;
    Ok(E::from_wire_or_default(&raw))
}

// ── nested records & collections ─────────────────────────────────────

pub(crate) fn opt_record<T: JsonCodec>(
    obj: &JsonObject,
    path: &str,
    key: &str,
) -> Result<Option<T>, DecodeError> {
    present(obj, key)
        .map(|v| T::decode_at(v, &join(path, key)))
        .transpose()
}

/// Decodes an array of records; a missing key is the declared empty default.
/// Element errors carry their index (`$.participants[2]...`).
pub(crate) fn list_of<T: JsonCodec>(
    obj: &JsonObject,
    path: &str,
    key: &str,
) -> Result<Vec<T>, DecodeError> {
    let full = join(path, key);
    let Some(value) = present(obj, key) else {
        return Ok(Vec::new());
    };
    let items = value.as_array().ok_or_else(|| {
        DecodeError::malformed(full.clone(), "array", format!("got {}", type_name(value)))
    })?;
    items
        .iter()
        .enumerate()
        .map(|(i, item)| T::decode_at(item, &index(&full, i)))
        .collect()
}

/// Array of strings; missing key defaults to empty.
pub(crate) fn string_list(obj: &JsonObject, path: &str, key: &str) -> Result<Vec<String>, DecodeError> {
    let full = join(path, key);
    let Some(value) = present(obj, key) else {
        return Ok(Vec::new());
    };
    let items = value.as_array().ok_or_else(|| {
        DecodeError::malformed(full.clone(), "array", format!("got {}", type_name(value)))
    })?;
    items
        .iter()
        .enumerate()
        .map(|(i, item)| str_at(item, index(&full, i)))
        .collect()
}

/// Map of string lists (e.g. reactions: emoji → user ids); missing key
/// defaults to empty. Key order on the wire is irrelevant.
pub(crate) fn map_of_string_lists(
    obj: &JsonObject,
    path: &str,
    key: &str,
) -> Result<BTreeMap<String, Vec<String>>, DecodeError> {
    let full = join(path, key);
    let Some(value) = present(obj, key) else {
        return Ok(BTreeMap::new());
    };
    let entries = as_object(value, &full)?;
    let mut out = BTreeMap::new();
    for (entry_key, entry) in entries {
        let entry_path = join(&full, entry_key);
        let items = entry.as_array().ok_or_else(|| {
            DecodeError::malformed(entry_path.clone(), "array", format!("got {}", type_name(entry)))
        })?;
        let decoded = items
            .iter()
            .enumerate()
            .map(|(i, item)| str_at(item, index(&entry_path, i)))
            .collect::<Result<Vec<_>, _>>()?;
        out.insert(entry_key.clone(), decoded);
    }
    Ok(out)
}

/// Free-form JSON object field, kept as-is.
pub(crate) fn opt_object(
    obj: &JsonObject,
    path: &str,
    key: &str,
) -> Result<Option<JsonObject>, DecodeError> {
    present(obj, key)
        .map(|v| as_object(v, &join(path, key)).cloned())
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> JsonObject {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn paths_are_dotted_and_indexed() {
        assert_eq!(join("$", "id"), "$.id");
        assert_eq!(index(&join("$", "participants"), 2), "$.participants[2]");
    }

    #[test]
    fn null_counts_as_absent() {
        let o = obj(json!({ "a": null }));
        assert_eq!(opt_str(&o, "$", "a").unwrap(), None);
        let err = req_str(&o, "$", "a").unwrap_err();
        assert_eq!(err, DecodeError::missing("$.a"));
    }

    #[test]
    fn wrong_type_reports_expectation() {
        let o = obj(json!({ "n": "five" }));
        let err = req_i64(&o, "$", "n").unwrap_err();
        assert_eq!(err.path(), Some("$.n"));
        assert!(err.to_string().contains("expected integer"));
    }

    #[test]
    fn timestamps_parse_rfc3339_only() {
        let o = obj(json!({ "at": "2024-01-01T00:00:00Z", "bad": "yesterday" }));
        assert_eq!(
            req_timestamp(&o, "$", "at").unwrap(),
            "2024-01-01T00:00:00Z".parse::<DateTime<Utc>>().unwrap()
        );
        let err = req_timestamp(&o, "$", "bad").unwrap_err();
        assert_eq!(err.path(), Some("$.bad"));
    }

    #[test]
    fn decimals_accept_strings_and_numbers() {
        let o = obj(json!({ "s": "120.50", "n": 99.5, "i": 3 }));
        assert_eq!(req_decimal(&o, "$", "s").unwrap(), "120.50".parse().unwrap());
        assert_eq!(req_decimal(&o, "$", "n").unwrap(), "99.5".parse().unwrap());
        assert_eq!(req_decimal(&o, "$", "i").unwrap(), "3".parse().unwrap());
    }

    #[test]
    fn missing_collections_default_to_empty() {
        let o = obj(json!({}));
        assert!(string_list(&o, "$", "tags").unwrap().is_empty());
        assert!(map_of_string_lists(&o, "$", "reactions").unwrap().is_empty());
    }
}
