//! JSON codec layer: the [`JsonCodec`] trait plus the field helpers and
//! wire-enum machinery the record decoders are built from.
//!
//! Encoding rides on the records' `serde::Serialize` derives and is total.
//! Decoding walks the `serde_json::Value` tree explicitly so every failure
//! can name the offending field path (`$.participants[2].user_id`).

pub mod enums;
pub(crate) mod field;

use serde::Serialize;
use serde_json::Value;

use crate::domain::DecodeError;

/// A free-form JSON object, used for opaque `metadata`-style fields.
pub type JsonObject = serde_json::Map<String, Value>;

/// Bidirectional mapping between a record and a JSON tree.
///
/// Decode is all-or-nothing: a malformed payload never yields a
/// partially-initialized record. Unknown keys in the payload are ignored.
pub trait JsonCodec: Serialize + Sized {
    /// Decode from a JSON tree, reporting errors relative to `path`.
    fn decode_at(value: &Value, path: &str) -> Result<Self, DecodeError>;

    /// Decode from a JSON tree rooted at `$`.
    fn decode(value: &Value) -> Result<Self, DecodeError> {
        Self::decode_at(value, "$")
    }

    /// Parse and decode a JSON string.
    fn decode_str(input: &str) -> Result<Self, DecodeError> {
        let value: Value = serde_json::from_str(input).map_err(|e| DecodeError::Json {
            detail: e.to_string(),
        })?;
        Self::decode(&value)
    }

    /// Encode to a JSON tree. Total for any constructed record: field values
    /// are plain JSON-representable data, so serialization cannot fail.
    fn encode(&self) -> Value {
        serde_json::to_value(self).expect("record serialization is infallible")
    }

    /// Encode to a compact JSON string.
    fn encode_string(&self) -> String {
        self.encode().to_string()
    }
}
