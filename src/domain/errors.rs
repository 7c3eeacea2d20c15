//! Decode errors. Every variant names the offending field path.
//!
//! Encoding, equality, hashing and copy-with are total and never fail;
//! decode is the only fallible surface of the crate.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A required field is absent (or explicitly `null`) in the payload.
    #[error("missing required field `{path}`")]
    MissingField { path: String },

    /// A field is present but holds the wrong JSON type or an unparsable
    /// value (bad timestamp, out-of-range integer, ...).
    #[error("malformed field `{path}`: expected {expected} ({detail})")]
    Malformed {
        path: String,
        expected: &'static str,
        detail: String,
    },

    /// The input is not valid JSON at all.
    #[error("invalid JSON: {detail}")]
    Json { detail: String },
}

impl DecodeError {
    pub(crate) fn missing(path: impl Into<String>) -> Self {
        Self::MissingField { path: path.into() }
    }

    pub(crate) fn malformed(
        path: impl Into<String>,
        expected: &'static str,
        detail: impl Into<String>,
    ) -> Self {
        Self::Malformed {
            path: path.into(),
            expected,
            detail: detail.into(),
        }
    }

    /// Path of the field the error points at, when there is one.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::MissingField { path } | Self::Malformed { path, .. } => Some(path),
            Self::Json { .. } => None,
        }
    }
}
