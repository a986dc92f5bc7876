//! Error taxonomy shared by every codec operation.
//!
//! Each failure carries a stable [`ErrorKind`] code, a human-readable message
//! (via `Display`) and a structured detail map for tooling.

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

/// Stable taxonomy codes, independent of the message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    InvalidInput,
    ValueOutOfRange,
    InvalidLength,
    InvalidChecksum,
    InvalidDate,
    DecodeFailure,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "INVALID_INPUT",
            ErrorKind::ValueOutOfRange => "VALUE_OUT_OF_RANGE",
            ErrorKind::InvalidLength => "INVALID_LENGTH",
            ErrorKind::InvalidChecksum => "INVALID_CHECKSUM",
            ErrorKind::InvalidDate => "INVALID_DATE",
            ErrorKind::DecodeFailure => "DECODE_FAILURE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodeError {
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("{field} value {value} does not fit in {capacity} (must be below capacity)")]
    ValueOutOfRange {
        field: &'static str,
        value: u64,
        capacity: u64,
    },

    #[error("invalid code length: expected {expected} symbols, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("checksum mismatch: expected {expected}, found {actual}")]
    InvalidChecksum { expected: String, actual: String },

    #[error("invalid event date {packed}: {reason}")]
    InvalidDate { packed: u64, reason: String },

    #[error("cannot decode symbol at position {position}: {reason}")]
    DecodeFailure { position: usize, reason: String },
}

impl CodeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CodeError::InvalidInput { .. } => ErrorKind::InvalidInput,
            CodeError::ValueOutOfRange { .. } => ErrorKind::ValueOutOfRange,
            CodeError::InvalidLength { .. } => ErrorKind::InvalidLength,
            CodeError::InvalidChecksum { .. } => ErrorKind::InvalidChecksum,
            CodeError::InvalidDate { .. } => ErrorKind::InvalidDate,
            CodeError::DecodeFailure { .. } => ErrorKind::DecodeFailure,
        }
    }

    /// Structured view of the error fields, keyed by name.
    pub fn details(&self) -> BTreeMap<&'static str, String> {
        let mut map = BTreeMap::new();
        match self {
            CodeError::InvalidInput { field, reason } => {
                map.insert("field", field.to_string());
                map.insert("reason", reason.clone());
            }
            CodeError::ValueOutOfRange {
                field,
                value,
                capacity,
            } => {
                map.insert("field", field.to_string());
                map.insert("value", value.to_string());
                map.insert("capacity", capacity.to_string());
            }
            CodeError::InvalidLength { expected, actual } => {
                map.insert("expected", expected.to_string());
                map.insert("actual", actual.to_string());
            }
            CodeError::InvalidChecksum { expected, actual } => {
                map.insert("expected", expected.clone());
                map.insert("actual", actual.clone());
            }
            CodeError::InvalidDate { packed, reason } => {
                map.insert("packed", packed.to_string());
                map.insert("reason", reason.clone());
            }
            CodeError::DecodeFailure { position, reason } => {
                map.insert("position", position.to_string());
                map.insert("reason", reason.clone());
            }
        }
        map
    }

    /// Same error with the `field` detail replaced, for callers that wrap a
    /// primitive codec call in a named ticket field.
    pub(crate) fn in_field(self, name: &'static str) -> Self {
        match self {
            CodeError::InvalidInput { reason, .. } => CodeError::InvalidInput {
                field: name,
                reason,
            },
            CodeError::ValueOutOfRange {
                value, capacity, ..
            } => CodeError::ValueOutOfRange {
                field: name,
                value,
                capacity,
            },
            other => other,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
