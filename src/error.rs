//! Error types for dataset loading and value parsing.
//!
//! Engine operations never fail with these: an operation invoked in the
//! wrong state is reported through its return value instead.

use std::path::PathBuf;
use thiserror::Error;

/// Failure while loading or validating a location dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// The dataset file could not be read.
    #[error("failed to read dataset {path}: {source}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The dataset is not valid JSON or does not match the record layout.
    #[error("malformed dataset: {0}")]
    Json(#[from] serde_json::Error),
    /// A record has an empty identifier.
    #[error("location #{index} has an empty id")]
    EmptyId {
        /// Position of the record in the dataset.
        index: usize,
    },
    /// Two records share the same identifier.
    #[error("duplicate location id `{0}`")]
    DuplicateId(String),
    /// A record's coordinates are outside the valid ranges.
    #[error("location `{id}` has out-of-range coordinates ({lat}, {lon})")]
    InvalidCoord {
        /// Offending location id.
        id: String,
        /// Latitude as given.
        lat: f64,
        /// Longitude as given.
        lon: f64,
    },
}

/// A string did not name a known variant of a settings enum.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} `{value}`")]
pub struct ParseEnumError {
    /// What was being parsed, e.g. "difficulty".
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

impl ParseEnumError {
    /// Create a parse error for `kind` rejecting `value`.
    #[must_use]
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_error_display() {
        let err = DatasetError::InvalidCoord {
            id: "nowhere".to_string(),
            lat: 95.0,
            lon: 0.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("nowhere"));
        assert!(msg.contains("95"));
    }

    #[test]
    fn test_parse_enum_error_display() {
        let err = ParseEnumError::new("difficulty", "brutal");
        assert_eq!(err.to_string(), "unknown difficulty `brutal`");
    }
}
