//! Error types for the resource algebra.

use thiserror::Error;

/// Result type alias for resource operations.
pub type ResourceResult<T> = Result<T, ResourceError>;

/// Errors that can occur while building or combining resources.
#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("empty resource specification")]
    EmptySpec,

    #[error("malformed resource entry: {0:?} (expected name:value)")]
    MalformedEntry(String),

    #[error("malformed {kind} value {value:?} for resource {name:?}")]
    MalformedValue {
        name: String,
        kind: &'static str,
        value: String,
    },

    #[error("resource {name:?} declared as {found}, previously {expected}")]
    KindConflict {
        name: String,
        expected: &'static str,
        found: &'static str,
    },
}
