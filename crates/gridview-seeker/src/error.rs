//! Error types for the seeker crate.

use thiserror::Error;

/// Errors raised while building clauses.
#[derive(Debug, Error)]
pub enum SeekerError {
    /// Operator is not valid for the given value type.
    #[error("operator '{op}' is not valid for {value_type} values")]
    InvalidOperatorForType {
        op: &'static str,
        value_type: &'static str,
    },
}

/// Result type for seeker operations.
pub type Result<T> = std::result::Result<T, SeekerError>;
