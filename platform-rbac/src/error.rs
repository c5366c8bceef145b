//! Error types for role validation

use thiserror::Error;

/// A role field failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid role {field}: {reason}")]
pub struct ValidationError {
    /// The offending field (`name`, `display_name`, ...).
    pub field: &'static str,
    /// Why the value was rejected.
    pub reason: String,
}

impl ValidationError {
    /// Create a new validation error.
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}
