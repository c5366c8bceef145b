//! Error types for role storage and lifecycle operations
//!
//! Store failures are propagated to the caller unchanged, tagged as
//! [`RoleError::Store`]; the lifecycle layer only adds the existence-check
//! and validation kinds.

use platform_rbac::ValidationError;
use thiserror::Error;

/// Errors raised by a [`RoleStore`](crate::RoleStore) implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A single-record lookup found nothing
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of record, e.g. `role`
        entity: &'static str,
        /// Id or name that was looked up
        id: String,
    },

    /// A uniqueness constraint was violated
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The store rejected the record
    #[error("Invalid record: {0}")]
    Invalid(String),

    /// The backing store could not be reached
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// Any other persistence failure
    #[error("Internal store error: {0}")]
    Internal(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    /// Shorthand for a missing role.
    pub fn role_not_found(id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity: "role",
            id: id.into(),
        }
    }
}

/// Role lifecycle error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoleError {
    /// Underlying persistence or lookup failure
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A role named in an existence check does not exist
    #[error("Role not found: {0}")]
    RoleNotFound(String),

    /// The role failed validation before reaching the store
    #[error(transparent)]
    InvalidRole(#[from] ValidationError),
}

/// Result type for role lifecycle operations.
pub type RoleResult<T> = Result<T, RoleError>;

impl RoleError {
    /// Check if this error should be logged at error level.
    ///
    /// Missing or invalid roles are caller mistakes, not server faults.
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            RoleError::Store(
                StoreError::Unavailable(_) | StoreError::Internal(_)
            )
        )
    }

    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            RoleError::Store(StoreError::NotFound { .. }) => 404,
            RoleError::Store(StoreError::Conflict(_)) => 409,
            RoleError::Store(StoreError::Invalid(_)) => 400,
            RoleError::Store(StoreError::Unavailable(_)) => 503,
            RoleError::Store(StoreError::Internal(_)) => 500,
            RoleError::RoleNotFound(_) => 400,
            RoleError::InvalidRole(_) => 400,
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            RoleError::Store(StoreError::NotFound { .. }) => "STORE_NOT_FOUND",
            RoleError::Store(StoreError::Conflict(_)) => "STORE_CONFLICT",
            RoleError::Store(StoreError::Invalid(_)) => "STORE_INVALID",
            RoleError::Store(StoreError::Unavailable(_)) => "STORE_UNAVAILABLE",
            RoleError::Store(StoreError::Internal(_)) => "STORE_FAILURE",
            RoleError::RoleNotFound(_) => "ROLE_NOT_FOUND",
            RoleError::InvalidRole(_) => "INVALID_ROLE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_convert() {
        let err: RoleError = StoreError::role_not_found("abc").into();
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.error_code(), "STORE_NOT_FOUND");
        assert_eq!(err.to_string(), "role not found: abc");
        assert!(!err.is_server_error());

        let err: RoleError = StoreError::Unavailable("db down".to_string()).into();
        assert!(err.is_server_error());
        assert_eq!(err.status_code(), 503);
    }

    #[test]
    fn test_role_not_found_carries_name() {
        let err = RoleError::RoleNotFound("team_moderator".to_string());
        assert_eq!(err.to_string(), "Role not found: team_moderator");
        assert_eq!(err.error_code(), "ROLE_NOT_FOUND");
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn test_validation_error_converts() {
        let err: RoleError = ValidationError::new("name", "must not be empty").into();
        assert_eq!(err.error_code(), "INVALID_ROLE");
        assert_eq!(err.to_string(), "Invalid role name: must not be empty");
    }
}
