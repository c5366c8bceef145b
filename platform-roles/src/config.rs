//! Role service configuration.
//!
//! The built-in role table and the moderated-permission catalog are fixed
//! when the service is constructed. Defaults match the shipped role set;
//! the moderated catalog can be overridden from the environment.

use platform_rbac::{BuiltInRoles, ModeratedPermissions};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Error message.
        message: String,
    },
}

/// Configuration for [`RoleService`](crate::RoleService).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoleServiceConfig {
    /// Built-in role names and their update impact.
    pub built_in_roles: BuiltInRoles,

    /// Permissions a higher scope dictates on scheme-managed roles.
    pub moderated_permissions: ModeratedPermissions,
}

impl RoleServiceConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `RBAC_MODERATED_PERMISSIONS`: comma-separated moderated permission
    ///   identifiers (default: the channel moderated set)
    pub fn from_env() -> Result<Self, ConfigError> {
        let default = Self::default();

        let moderated_permissions = match std::env::var("RBAC_MODERATED_PERMISSIONS") {
            Ok(raw) => parse_permission_list("RBAC_MODERATED_PERMISSIONS", &raw)?,
            Err(_) => default.moderated_permissions,
        };

        let config = Self {
            built_in_roles: default.built_in_roles,
            moderated_permissions,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that the tables can drive update propagation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.built_in_roles.channel_roles().next().is_none() {
            return Err(ConfigError::InvalidValue {
                key: "built_in_roles".to_string(),
                message: "at least one built-in channel role is required".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_permission_list(key: &str, raw: &str) -> Result<ModeratedPermissions, ConfigError> {
    let ids: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if let Some(bad) = ids.iter().find(|id| id.chars().any(char::is_whitespace)) {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("'{bad}' is not a valid permission identifier"),
        });
    }

    Ok(ModeratedPermissions::new(ids))
}
