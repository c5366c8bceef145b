//! # Platform Roles
//!
//! Role lifecycle for the Relay platform's scoped permission schemes.
//!
//! ## Overview
//!
//! The platform-roles crate handles:
//! - **Reads**: Roles fetched by name come back with their moderated
//!   permissions taken from the scope above
//! - **Writes**: Creating, patching and updating roles
//! - **Propagation**: An update notifies every dependent channel role
//! - **Storage**: The [`RoleStore`] port and an in-memory implementation
//!
//! ## Usage
//!
//! ```rust,no_run
//! use platform_events::{BusDispatcher, DispatcherConfig, MemoryEventBus};
//! use platform_rbac::{PermissionSet, Role, RolePatch};
//! use platform_roles::{MemoryRoleStore, RoleService, RoleServiceConfig};
//! use std::sync::Arc;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(MemoryRoleStore::new());
//!     let bus = Arc::new(MemoryEventBus::new());
//!     let dispatcher = Arc::new(BusDispatcher::new(bus, DispatcherConfig::from_env()));
//!     let service = RoleService::new(store, dispatcher, RoleServiceConfig::from_env()?);
//!
//!     let role = service
//!         .create_role(Role::new("moderator", PermissionSet::from_strings(&["create_post"])))
//!         .await?;
//!
//!     let patch = RolePatch::permissions(PermissionSet::from_strings(&["create_post", "add_reaction"]));
//!     service.patch_role(role, &patch).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod memory;
pub mod scheme;
pub mod service;
pub mod store;

// Re-export main types
pub use config::{ConfigError, RoleServiceConfig};
pub use error::{RoleError, RoleResult, StoreError, StoreResult};
pub use memory::{MemoryRoleStore, RoleStoreStats};
pub use scheme::{ChannelRoleNames, Scheme, SchemeScope, TeamRoleNames};
pub use service::RoleService;
pub use store::{HigherScopedPermissions, RoleStore};
