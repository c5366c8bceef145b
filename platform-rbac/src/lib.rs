//! # Platform RBAC (Role-Based Access Control)
//!
//! This crate provides the role model for the Relay platform's scoped
//! permission schemes.
//!
//! ## Overview
//!
//! The platform-rbac crate handles:
//! - **Roles**: Named permission bundles with patch and validation rules
//! - **Permission Sets**: Order-free sets of permission identifiers
//! - **Moderation**: Which permissions a higher scope dictates
//! - **Built-in Roles**: The system-shipped role table and update impact
//! - **Role Strings**: Flat whitespace-separated role lists
//!
//! ## Architecture
//!
//! ```text
//! system scheme ─→ team scheme ─→ channel scheme
//!   system_*         team_*         channel_*
//!
//! A scheme-managed channel role keeps its own unmoderated permissions and
//! takes every moderated permission from the same slot one scope up.
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use platform_rbac::{ModeratedPermissions, PermissionSet, Role, RolePatch};
//!
//! let mut role = Role::new(
//!     "team_a_channel_user",
//!     PermissionSet::from_strings(&["read_channel", "create_post"]),
//! )
//! .scheme_managed();
//!
//! // The team scheme has switched posting off for its channels.
//! let higher = PermissionSet::from_strings(&["read_channel"]);
//! role.merge_higher_scoped_permissions(&higher, &ModeratedPermissions::default());
//! assert!(!role.permissions.has("create_post"));
//! assert!(role.permissions.has("read_channel"));
//!
//! // Patching with the current permissions is a no-op.
//! let patch = RolePatch::permissions(role.permissions.clone());
//! assert!(role.patch_is_noop(&patch));
//! ```
//!
//! ## Integration
//!
//! - `platform-roles`: lifecycle service that persists roles and cascades
//!   updates to dependent channel roles
//! - `platform-events`: `role.updated` notifications

pub mod builtin;
pub mod error;
pub mod moderation;
pub mod permissions;
pub mod role;
pub mod role_string;

// Re-export main types for convenience
pub use builtin::{BuiltInRoles, ChannelRoleSlot, ImpactScope};
pub use error::ValidationError;
pub use moderation::ModeratedPermissions;
pub use permissions::PermissionSet;
pub use role::{Role, RolePatch};
pub use role_string::remove_roles;
