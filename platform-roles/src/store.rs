//! Role store capability.
//!
//! The lifecycle service consumes persistence through this trait only;
//! scheme hierarchy decisions (which scope is "higher") are made by the
//! implementation.

use async_trait::async_trait;
use platform_rbac::{PermissionSet, Role};
use std::collections::HashMap;

use crate::error::StoreResult;

/// Higher-scope permissions keyed by role name.
pub type HigherScopedPermissions = HashMap<String, PermissionSet>;

/// Persistence port for roles and scheme-derived lookups.
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// Fetch a role by id. Missing is [`StoreError::NotFound`](crate::StoreError::NotFound).
    async fn get(&self, id: &str) -> StoreResult<Role>;

    /// Fetch every role.
    async fn get_all(&self) -> StoreResult<Vec<Role>>;

    /// Fetch a role by name. Missing is [`StoreError::NotFound`](crate::StoreError::NotFound).
    async fn get_by_name(&self, name: &str) -> StoreResult<Role>;

    /// Fetch roles by name; names without a role are silently omitted.
    async fn get_by_names(&self, names: &[String]) -> StoreResult<Vec<Role>>;

    /// Insert (empty id) or update a role, returning the stored record.
    async fn save(&self, role: Role) -> StoreResult<Role>;

    /// Permission sets granted one scope up for each of `names`, in a
    /// single lookup. Names with no higher scope have no entry.
    async fn higher_scoped_permissions(&self, names: &[String])
        -> StoreResult<HigherScopedPermissions>;

    /// Every channel role of every channel-scope scheme.
    async fn all_channel_scheme_roles(&self) -> StoreResult<Vec<Role>>;

    /// Channel roles of the channel schemes below the team scheme that
    /// defines `name` as one of its channel roles.
    async fn channel_roles_under_team_role(&self, name: &str) -> StoreResult<Vec<Role>>;
}
