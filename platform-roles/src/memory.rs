//! In-memory role store.
//!
//! Suitable for single-process deployments and testing. Holds roles and
//! the scheme hierarchy, and answers the higher-scope and dependent-role
//! lookups from it:
//!
//! ```text
//! built-in channel_* roles
//!   └─ team scheme   (team roles + channel roles its channels inherit)
//!        └─ channel scheme (channel roles, parent_id = team scheme)
//! ```
//!
//! A channel scheme with no parent inherits from the built-in channel roles.

use async_trait::async_trait;
use chrono::Utc;
use platform_rbac::Role;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::scheme::{Scheme, SchemeScope};
use crate::store::{HigherScopedPermissions, RoleStore};

/// Call counters for the in-memory store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleStoreStats {
    /// `save` calls
    pub saves: u64,
    /// `higher_scoped_permissions` calls
    pub higher_scoped_lookups: u64,
    /// `all_channel_scheme_roles` calls
    pub all_channel_scheme_lookups: u64,
    /// `channel_roles_under_team_role` calls
    pub team_role_lookups: u64,
}

#[derive(Debug, Default)]
struct State {
    /// Roles by id
    roles: HashMap<String, Role>,
    /// Role id by name
    names: HashMap<String, String>,
    /// Schemes by id
    schemes: HashMap<String, Scheme>,
}

impl State {
    fn role_by_name(&self, name: &str) -> Option<&Role> {
        self.names.get(name).and_then(|id| self.roles.get(id))
    }

    fn sorted_schemes(&self, scope: SchemeScope) -> Vec<&Scheme> {
        let mut schemes: Vec<&Scheme> = self
            .schemes
            .values()
            .filter(|s| s.scope == scope)
            .collect();
        schemes.sort_by(|a, b| a.id.cmp(&b.id));
        schemes
    }

    fn channel_roles_of(&self, scheme: &Scheme, out: &mut Vec<Role>) {
        for name in scheme.channel_roles.names() {
            if let Some(role) = self.role_by_name(name) {
                out.push(role.clone());
            }
        }
    }

    /// Name of the role one scope up from a channel-scheme role.
    fn higher_scoped_role_name(&self, name: &str) -> Option<String> {
        let (scheme, slot) = self.schemes.values().find_map(|s| {
            (s.scope == SchemeScope::Channel)
                .then(|| s.channel_roles.slot_of(name).map(|slot| (s, slot)))
                .flatten()
        })?;

        let parent = scheme
            .parent_id
            .as_deref()
            .and_then(|id| self.schemes.get(id))
            .filter(|p| p.scope == SchemeScope::Team);

        Some(match parent {
            Some(team) => team.channel_roles.get(slot).to_string(),
            None => slot.built_in_role_name().to_string(),
        })
    }
}

/// In-memory [`RoleStore`].
///
/// # Example
///
/// ```rust,no_run
/// use platform_rbac::{PermissionSet, Role};
/// use platform_roles::{MemoryRoleStore, RoleStore, Scheme};
///
/// async fn example() {
///     let store = MemoryRoleStore::new();
///     store.insert_scheme(Scheme::team("eng")).await.unwrap();
///
///     let role = Role::new("eng_channel_user", PermissionSet::from_strings(&["create_post"]))
///         .scheme_managed();
///     let saved = store.save(role).await.unwrap();
///     assert!(!saved.id.is_empty());
/// }
/// ```
#[derive(Debug, Default)]
pub struct MemoryRoleStore {
    state: RwLock<State>,
    saves: AtomicU64,
    higher_scoped_lookups: AtomicU64,
    all_channel_scheme_lookups: AtomicU64,
    team_role_lookups: AtomicU64,
}

impl MemoryRoleStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a scheme.
    pub async fn insert_scheme(&self, scheme: Scheme) -> StoreResult<Scheme> {
        let mut state = self.state.write().await;
        if state.schemes.contains_key(&scheme.id) {
            return Err(StoreError::Conflict(format!(
                "scheme '{}' already exists",
                scheme.id
            )));
        }
        state.schemes.insert(scheme.id.clone(), scheme.clone());
        Ok(scheme)
    }

    /// Call counters.
    pub fn stats(&self) -> RoleStoreStats {
        RoleStoreStats {
            saves: self.saves.load(Ordering::Relaxed),
            higher_scoped_lookups: self.higher_scoped_lookups.load(Ordering::Relaxed),
            all_channel_scheme_lookups: self.all_channel_scheme_lookups.load(Ordering::Relaxed),
            team_role_lookups: self.team_role_lookups.load(Ordering::Relaxed),
        }
    }
}

#[async_trait]
impl RoleStore for MemoryRoleStore {
    async fn get(&self, id: &str) -> StoreResult<Role> {
        self.state
            .read()
            .await
            .roles
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::role_not_found(id))
    }

    async fn get_all(&self) -> StoreResult<Vec<Role>> {
        let state = self.state.read().await;
        let mut roles: Vec<Role> = state.roles.values().cloned().collect();
        roles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(roles)
    }

    async fn get_by_name(&self, name: &str) -> StoreResult<Role> {
        self.state
            .read()
            .await
            .role_by_name(name)
            .cloned()
            .ok_or_else(|| StoreError::role_not_found(name))
    }

    async fn get_by_names(&self, names: &[String]) -> StoreResult<Vec<Role>> {
        let state = self.state.read().await;
        let mut seen = std::collections::HashSet::new();
        Ok(names
            .iter()
            .filter(|name| seen.insert(name.as_str()))
            .filter_map(|name| state.role_by_name(name).cloned())
            .collect())
    }

    async fn save(&self, mut role: Role) -> StoreResult<Role> {
        self.saves.fetch_add(1, Ordering::Relaxed);

        let mut state = self.state.write().await;
        let now = Utc::now().timestamp_millis();

        if role.id.is_empty() {
            if state.names.contains_key(&role.name) {
                return Err(StoreError::Conflict(format!(
                    "role '{}' already exists",
                    role.name
                )));
            }
            role.id = Uuid::now_v7().simple().to_string();
            role.create_at = now;
            role.update_at = now;
        } else {
            let (previous_name, create_at) = match state.roles.get(&role.id) {
                Some(existing) => (existing.name.clone(), existing.create_at),
                None => return Err(StoreError::role_not_found(role.id.clone())),
            };
            if previous_name != role.name {
                if state.names.contains_key(&role.name) {
                    return Err(StoreError::Conflict(format!(
                        "role '{}' already exists",
                        role.name
                    )));
                }
                state.names.remove(&previous_name);
            }
            role.create_at = create_at;
            role.update_at = now;
        }

        state.names.insert(role.name.clone(), role.id.clone());
        state.roles.insert(role.id.clone(), role.clone());

        tracing::debug!(role_id = %role.id, role = %role.name, "Role saved");

        Ok(role)
    }

    async fn higher_scoped_permissions(
        &self,
        names: &[String],
    ) -> StoreResult<HigherScopedPermissions> {
        self.higher_scoped_lookups.fetch_add(1, Ordering::Relaxed);

        let state = self.state.read().await;
        let mut result = HigherScopedPermissions::new();
        for name in names {
            let higher = state
                .higher_scoped_role_name(name)
                .and_then(|higher_name| state.role_by_name(&higher_name));
            if let Some(higher) = higher {
                result.insert(name.clone(), higher.permissions.clone());
            }
        }
        Ok(result)
    }

    async fn all_channel_scheme_roles(&self) -> StoreResult<Vec<Role>> {
        self.all_channel_scheme_lookups.fetch_add(1, Ordering::Relaxed);

        let state = self.state.read().await;
        let mut roles = Vec::new();
        for scheme in state.sorted_schemes(SchemeScope::Channel) {
            state.channel_roles_of(scheme, &mut roles);
        }
        Ok(roles)
    }

    async fn channel_roles_under_team_role(&self, name: &str) -> StoreResult<Vec<Role>> {
        self.team_role_lookups.fetch_add(1, Ordering::Relaxed);

        let state = self.state.read().await;
        let team_ids: Vec<&str> = state
            .sorted_schemes(SchemeScope::Team)
            .into_iter()
            .filter(|team| team.channel_roles.slot_of(name).is_some())
            .map(|team| team.id.as_str())
            .collect();

        let mut roles = Vec::new();
        for scheme in state.sorted_schemes(SchemeScope::Channel) {
            if scheme
                .parent_id
                .as_deref()
                .is_some_and(|parent| team_ids.contains(&parent))
            {
                state.channel_roles_of(scheme, &mut roles);
            }
        }
        Ok(roles)
    }
}
