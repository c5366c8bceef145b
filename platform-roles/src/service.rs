//! Role lifecycle service.
//!
//! Reads, creates, patches and updates roles. Scheme-managed roles returned
//! by name are merged with the permissions granted one scope up, and an
//! update is propagated to every dependent channel role with one
//! `role.updated` notification each.

use platform_events::{EventPublisher, RoleEvent};
use platform_rbac::{ImpactScope, Role, RolePatch};
use std::sync::Arc;

use crate::config::RoleServiceConfig;
use crate::error::{RoleError, RoleResult};
use crate::store::RoleStore;

/// Application service for role lifecycle operations.
///
/// The save in [`update_role`](Self::update_role) and the cascade that
/// follows it are not atomic: if recomputing dependents fails the saved
/// role stays saved and the error is returned. Calling `update_role` again
/// with the same role re-runs the cascade.
#[derive(Clone)]
pub struct RoleService {
    store: Arc<dyn RoleStore>,
    publisher: Arc<dyn EventPublisher>,
    config: Arc<RoleServiceConfig>,
}

impl std::fmt::Debug for RoleService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoleService")
            .field("config", &self.config)
            .finish()
    }
}

impl RoleService {
    /// Creates a new role service.
    #[must_use]
    pub fn new(
        store: Arc<dyn RoleStore>,
        publisher: Arc<dyn EventPublisher>,
        config: RoleServiceConfig,
    ) -> Self {
        Self {
            store,
            publisher,
            config: Arc::new(config),
        }
    }

    /// Configuration the service was built with.
    pub fn config(&self) -> &RoleServiceConfig {
        &self.config
    }

    /// Fetch a role by id as stored, without merging.
    pub async fn get_role(&self, id: &str) -> RoleResult<Role> {
        Ok(self.store.get(id).await?)
    }

    /// Fetch every role as stored, without merging.
    pub async fn get_all_roles(&self) -> RoleResult<Vec<Role>> {
        Ok(self.store.get_all().await?)
    }

    /// Fetch a role by name with higher-scoped permissions merged in.
    pub async fn get_role_by_name(&self, name: &str) -> RoleResult<Role> {
        let role = self.store.get_by_name(name).await?;
        let mut roles = [role];
        self.merge_higher_scoped_permissions(&mut roles).await?;
        let [role] = roles;
        Ok(role)
    }

    /// Fetch roles by name with higher-scoped permissions merged in.
    ///
    /// Names without a role are omitted from the result.
    pub async fn get_roles_by_names(&self, names: &[String]) -> RoleResult<Vec<Role>> {
        let mut roles = self.store.get_by_names(names).await?;
        self.merge_higher_scoped_permissions(&mut roles).await?;
        Ok(roles)
    }

    /// Overwrite the moderated permissions of every scheme-managed role in
    /// `roles` with the higher scope's values.
    ///
    /// Performs one batched higher-scope lookup, and none at all when no
    /// role is scheme-managed. Roles the higher scope does not know are left
    /// as stored. Never writes to the store.
    pub async fn merge_higher_scoped_permissions(&self, roles: &mut [Role]) -> RoleResult<()> {
        let names: Vec<String> = roles
            .iter()
            .filter(|role| role.scheme_managed)
            .map(|role| role.name.clone())
            .collect();

        if names.is_empty() {
            return Ok(());
        }

        let higher_scoped = self.store.higher_scoped_permissions(&names).await?;

        for role in roles.iter_mut().filter(|role| role.scheme_managed) {
            if let Some(permissions) = higher_scoped.get(&role.name) {
                role.merge_higher_scoped_permissions(
                    permissions,
                    &self.config.moderated_permissions,
                );
            }
        }

        Ok(())
    }

    /// Persist a new custom role.
    ///
    /// Id and timestamps are cleared for the store to assign, and the role
    /// is never built-in or scheme-managed regardless of the input.
    pub async fn create_role(&self, mut role: Role) -> RoleResult<Role> {
        role.reset_for_create();
        role.validate()?;

        let created = self.store.save(role).await?;

        tracing::info!(role_id = %created.id, role = %created.name, "Role created");

        Ok(created)
    }

    /// Apply a patch and update the role.
    ///
    /// A patch whose permissions equal the role's current permissions is a
    /// no-op: the role is returned unchanged and the store is not touched.
    pub async fn patch_role(&self, mut role: Role, patch: &RolePatch) -> RoleResult<Role> {
        if role.patch_is_noop(patch) {
            tracing::debug!(role = %role.name, "Patch leaves permissions unchanged, skipping update");
            return Ok(role);
        }

        role.patch(patch);
        self.update_role(role).await
    }

    /// Persist a role and propagate the change to its dependent roles.
    ///
    /// Built-in system and team roles have no dependents. A built-in channel
    /// role affects every channel scheme role; any other role affects the
    /// channel roles under the team scheme that defines it. Dependents are
    /// merged and each gets one `role.updated` notification. Returns the
    /// saved role.
    pub async fn update_role(&self, role: Role) -> RoleResult<Role> {
        role.validate()?;

        let saved = self.store.save(role).await?;

        let scope = self.config.built_in_roles.impact_scope(&saved.name);
        let impacted = match scope {
            ImpactScope::None => {
                tracing::debug!(role = %saved.name, "Built-in role updated, nothing to cascade");
                return Ok(saved);
            }
            ImpactScope::AllChannelSchemes => self.store.all_channel_scheme_roles().await,
            ImpactScope::ChannelsUnderTeamRole => {
                self.store.channel_roles_under_team_role(&saved.name).await
            }
        };

        let mut impacted = match impacted {
            Ok(roles) => roles,
            Err(e) => {
                tracing::warn!(
                    role_id = %saved.id,
                    role = %saved.name,
                    error = %e,
                    "Role saved but dependent roles could not be loaded"
                );
                return Err(e.into());
            }
        };

        if let Err(e) = self.merge_higher_scoped_permissions(&mut impacted).await {
            tracing::warn!(
                role_id = %saved.id,
                role = %saved.name,
                error = %e,
                "Role saved but dependent roles could not be merged"
            );
            return Err(e);
        }

        for role in &impacted {
            self.send_updated_role_event(role);
        }

        tracing::info!(
            role_id = %saved.id,
            role = %saved.name,
            scope = ?scope,
            impacted = impacted.len(),
            "Role updated"
        );

        Ok(saved)
    }

    /// Ensure every named role exists.
    ///
    /// Fails with [`RoleError::RoleNotFound`] naming the first missing role
    /// in input order.
    pub async fn check_roles_exist(&self, names: &[String]) -> RoleResult<()> {
        let roles = self.get_roles_by_names(names).await?;

        match names
            .iter()
            .find(|name| !roles.iter().any(|role| &role.name == *name))
        {
            Some(missing) => Err(RoleError::RoleNotFound(missing.clone())),
            None => Ok(()),
        }
    }

    fn send_updated_role_event(&self, role: &Role) {
        match (RoleEvent::Updated { role: role.clone() }).to_event() {
            Ok(event) => self.publisher.submit(event),
            Err(e) => {
                tracing::warn!(role = %role.name, error = %e, "Failed to build role event");
            }
        }
    }
}
