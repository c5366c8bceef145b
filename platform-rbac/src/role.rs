//! # Roles
//!
//! A role is a named, persisted bundle of permissions. Roles attached to a
//! scheme are *scheme-managed*: their moderated permissions are dictated by
//! the same-named role one scope up.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::moderation::ModeratedPermissions;
use crate::permissions::PermissionSet;

/// Maximum length of a role name.
pub const ROLE_NAME_MAX_LENGTH: usize = 64;
/// Maximum length of a role display name.
pub const ROLE_DISPLAY_NAME_MAX_LENGTH: usize = 128;
/// Maximum length of a role description.
pub const ROLE_DESCRIPTION_MAX_LENGTH: usize = 1024;

/// A named permission bundle.
///
/// `id` is empty until the role has been persisted; the timestamps are
/// epoch milliseconds owned by the store.
///
/// # Example
///
/// ```
/// use platform_rbac::{PermissionSet, Role};
///
/// let role = Role::new("moderator", PermissionSet::from_strings(&["create_post"]));
/// assert!(role.id.is_empty());
/// assert!(!role.scheme_managed);
/// assert!(role.permissions.has("create_post"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Store-assigned identifier, empty until persisted.
    #[serde(default)]
    pub id: String,

    /// Stable name used for scheme lookups and built-in recognition.
    pub name: String,

    /// Human-readable name.
    #[serde(default)]
    pub display_name: String,

    /// Free-form description.
    #[serde(default)]
    pub description: String,

    /// Creation time (epoch ms).
    #[serde(default)]
    pub create_at: i64,

    /// Last update time (epoch ms).
    #[serde(default)]
    pub update_at: i64,

    /// Deletion time (epoch ms), zero while live.
    #[serde(default)]
    pub delete_at: i64,

    /// Granted permissions.
    #[serde(default)]
    pub permissions: PermissionSet,

    /// Whether moderated permissions are constrained by the higher scope.
    #[serde(default)]
    pub scheme_managed: bool,

    /// Whether this is a system-shipped role.
    #[serde(default)]
    pub built_in: bool,
}

/// Partial update to a role. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePatch {
    /// Replacement display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Replacement description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Replacement permission set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<PermissionSet>,
}

impl RolePatch {
    /// A patch replacing only the permission set.
    pub fn permissions(permissions: PermissionSet) -> Self {
        Self {
            permissions: Some(permissions),
            ..Self::default()
        }
    }
}

impl Role {
    /// Create an unsaved role.
    pub fn new(name: impl Into<String>, permissions: PermissionSet) -> Self {
        let name = name.into();
        Self {
            display_name: name.clone(),
            name,
            permissions,
            ..Self::default()
        }
    }

    /// Mark the role as scheme-managed.
    pub fn scheme_managed(mut self) -> Self {
        self.scheme_managed = true;
        self
    }

    /// Mark the role as built-in.
    pub fn built_in(mut self) -> Self {
        self.built_in = true;
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Check whether a patch would leave the permission set unchanged.
    ///
    /// Only a patch that carries a permission set equal to the current one
    /// counts; a patch without permissions is never a no-op.
    pub fn patch_is_noop(&self, patch: &RolePatch) -> bool {
        matches!(&patch.permissions, Some(permissions) if *permissions == self.permissions)
    }

    /// Apply the present fields of a patch.
    pub fn patch(&mut self, patch: &RolePatch) {
        if let Some(display_name) = &patch.display_name {
            self.display_name = display_name.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(permissions) = &patch.permissions {
            self.permissions = permissions.clone();
        }
    }

    /// Clear store-owned fields and system flags ahead of creation.
    ///
    /// A created role never carries an id or timestamps and is never
    /// built-in or scheme-managed, whatever the caller supplied.
    pub fn reset_for_create(&mut self) {
        self.id.clear();
        self.create_at = 0;
        self.update_at = 0;
        self.delete_at = 0;
        self.built_in = false;
        self.scheme_managed = false;
    }

    /// Overwrite moderated permissions with the higher scope's values.
    ///
    /// For every moderated identifier the role's effective value is the
    /// higher scope's presence; every other identifier keeps the role's own
    /// stored value. Applying the same inputs twice yields the same set.
    ///
    /// # Example
    ///
    /// ```
    /// use platform_rbac::{ModeratedPermissions, PermissionSet, Role};
    ///
    /// let moderated = ModeratedPermissions::new(["create_post", "add_reaction"]);
    /// let mut role = Role::new("members", PermissionSet::from_strings(&["create_post", "read_channel"]))
    ///     .scheme_managed();
    ///
    /// role.merge_higher_scoped_permissions(&PermissionSet::from_strings(&["add_reaction"]), &moderated);
    ///
    /// assert_eq!(role.permissions, PermissionSet::from_strings(&["add_reaction", "read_channel"]));
    /// ```
    pub fn merge_higher_scoped_permissions(
        &mut self,
        higher_scoped: &PermissionSet,
        moderated: &ModeratedPermissions,
    ) {
        self.permissions.retain(|p| !moderated.is_moderated(p));
        self.permissions
            .extend(higher_scoped.iter().filter(|p| moderated.is_moderated(p)));
    }

    /// Validate the role's fields, ignoring `id` and timestamps.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::new("name", "must not be empty"));
        }
        if self.name.chars().count() > ROLE_NAME_MAX_LENGTH {
            return Err(ValidationError::new(
                "name",
                format!("must be at most {ROLE_NAME_MAX_LENGTH} characters"),
            ));
        }
        if !self
            .name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
        {
            return Err(ValidationError::new(
                "name",
                format!("'{}' may only contain a-z, 0-9, '_' and '-'", self.name),
            ));
        }
        if self.display_name.chars().count() > ROLE_DISPLAY_NAME_MAX_LENGTH {
            return Err(ValidationError::new(
                "display_name",
                format!("must be at most {ROLE_DISPLAY_NAME_MAX_LENGTH} characters"),
            ));
        }
        if self.description.chars().count() > ROLE_DESCRIPTION_MAX_LENGTH {
            return Err(ValidationError::new(
                "description",
                format!("must be at most {ROLE_DESCRIPTION_MAX_LENGTH} characters"),
            ));
        }
        if let Some(bad) = self
            .permissions
            .iter()
            .find(|p| p.is_empty() || p.chars().any(char::is_whitespace))
        {
            return Err(ValidationError::new(
                "permissions",
                format!("'{bad}' is not a valid permission identifier"),
            ));
        }
        Ok(())
    }
}
