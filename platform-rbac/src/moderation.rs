//! # Moderated Permissions
//!
//! Classification of permission identifiers into *moderated* and
//! *unmoderated*. On a scheme-managed role, a moderated permission is
//! dictated by the next scope up; an unmoderated one keeps whatever the
//! role itself stores.

use serde::{Deserialize, Serialize};

use crate::permissions::PermissionSet;

/// Permission to create posts in a channel.
pub const PERMISSION_CREATE_POST: &str = "create_post";
/// Permission to add reactions to posts.
pub const PERMISSION_ADD_REACTION: &str = "add_reaction";
/// Permission to remove reactions from posts.
pub const PERMISSION_REMOVE_REACTION: &str = "remove_reaction";
/// Permission to manage members of public channels.
pub const PERMISSION_MANAGE_PUBLIC_CHANNEL_MEMBERS: &str = "manage_public_channel_members";
/// Permission to manage members of private channels.
pub const PERMISSION_MANAGE_PRIVATE_CHANNEL_MEMBERS: &str = "manage_private_channel_members";
/// Permission to use `@channel`, `@all` and `@here` mentions.
pub const PERMISSION_USE_CHANNEL_MENTIONS: &str = "use_channel_mentions";

/// The set of permission identifiers whose value on a scheme-managed role
/// is constrained by the higher scope.
///
/// This is configuration data: it is owned by whoever constructs the role
/// service and never changes for the lifetime of that service.
///
/// # Example
///
/// ```
/// use platform_rbac::ModeratedPermissions;
///
/// let moderated = ModeratedPermissions::default();
/// assert!(moderated.is_moderated("create_post"));
/// assert!(!moderated.is_moderated("read_channel"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModeratedPermissions {
    permissions: PermissionSet,
}

impl ModeratedPermissions {
    /// Create a catalog from explicit identifiers.
    pub fn new<I, S>(permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            permissions: permissions.into_iter().collect(),
        }
    }

    /// Create an empty catalog (nothing is moderated).
    pub fn none() -> Self {
        Self {
            permissions: PermissionSet::new(),
        }
    }

    /// Check whether a permission identifier is moderated.
    pub fn is_moderated(&self, permission: &str) -> bool {
        self.permissions.has(permission)
    }

    /// Number of moderated identifiers.
    pub fn len(&self) -> usize {
        self.permissions.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }
}

impl Default for ModeratedPermissions {
    /// The channel-level moderated permissions.
    fn default() -> Self {
        Self::new([
            PERMISSION_CREATE_POST,
            PERMISSION_ADD_REACTION,
            PERMISSION_REMOVE_REACTION,
            PERMISSION_MANAGE_PUBLIC_CHANNEL_MEMBERS,
            PERMISSION_MANAGE_PRIVATE_CHANNEL_MEMBERS,
            PERMISSION_USE_CHANNEL_MENTIONS,
        ])
    }
}
