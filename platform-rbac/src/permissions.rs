//! # Permissions
//!
//! Permission identifiers and the set type stored on roles.
//! A permission is an opaque identifier such as `create_post` or
//! `manage_public_channel_members`; the catalog of valid identifiers is
//! owned by the calling layer.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A set of permission identifiers that can be assigned to a role.
///
/// Insertion order is irrelevant and duplicates collapse, so two sets
/// compare equal whenever they hold the same identifiers. Serializes as a
/// sorted array of strings.
///
/// # Example
///
/// ```
/// use platform_rbac::permissions::PermissionSet;
///
/// let a = PermissionSet::from_strings(&["create_post", "read_channel"]);
/// let b = PermissionSet::from_strings(&["read_channel", "create_post", "create_post"]);
///
/// assert_eq!(a, b);
/// assert_eq!(a.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet {
    permissions: BTreeSet<String>,
}

impl PermissionSet {
    /// Create a new empty permission set.
    pub fn new() -> Self {
        Self {
            permissions: BTreeSet::new(),
        }
    }

    /// Create a permission set from string identifiers.
    ///
    /// # Arguments
    ///
    /// * `permissions` - Permission identifiers, duplicates allowed
    pub fn from_strings<S: AsRef<str>>(permissions: &[S]) -> Self {
        permissions.iter().map(|p| p.as_ref().to_string()).collect()
    }

    /// Add a permission to the set.
    ///
    /// # Returns
    ///
    /// `true` if the permission was not already present
    pub fn add(&mut self, permission: impl Into<String>) -> bool {
        self.permissions.insert(permission.into())
    }

    /// Check if the set contains a permission.
    pub fn has(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }

    /// Iterate over the permissions in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.permissions.iter().map(String::as_str)
    }

    /// Get the number of permissions in the set.
    pub fn len(&self) -> usize {
        self.permissions.len()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }

    /// Keep only the permissions for which `keep` returns `true`.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&str) -> bool,
    {
        self.permissions.retain(|p| keep(p));
    }
}

impl<S: Into<String>> FromIterator<S> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            permissions: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Into<String>> Extend<S> for PermissionSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.permissions.extend(iter.into_iter().map(Into::into));
    }
}
