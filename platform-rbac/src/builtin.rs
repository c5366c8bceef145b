//! # Built-in Roles
//!
//! Names of the system-shipped scheme-managed roles and the table that
//! decides how far an update to a role propagates.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// System-scope guest role.
pub const SYSTEM_GUEST_ROLE: &str = "system_guest";
/// System-scope user role.
pub const SYSTEM_USER_ROLE: &str = "system_user";
/// System-scope admin role.
pub const SYSTEM_ADMIN_ROLE: &str = "system_admin";
/// Team-scope guest role.
pub const TEAM_GUEST_ROLE: &str = "team_guest";
/// Team-scope user role.
pub const TEAM_USER_ROLE: &str = "team_user";
/// Team-scope admin role.
pub const TEAM_ADMIN_ROLE: &str = "team_admin";
/// Channel-scope guest role.
pub const CHANNEL_GUEST_ROLE: &str = "channel_guest";
/// Channel-scope user role.
pub const CHANNEL_USER_ROLE: &str = "channel_user";
/// Channel-scope admin role.
pub const CHANNEL_ADMIN_ROLE: &str = "channel_admin";

/// One of the three channel role positions every scheme defines.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ChannelRoleSlot {
    /// Channel guest
    Guest,
    /// Channel member
    User,
    /// Channel admin
    Admin,
}

impl ChannelRoleSlot {
    /// All slots in guest, user, admin order.
    pub fn all() -> [ChannelRoleSlot; 3] {
        [Self::Guest, Self::User, Self::Admin]
    }

    /// Name of the built-in role occupying this slot.
    pub fn built_in_role_name(&self) -> &'static str {
        match self {
            Self::Guest => CHANNEL_GUEST_ROLE,
            Self::User => CHANNEL_USER_ROLE,
            Self::Admin => CHANNEL_ADMIN_ROLE,
        }
    }
}

/// How far an update to a role must be propagated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpactScope {
    /// System or team built-in: nothing depends on it.
    None,
    /// Built-in channel role: every channel role of every scheme.
    AllChannelSchemes,
    /// Any other role: channel roles under schemes whose team role it is.
    ChannelsUnderTeamRole,
}

/// Immutable table of built-in role names.
///
/// Owned by the role service from construction on; never mutated.
///
/// # Example
///
/// ```
/// use platform_rbac::{BuiltInRoles, ImpactScope};
///
/// let roles = BuiltInRoles::default();
/// assert_eq!(roles.impact_scope("team_admin"), ImpactScope::None);
/// assert_eq!(roles.impact_scope("channel_user"), ImpactScope::AllChannelSchemes);
/// assert_eq!(roles.impact_scope("a1b2c3"), ImpactScope::ChannelsUnderTeamRole);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuiltInRoles {
    /// Every built-in scheme-managed role, channel roles included.
    scheme_managed: BTreeSet<String>,
    /// The built-in channel-scope roles.
    channel: BTreeSet<String>,
}

impl BuiltInRoles {
    /// Build a table from explicit name lists.
    ///
    /// Channel role names are always treated as built-in as well.
    pub fn new<I, J, S, T>(scheme_managed: I, channel: J) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        let channel: BTreeSet<String> = channel.into_iter().map(Into::into).collect();
        let mut scheme_managed: BTreeSet<String> =
            scheme_managed.into_iter().map(Into::into).collect();
        scheme_managed.extend(channel.iter().cloned());

        Self {
            scheme_managed,
            channel,
        }
    }

    /// Check whether a name is any built-in scheme-managed role.
    pub fn is_built_in(&self, name: &str) -> bool {
        self.scheme_managed.contains(name)
    }

    /// Check whether a name is a built-in channel-scope role.
    pub fn is_channel_role(&self, name: &str) -> bool {
        self.channel.contains(name)
    }

    /// Built-in channel-scope role names.
    pub fn channel_roles(&self) -> impl Iterator<Item = &str> {
        self.channel.iter().map(String::as_str)
    }

    /// Classify how far an update to the named role propagates.
    pub fn impact_scope(&self, name: &str) -> ImpactScope {
        if self.is_channel_role(name) {
            ImpactScope::AllChannelSchemes
        } else if self.is_built_in(name) {
            ImpactScope::None
        } else {
            ImpactScope::ChannelsUnderTeamRole
        }
    }
}

impl Default for BuiltInRoles {
    fn default() -> Self {
        Self::new(
            [
                SYSTEM_GUEST_ROLE,
                SYSTEM_USER_ROLE,
                SYSTEM_ADMIN_ROLE,
                TEAM_GUEST_ROLE,
                TEAM_USER_ROLE,
                TEAM_ADMIN_ROLE,
            ],
            [CHANNEL_GUEST_ROLE, CHANNEL_USER_ROLE, CHANNEL_ADMIN_ROLE],
        )
    }
}
