//! Schemes: named bundles of role definitions attached at team or channel
//! scope.
//!
//! A team scheme defines team roles plus the channel roles its channels
//! inherit; a channel scheme defines channel roles only and may point at
//! the team scheme one scope up.

use platform_rbac::ChannelRoleSlot;
use serde::{Deserialize, Serialize};

/// Scope a scheme is attached at.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SchemeScope {
    /// Attached to a team
    Team,
    /// Attached to a channel
    Channel,
}

/// Role names defined by a team scheme for its team-level positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRoleNames {
    /// Team admin role name
    pub admin: String,
    /// Team member role name
    pub user: String,
    /// Team guest role name
    pub guest: String,
}

/// Role names defined by a scheme for the three channel positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelRoleNames {
    /// Channel admin role name
    pub admin: String,
    /// Channel member role name
    pub user: String,
    /// Channel guest role name
    pub guest: String,
}

impl ChannelRoleNames {
    /// Role name occupying a slot.
    pub fn get(&self, slot: ChannelRoleSlot) -> &str {
        match slot {
            ChannelRoleSlot::Admin => &self.admin,
            ChannelRoleSlot::User => &self.user,
            ChannelRoleSlot::Guest => &self.guest,
        }
    }

    /// Slot a role name occupies, if any.
    pub fn slot_of(&self, name: &str) -> Option<ChannelRoleSlot> {
        ChannelRoleSlot::all()
            .into_iter()
            .find(|slot| self.get(*slot) == name)
    }

    /// All three names in guest, user, admin order.
    pub fn names(&self) -> [&str; 3] {
        [&self.guest, &self.user, &self.admin]
    }
}

/// A scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scheme {
    /// Scheme ID
    pub id: String,
    /// Scheme name
    pub name: String,
    /// Attachment scope
    pub scope: SchemeScope,
    /// Team scheme one scope up (channel schemes only)
    pub parent_id: Option<String>,
    /// Team role names (team schemes only)
    pub team_roles: Option<TeamRoleNames>,
    /// Channel role names
    pub channel_roles: ChannelRoleNames,
}

impl Scheme {
    /// Create a team scheme whose role names are derived from `id`.
    ///
    /// # Example
    ///
    /// ```
    /// use platform_roles::{Scheme, SchemeScope};
    ///
    /// let scheme = Scheme::team("eng");
    /// assert_eq!(scheme.scope, SchemeScope::Team);
    /// assert_eq!(scheme.channel_roles.user, "eng_channel_user");
    /// assert_eq!(scheme.team_roles.unwrap().admin, "eng_team_admin");
    /// ```
    pub fn team(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            scope: SchemeScope::Team,
            parent_id: None,
            team_roles: Some(TeamRoleNames {
                admin: format!("{id}_team_admin"),
                user: format!("{id}_team_user"),
                guest: format!("{id}_team_guest"),
            }),
            channel_roles: derived_channel_roles(&id),
            id,
        }
    }

    /// Create a channel scheme whose role names are derived from `id`.
    pub fn channel(id: impl Into<String>, parent_id: Option<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            scope: SchemeScope::Channel,
            parent_id,
            team_roles: None,
            channel_roles: derived_channel_roles(&id),
            id,
        }
    }

    /// All role names the scheme defines.
    pub fn role_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.channel_roles.names().to_vec();
        if let Some(team) = &self.team_roles {
            names.extend([team.guest.as_str(), team.user.as_str(), team.admin.as_str()]);
        }
        names
    }
}

fn derived_channel_roles(id: &str) -> ChannelRoleNames {
    ChannelRoleNames {
        admin: format!("{id}_channel_admin"),
        user: format!("{id}_channel_user"),
        guest: format!("{id}_channel_guest"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_lookup() {
        let scheme = Scheme::channel("c1", Some("t1".to_string()));
        assert_eq!(
            scheme.channel_roles.slot_of("c1_channel_admin"),
            Some(ChannelRoleSlot::Admin)
        );
        assert_eq!(scheme.channel_roles.slot_of("t1_channel_admin"), None);
        assert_eq!(scheme.channel_roles.get(ChannelRoleSlot::Guest), "c1_channel_guest");
    }

    #[test]
    fn test_role_names() {
        assert_eq!(Scheme::channel("c1", None).role_names().len(), 3);
        assert_eq!(Scheme::team("t1").role_names().len(), 6);
    }
}
