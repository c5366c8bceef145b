//! Event types for role change notifications
//!
//! This module defines the event envelope delivered to connected clients
//! and the typed role events carried inside it.

use chrono::{DateTime, Utc};
use platform_rbac::Role;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::bus::EventBusResult;

/// Event type emitted when a role's effective permissions may have changed.
pub const ROLE_UPDATED_EVENT: &str = "role.updated";

/// Event envelope.
///
/// Every notification travels in this envelope; listeners route on
/// `event_type` and decode `payload` with [`Event::parse_payload`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Unique event ID
    pub id: Uuid,

    /// Event type (e.g., "role.updated")
    pub event_type: String,

    /// Timestamp when event was created
    pub timestamp: DateTime<Utc>,

    /// Event version for schema evolution
    pub version: u32,

    /// Event payload
    pub payload: serde_json::Value,
}

impl Event {
    /// Create a new event.
    ///
    /// # Arguments
    ///
    /// * `event_type` - The event type string
    /// * `payload` - The event payload
    pub fn new(event_type: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            id: Uuid::now_v7(),
            event_type: event_type.into(),
            timestamp: Utc::now(),
            version: 1,
            payload,
        }
    }

    /// Get the topic for this event.
    ///
    /// Topics are the dotted event type, e.g. `role.updated`.
    pub fn topic(&self) -> String {
        self.event_type.clone()
    }

    /// Parse the payload into a specific type.
    pub fn parse_payload<T: for<'de> Deserialize<'de>>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.payload.clone())
    }
}

/// Role events.
#[derive(Debug, Clone)]
pub enum RoleEvent {
    /// A role's definition or effective permissions were recomputed.
    Updated {
        /// Full role state after merging higher-scoped permissions.
        role: Role,
    },
}

impl RoleEvent {
    /// Event type string for this variant.
    pub fn event_type(&self) -> &'static str {
        match self {
            RoleEvent::Updated { .. } => ROLE_UPDATED_EVENT,
        }
    }

    /// Convert to generic event.
    ///
    /// The payload is `{"role": <role>}`.
    pub fn to_event(&self) -> EventBusResult<Event> {
        let payload = match self {
            RoleEvent::Updated { role } => serde_json::to_value(RoleUpdatedRef { role })?,
        };
        Ok(Event::new(self.event_type(), payload))
    }
}

#[derive(Serialize)]
struct RoleUpdatedRef<'a> {
    role: &'a Role,
}

/// Payload of a `role.updated` event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleUpdatedPayload {
    /// The updated role.
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;
    use platform_rbac::PermissionSet;

    #[test]
    fn test_role_updated_event() {
        let role = Role::new("channel_user", PermissionSet::from_strings(&["create_post"]))
            .scheme_managed();
        let event = RoleEvent::Updated { role: role.clone() }.to_event().unwrap();

        assert_eq!(event.event_type, ROLE_UPDATED_EVENT);
        assert_eq!(event.topic(), "role.updated");
        assert_eq!(event.version, 1);

        let payload: RoleUpdatedPayload = event.parse_payload().unwrap();
        assert_eq!(payload.role, role);
        assert_eq!(event.payload["role"]["permissions"], serde_json::json!(["create_post"]));
    }
}
