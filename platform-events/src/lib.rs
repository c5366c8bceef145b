//! # Platform Events
//!
//! This crate provides role change notifications for the Relay platform:
//! the event envelope, a publish/subscribe bus, and a fire-and-forget
//! dispatcher the role service hands events to.
//!
//! ## Overview
//!
//! The platform-events crate handles:
//! - **Event Types**: The event envelope and typed `RoleEvent`s
//! - **Event Bus**: Publish/subscribe messaging
//! - **Dispatch**: Non-blocking submission with bounded background delivery
//!
//! ## Usage
//!
//! ### Publishing Role Events
//!
//! ```rust,no_run
//! use platform_events::{BusDispatcher, DispatcherConfig, EventPublisher, MemoryEventBus, RoleEvent};
//! use platform_rbac::{PermissionSet, Role};
//! use std::sync::Arc;
//!
//! async fn publish_example() {
//!     let bus = Arc::new(MemoryEventBus::new());
//!     let dispatcher = BusDispatcher::new(bus, DispatcherConfig::default());
//!
//!     let role = Role::new("channel_user", PermissionSet::from_strings(&["create_post"]));
//!     let event = RoleEvent::Updated { role }.to_event().unwrap();
//!
//!     // Returns immediately; delivery happens in the background
//!     dispatcher.submit(event);
//! }
//! ```
//!
//! ### Subscribing to Events
//!
//! ```rust,no_run
//! use platform_events::{EventBus, MemoryEventBus};
//!
//! async fn subscribe_example() {
//!     let bus = MemoryEventBus::new();
//!
//!     // Subscribe to all role events
//!     let mut sub = bus.subscribe("role.*").await.unwrap();
//!
//!     while let Ok(event) = sub.recv().await {
//!         println!("Received: {}", event.event_type);
//!     }
//! }
//! ```
//!
//! ## Topic Patterns
//!
//! Topics are the dotted event type:
//! - `role.updated` - Specific event
//! - `role.*` - All role events
//! - `#` - All events
//!
//! Wildcards:
//! - `*` matches exactly one segment
//! - `#` as the last segment matches any remaining segments, including none

pub mod bus;
pub mod dispatch;
pub mod types;

// Re-export main types
pub use bus::{
    EventBus, EventBusError, EventBusResult, EventBusStats, MemoryEventBus, Subscription,
    TopicPattern,
};
pub use dispatch::{BusDispatcher, DispatchStats, DispatcherConfig, EventPublisher};
pub use types::{Event, RoleEvent, RoleUpdatedPayload, ROLE_UPDATED_EVENT};
