//! Role notification bus
//!
//! Connected listeners subscribe with a dotted topic pattern and receive
//! every published event whose type matches. The in-memory bus keeps one
//! broadcast channel per distinct pattern; channels nobody listens to any
//! more are pruned on the next subscribe.

use crate::types::Event;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tokio::sync::{broadcast, RwLock};

/// Event bus error types.
#[derive(Debug, Error)]
pub enum EventBusError {
    /// The transport refused the event
    #[error("Failed to publish event: {0}")]
    Publish(String),

    /// Malformed subscription pattern
    #[error("Invalid topic pattern '{0}'")]
    InvalidTopic(String),

    /// Payload could not be encoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The subscriber fell behind and missed events
    #[error("Subscription lagged, {0} events skipped")]
    Lagged(u64),

    /// The bus was dropped
    #[error("Event bus closed")]
    Closed,
}

/// Result type for event bus operations.
pub type EventBusResult<T> = Result<T, EventBusError>;

/// Parsed topic pattern.
///
/// Segments are separated by `.`; `*` matches exactly one segment and a
/// trailing `#` matches any remaining segments, including none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicPattern {
    raw: String,
    segments: Vec<String>,
}

impl TopicPattern {
    /// Parse a pattern such as `role.updated`, `role.*` or `#`.
    pub fn parse(pattern: &str) -> EventBusResult<Self> {
        let segments: Vec<String> = pattern.split('.').map(str::to_string).collect();

        let malformed = segments.iter().any(String::is_empty)
            || segments[..segments.len() - 1].iter().any(|s| s == "#");
        if malformed {
            return Err(EventBusError::InvalidTopic(pattern.to_string()));
        }

        Ok(Self {
            raw: pattern.to_string(),
            segments,
        })
    }

    /// The pattern as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether an event type falls under this pattern.
    pub fn matches(&self, topic: &str) -> bool {
        let mut parts = topic.split('.');
        for segment in &self.segments {
            match segment.as_str() {
                "#" => return true,
                "*" => {
                    if parts.next().is_none() {
                        return false;
                    }
                }
                literal => {
                    if parts.next() != Some(literal) {
                        return false;
                    }
                }
            }
        }
        parts.next().is_none()
    }
}

/// A listener's stream of matching events.
#[derive(Debug)]
pub struct Subscription {
    pattern: TopicPattern,
    receiver: broadcast::Receiver<Event>,
}

impl Subscription {
    /// Pattern this subscription was opened with.
    pub fn pattern(&self) -> &TopicPattern {
        &self.pattern
    }

    /// Receive the next event.
    ///
    /// A slow listener gets [`EventBusError::Lagged`] once and then resumes
    /// from the oldest event still buffered.
    pub async fn recv(&mut self) -> EventBusResult<Event> {
        self.receiver.recv().await.map_err(|e| match e {
            broadcast::error::RecvError::Lagged(skipped) => EventBusError::Lagged(skipped),
            broadcast::error::RecvError::Closed => EventBusError::Closed,
        })
    }
}

/// Transport that carries events to connected listeners.
#[async_trait]
pub trait EventBus: Send + Sync {
    /// Publish an event to every matching subscription.
    async fn publish(&self, event: Event) -> EventBusResult<()>;

    /// Open a subscription for a topic pattern.
    async fn subscribe(&self, pattern: &str) -> EventBusResult<Subscription>;
}

/// In-memory bus counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventBusStats {
    /// Events accepted by `publish`
    pub published: u64,
    /// Receiver deliveries across all subscriptions
    pub delivered: u64,
}

/// In-memory [`EventBus`] for single-process deployments and tests.
///
/// Publishing never blocks on listeners; a listener that falls more than
/// `capacity` events behind sees [`EventBusError::Lagged`].
#[derive(Debug)]
pub struct MemoryEventBus {
    channels: RwLock<Vec<(TopicPattern, broadcast::Sender<Event>)>>,
    capacity: usize,
    published: AtomicU64,
    delivered: AtomicU64,
}

impl MemoryEventBus {
    /// Create a bus with a per-pattern buffer of 1024 events.
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// Create a bus with a custom per-pattern buffer.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: RwLock::new(Vec::new()),
            capacity: capacity.max(1),
            published: AtomicU64::new(0),
            delivered: AtomicU64::new(0),
        }
    }

    /// Snapshot of the bus counters.
    pub fn stats(&self) -> EventBusStats {
        EventBusStats {
            published: self.published.load(Ordering::Relaxed),
            delivered: self.delivered.load(Ordering::Relaxed),
        }
    }
}

impl Default for MemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventBus for MemoryEventBus {
    async fn publish(&self, event: Event) -> EventBusResult<()> {
        let topic = event.topic();

        let delivered: usize = self
            .channels
            .read()
            .await
            .iter()
            .filter(|(pattern, _)| pattern.matches(&topic))
            .filter_map(|(_, sender)| sender.send(event.clone()).ok())
            .sum();

        self.published.fetch_add(1, Ordering::Relaxed);
        self.delivered.fetch_add(delivered as u64, Ordering::Relaxed);

        tracing::debug!(topic = %topic, event_id = %event.id, delivered, "Event published");

        Ok(())
    }

    async fn subscribe(&self, pattern: &str) -> EventBusResult<Subscription> {
        let pattern = TopicPattern::parse(pattern)?;

        let mut channels = self.channels.write().await;
        channels.retain(|(_, sender)| sender.receiver_count() > 0);

        let receiver = match channels.iter().find(|(p, _)| *p == pattern) {
            Some((_, sender)) => sender.subscribe(),
            None => {
                let (sender, receiver) = broadcast::channel(self.capacity);
                channels.push((pattern.clone(), sender));
                receiver
            }
        };

        tracing::debug!(pattern = %pattern.as_str(), "Subscription opened");

        Ok(Subscription { pattern, receiver })
    }
}
