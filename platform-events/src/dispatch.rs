//! Fire-and-forget event dispatch
//!
//! Callers hand an event to an [`EventPublisher`] and return immediately.
//! Submitted events wait in a bounded queue drained by one worker task,
//! which publishes them with at most `max_in_flight` publishes running at
//! once. When the queue is full the event is dropped. Outcomes are only
//! visible in logs and [`DispatchStats`].

use crate::bus::EventBus;
use crate::types::Event;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, Semaphore};

/// Non-blocking event submission.
///
/// `submit` must return without waiting for delivery and must not report
/// delivery failures to the caller.
pub trait EventPublisher: Send + Sync {
    /// Hand an event off for asynchronous delivery.
    fn submit(&self, event: Event);
}

/// Dispatcher configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatcherConfig {
    /// Maximum number of publishes running against the bus at once.
    pub max_in_flight: usize,

    /// Events allowed to wait for a publish slot before new ones are dropped.
    pub queue_capacity: usize,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            max_in_flight: 64,
            queue_capacity: 4096,
        }
    }
}

impl DispatcherConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `EVENTS_DISPATCH_MAX_IN_FLIGHT`: concurrent publishes (default: 64)
    /// - `EVENTS_DISPATCH_QUEUE_CAPACITY`: queued events (default: 4096)
    ///
    /// Zero is treated as one for both.
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            max_in_flight: env_usize("EVENTS_DISPATCH_MAX_IN_FLIGHT", default.max_in_flight),
            queue_capacity: env_usize("EVENTS_DISPATCH_QUEUE_CAPACITY", default.queue_capacity),
        }
    }
}

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
        .max(1)
}

/// Dispatch counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchStats {
    /// Events handed to `submit`
    pub submitted: u64,
    /// Events the bus accepted
    pub delivered: u64,
    /// Events the bus rejected
    pub failed: u64,
    /// Events discarded at submit: queue full or no runtime to deliver on
    pub dropped: u64,
}

#[derive(Debug, Default)]
struct Counters {
    submitted: AtomicU64,
    delivered: AtomicU64,
    failed: AtomicU64,
    dropped: AtomicU64,
}

/// Publishes events to an [`EventBus`] from a bounded background queue.
///
/// The worker is started on the tokio runtime of the first `submit` and
/// exits once the dispatcher is dropped and the queue has drained. Memory
/// and task count stay bounded by `queue_capacity + max_in_flight` however
/// slow the bus is.
///
/// # Example
///
/// ```rust,no_run
/// use platform_events::{BusDispatcher, DispatcherConfig, Event, EventPublisher, MemoryEventBus};
/// use std::sync::Arc;
///
/// async fn example() {
///     let bus = Arc::new(MemoryEventBus::new());
///     let dispatcher = BusDispatcher::new(bus, DispatcherConfig::default());
///
///     dispatcher.submit(Event::new("role.updated", serde_json::json!({})));
/// }
/// ```
pub struct BusDispatcher {
    queue: mpsc::Sender<Event>,
    /// Held until the first submit on a runtime starts the worker
    pending_worker: Mutex<Option<Worker>>,
    counters: Arc<Counters>,
}

impl std::fmt::Debug for BusDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BusDispatcher")
            .field("queued", &(self.queue.max_capacity() - self.queue.capacity()))
            .finish()
    }
}

struct Worker {
    bus: Arc<dyn EventBus>,
    queue: mpsc::Receiver<Event>,
    permits: Arc<Semaphore>,
    counters: Arc<Counters>,
}

impl Worker {
    async fn run(mut self) {
        while let Some(event) = self.queue.recv().await {
            // The semaphore is never closed
            let Ok(permit) = self.permits.clone().acquire_owned().await else {
                return;
            };

            let bus = self.bus.clone();
            let counters = self.counters.clone();
            tokio::spawn(async move {
                let _permit = permit;
                publish(bus.as_ref(), &counters, event).await;
            });
        }

        tracing::debug!("Event dispatch queue closed, worker exiting");
    }
}

async fn publish(bus: &dyn EventBus, counters: &Counters, event: Event) {
    let event_id = event.id;
    let topic = event.topic();

    match bus.publish(event).await {
        Ok(()) => {
            counters.delivered.fetch_add(1, Ordering::Relaxed);
        }
        Err(e) => {
            counters.failed.fetch_add(1, Ordering::Relaxed);
            tracing::warn!(
                error = %e,
                event_id = %event_id,
                topic = %topic,
                "Event dispatch failed"
            );
        }
    }
}

impl BusDispatcher {
    /// Create a dispatcher publishing to `bus`.
    pub fn new(bus: Arc<dyn EventBus>, config: DispatcherConfig) -> Self {
        let (sender, receiver) = mpsc::channel(config.queue_capacity.max(1));
        let counters = Arc::new(Counters::default());

        Self {
            queue: sender,
            pending_worker: Mutex::new(Some(Worker {
                bus,
                queue: receiver,
                permits: Arc::new(Semaphore::new(config.max_in_flight.max(1))),
                counters: counters.clone(),
            })),
            counters,
        }
    }

    /// Snapshot of the dispatch counters.
    pub fn stats(&self) -> DispatchStats {
        DispatchStats {
            submitted: self.counters.submitted.load(Ordering::Relaxed),
            delivered: self.counters.delivered.load(Ordering::Relaxed),
            failed: self.counters.failed.load(Ordering::Relaxed),
            dropped: self.counters.dropped.load(Ordering::Relaxed),
        }
    }

    /// Start the worker on the current runtime if it is not running yet.
    ///
    /// Returns false when there is no runtime to run it on.
    fn ensure_worker(&self) -> bool {
        let mut pending = self
            .pending_worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if pending.is_none() {
            return true;
        }

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                if let Some(worker) = pending.take() {
                    handle.spawn(worker.run());
                }
                true
            }
            Err(_) => false,
        }
    }

    fn drop_event(&self, event: &Event, reason: &'static str) {
        self.counters.dropped.fetch_add(1, Ordering::Relaxed);
        tracing::warn!(
            event_id = %event.id,
            topic = %event.topic(),
            reason,
            "Event dropped"
        );
    }
}

impl EventPublisher for BusDispatcher {
    fn submit(&self, event: Event) {
        self.counters.submitted.fetch_add(1, Ordering::Relaxed);

        if !self.ensure_worker() {
            self.drop_event(&event, "no async runtime available");
            return;
        }

        match self.queue.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => self.drop_event(&event, "dispatch queue full"),
            Err(TrySendError::Closed(event)) => {
                self.drop_event(&event, "dispatch worker stopped")
            }
        }
    }
}
