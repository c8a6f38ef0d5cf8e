//! # Low-Stock Notification Dispatch
//!
//! Publishes reorder reminders for threshold crossings observed by
//! committed purchases.
//!
//! ## Delivery Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Reminder Delivery                                    │
//! │                                                                         │
//! │  checkout commits                                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  NotificationDispatcher::dispatch(crossings)                           │
//! │       │        (returns immediately - caller already has its result)   │
//! │       ▼                                                                 │
//! │  tokio::spawn ── per crossing, in order ──► publish(topic, payload)    │
//! │                                                  │                      │
//! │                          topic = product name    │                      │
//! │                                                  ▼                      │
//! │                      ┌──────────────────────────────────────┐          │
//! │                      │  broadcast channel per topic         │          │
//! │                      │  "Amoxicillin 500mg" ─► subscribers  │          │
//! │                      │  "Gauze Roll"        ─► subscribers  │          │
//! │                      └──────────────────────────────────────┘          │
//! │                                                                         │
//! │  Best-effort, at-most-once: a failed publish is logged, never          │
//! │  retried, and never reverses the committed purchase.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use medipos_core::ThresholdCrossing;

/// Payload published for one threshold crossing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LowStockReminder {
    pub product_name: String,
}

/// A reminder could not be delivered.
///
/// Never propagated to the purchase caller; the dispatcher logs it and
/// moves on.
#[derive(Debug, Clone, Error)]
#[error("reminder delivery failed for topic '{topic}': {reason}")]
pub struct PublishError {
    pub topic: String,
    pub reason: String,
}

/// Abstract publish capability with at-most-once, best-effort semantics.
///
/// Any pub/sub transport satisfies this; the engine ships an in-process
/// broadcast implementation and stays decoupled from the choice.
pub trait ReminderPublisher: Send + Sync {
    /// Publishes one reminder to a topic. Must not block on slow
    /// consumers and must not retry.
    fn publish(&self, topic: &str, reminder: LowStockReminder) -> Result<(), PublishError>;
}

// =============================================================================
// Broadcast Publisher
// =============================================================================

/// In-process [`ReminderPublisher`] backed by one tokio broadcast channel
/// per topic (topic = product name).
///
/// Channels are created on first subscription; publishing to a topic
/// nobody has subscribed to fails best-effort like any other undeliverable
/// reminder.
pub struct BroadcastPublisher {
    capacity: usize,
    topics: RwLock<HashMap<String, broadcast::Sender<LowStockReminder>>>,
}

impl BroadcastPublisher {
    /// Creates a publisher whose per-topic channels hold `capacity`
    /// undelivered reminders before lagging subscribers lose the oldest.
    pub fn new(capacity: usize) -> Self {
        BroadcastPublisher {
            capacity,
            topics: RwLock::new(HashMap::new()),
        }
    }

    /// Subscribes to one product's reminders, creating the topic channel
    /// if it does not exist yet.
    pub fn subscribe(&self, topic: &str) -> broadcast::Receiver<LowStockReminder> {
        let mut topics = self.topics.write().unwrap_or_else(|e| e.into_inner());
        topics
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// Number of live topics (for diagnostics).
    pub fn topic_count(&self) -> usize {
        self.topics.read().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl ReminderPublisher for BroadcastPublisher {
    fn publish(&self, topic: &str, reminder: LowStockReminder) -> Result<(), PublishError> {
        let sender = {
            let topics = self.topics.read().unwrap_or_else(|e| e.into_inner());
            topics.get(topic).cloned()
        };

        match sender {
            Some(tx) => tx
                .send(reminder)
                .map(|_| ())
                .map_err(|_| PublishError {
                    topic: topic.to_string(),
                    reason: "all subscribers disconnected".to_string(),
                }),
            None => Err(PublishError {
                topic: topic.to_string(),
                reason: "no subscribers".to_string(),
            }),
        }
    }
}

impl std::fmt::Debug for BroadcastPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BroadcastPublisher")
            .field("capacity", &self.capacity)
            .field("topics", &self.topic_count())
            .finish()
    }
}

// =============================================================================
// Notification Dispatcher
// =============================================================================

/// Consumes the crossing list of a committed purchase and publishes
/// reminders off the commit critical path.
#[derive(Clone)]
pub struct NotificationDispatcher {
    publisher: Arc<dyn ReminderPublisher>,
}

impl NotificationDispatcher {
    /// Creates a dispatcher over any publisher implementation.
    pub fn new(publisher: Arc<dyn ReminderPublisher>) -> Self {
        NotificationDispatcher { publisher }
    }

    /// Returns the underlying publisher.
    pub fn publisher(&self) -> Arc<dyn ReminderPublisher> {
        Arc::clone(&self.publisher)
    }

    /// Hands a committed transaction's crossings to a spawned task for
    /// publication, preserving their order within this call.
    ///
    /// Returns immediately: by the time this runs the purchase is already
    /// committed, holds no locks, and must not wait on delivery.
    pub fn dispatch(&self, crossings: Vec<ThresholdCrossing>) {
        if crossings.is_empty() {
            return;
        }

        let publisher = Arc::clone(&self.publisher);
        tokio::spawn(async move {
            for crossing in crossings {
                let reminder = LowStockReminder {
                    product_name: crossing.product_name.clone(),
                };
                match publisher.publish(&crossing.product_name, reminder) {
                    Ok(()) => debug!(
                        product = %crossing.product_name,
                        stock = crossing.stock_after,
                        "Low-stock reminder published"
                    ),
                    Err(e) => warn!(
                        product = %crossing.product_name,
                        error = %e,
                        "Low-stock reminder dropped"
                    ),
                }
            }
        });
    }
}

impl std::fmt::Debug for NotificationDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationDispatcher").finish_non_exhaustive()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
