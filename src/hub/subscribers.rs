//! Subscriber liveness tracking
//!
//! A per-channel set of subscriber identities. The dispatcher that owns a
//! source registers subscribers here and polls emptiness to decide when the
//! source may be torn down. Emptiness is advisory: a point-in-time snapshot,
//! not a guarantee against a concurrent join.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::Mutex;

/// Identity of one subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

impl std::fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Concurrency-safe set of subscriber identities for one channel
pub struct SubscriberRegistry {
    ids: Mutex<HashSet<SubscriberId>>,
    next_id: AtomicU64,
}

impl SubscriberRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            ids: Mutex::new(HashSet::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Mint a fresh subscriber id, unique within this registry
    pub fn next_id(&self) -> SubscriberId {
        SubscriberId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Register a subscriber. Returns false if it was already present.
    pub async fn join(&self, id: SubscriberId) -> bool {
        let mut ids = self.ids.lock().await;
        let added = ids.insert(id);
        tracing::debug!(subscriber = %id, subscribers = ids.len(), "Subscriber joined");
        added
    }

    /// Remove a subscriber. Returns false if it was not present.
    pub async fn leave(&self, id: SubscriberId) -> bool {
        let mut ids = self.ids.lock().await;
        let removed = ids.remove(&id);
        tracing::debug!(subscriber = %id, subscribers = ids.len(), "Subscriber left");
        removed
    }

    /// Whether no subscriber is currently registered
    pub async fn is_empty(&self) -> bool {
        self.ids.lock().await.is_empty()
    }

    /// Number of registered subscribers
    pub async fn len(&self) -> usize {
        self.ids.lock().await.len()
    }
}

impl Default for SubscriberRegistry {
    fn default() -> Self {
        Self::new()
    }
}
