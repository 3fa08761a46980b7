//! Comment fan-out hub
//!
//! One hub per channel. Built on `tokio::sync::broadcast` with capacity 1:
//! a single-slot, latest-value conduit. Publishing never blocks; a
//! subscriber that stalls past the slot loses the superseded value and
//! resumes at the newest one, so every handle observes a strict suffix of
//! the publish order. Live commentary favors recency over completeness.

use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};

use crate::models::Comment;

/// Slot depth of the fan-out conduit. One: latest value wins.
const HUB_CAPACITY: usize = 1;

/// Fan-out hub for one channel's comments
///
/// Cloneable; clones share the same conduit. Dropped values are a per-handle
/// affair, not a shared cursor.
#[derive(Clone)]
pub struct CommentHub {
    sender: Arc<RwLock<Option<broadcast::Sender<Comment>>>>,
}

impl CommentHub {
    /// Create an open hub
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(HUB_CAPACITY);
        Self {
            sender: Arc::new(RwLock::new(Some(tx))),
        }
    }

    /// Publish a comment to all attached handles
    ///
    /// Returns the number of handles the value was made available to.
    /// Never blocks on slow consumers; after [`close`](Self::close) this is
    /// a no-op returning 0.
    pub async fn publish(&self, comment: Comment) -> usize {
        match self.sender.read().await.as_ref() {
            // send() errors only when there are no receivers
            Some(tx) => tx.send(comment).unwrap_or(0),
            None => 0,
        }
    }

    /// Attach a new consumption handle
    ///
    /// The handle receives every publish made after this call, subject to
    /// its own slot-drop behavior. Subscribing to a closed hub yields a
    /// handle that ends immediately.
    pub async fn subscribe(&self) -> CommentStream {
        match self.sender.read().await.as_ref() {
            Some(tx) => CommentStream { rx: tx.subscribe() },
            None => {
                let (tx, rx) = broadcast::channel(HUB_CAPACITY);
                drop(tx);
                CommentStream { rx }
            }
        }
    }

    /// Terminate all outstanding handles
    ///
    /// Handles drain any value already in their slot, then end. Further
    /// `publish` calls are no-ops.
    pub async fn close(&self) {
        if self.sender.write().await.take().is_some() {
            tracing::debug!("Comment hub closed");
        }
    }

    /// Whether the hub has been closed
    pub async fn is_closed(&self) -> bool {
        self.sender.read().await.is_none()
    }

    /// Number of currently attached handles
    pub async fn receiver_count(&self) -> usize {
        match self.sender.read().await.as_ref() {
            Some(tx) => tx.receiver_count(),
            None => 0,
        }
    }
}

impl Default for CommentHub {
    fn default() -> Self {
        Self::new()
    }
}

/// Consumption handle for one subscriber
pub struct CommentStream {
    rx: broadcast::Receiver<Comment>,
}

impl CommentStream {
    /// Receive the next comment
    ///
    /// Values superseded while this handle stalled are skipped silently
    /// (logged at debug). Returns `None` once the hub is closed and the
    /// slot is drained.
    pub async fn next(&mut self) -> Option<Comment> {
        loop {
            match self.rx.recv().await {
                Ok(comment) => return Some(comment),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "Comment stream lagged, resuming at newest");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio_test::{assert_pending, assert_ready, task};

    use super::*;

    fn comment(no: u64, text: &str) -> Comment {
        let mut c = Comment::new("lv1", "anon", text, 1700000000 + no as i64);
        c.no = Some(no);
        c
    }

    #[tokio::test]
    async fn test_in_order_delivery_without_backpressure() {
        let hub = CommentHub::new();
        let mut stream = hub.subscribe().await;

        // Consumer keeps up with the producer: nothing is dropped
        for no in 1..=5 {
            assert_eq!(hub.publish(comment(no, "tick")).await, 1);
            let received = stream.next().await.unwrap();
            assert_eq!(received.no, Some(no));
        }
    }

    #[tokio::test]
    async fn test_backpressure_yields_strict_suffix() {
        let hub = CommentHub::new();
        let mut stream = hub.subscribe().await;

        let published: Vec<Comment> = (1..=5).map(|no| comment(no, "burst")).collect();
        for c in &published {
            hub.publish(c.clone()).await;
        }
        hub.close().await;

        let mut received = Vec::new();
        while let Some(c) = stream.next().await {
            received.push(c);
        }

        // A stalled handle sees a strict suffix, never out-of-order, never
        // a value that was not published
        assert!(!received.is_empty());
        assert_eq!(received[..], published[published.len() - received.len()..]);
    }

    #[tokio::test]
    async fn test_publish_after_close_is_noop() {
        let hub = CommentHub::new();
        let _stream = hub.subscribe().await;

        hub.close().await;

        assert!(hub.is_closed().await);
        assert_eq!(hub.publish(comment(1, "late")).await, 0);
    }

    #[tokio::test]
    async fn test_subscribe_after_close_ends_immediately() {
        let hub = CommentHub::new();
        hub.close().await;

        let mut stream = hub.subscribe().await;
        assert_eq!(stream.next().await, None);
    }

    #[tokio::test]
    async fn test_handles_have_independent_cursors() {
        let hub = CommentHub::new();
        let mut fast = hub.subscribe().await;
        let mut slow = hub.subscribe().await;

        for no in 1..=3 {
            hub.publish(comment(no, "tick")).await;
            // Only the fast handle drains each value
            assert_eq!(fast.next().await.unwrap().no, Some(no));
        }
        hub.close().await;

        assert_eq!(fast.next().await, None);

        // The stalled handle skips to the newest retained value
        let mut remaining = Vec::new();
        while let Some(c) = slow.next().await {
            remaining.push(c.no.unwrap());
        }
        assert_eq!(remaining, vec![3]);
    }

    #[tokio::test]
    async fn test_next_is_pending_until_publish() {
        let hub = CommentHub::new();
        let mut stream = hub.subscribe().await;

        let mut next = task::spawn(stream.next());
        assert_pending!(next.poll());

        hub.publish(comment(1, "wake")).await;

        assert!(next.is_woken());
        let received = assert_ready!(next.poll());
        assert_eq!(received.unwrap().no, Some(1));
    }

    #[tokio::test]
    async fn test_receiver_count() {
        let hub = CommentHub::new();
        assert_eq!(hub.receiver_count().await, 0);

        let s1 = hub.subscribe().await;
        let _s2 = hub.subscribe().await;
        assert_eq!(hub.receiver_count().await, 2);

        drop(s1);
        assert_eq!(hub.receiver_count().await, 1);

        hub.close().await;
        assert_eq!(hub.receiver_count().await, 0);
    }
}
