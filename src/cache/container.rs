//! Periodically refreshing concurrent read model
//!
//! A [`RefreshingCache`] holds a list of catalog items populated by an
//! injected asynchronous loader. Construction schedules a one-shot warm-up
//! load plus a periodic refresh task; both are owned by the cache value and
//! aborted when it is dropped. Every operation waits for warm-up before
//! touching the contents, and all reads and writes serialize on one lock, so
//! a snapshot never observes a half-applied replacement.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

use crate::error::Result;

use super::config::CacheConfig;

/// Boxed loader function: returns the full new contents, or `Err` to signal
/// "no update" (upstream unreachable or unchanged), which preserves the
/// current contents.
type Loader<T> = Box<dyn Fn() -> Pin<Box<dyn Future<Output = Result<Vec<T>>> + Send>> + Send + Sync>;

struct Shared<T> {
    /// Cached items; the one lock serializing all readers and writers
    items: Mutex<Vec<T>>,

    /// Becomes true once the warm-up load has completed (even on failure)
    ready: watch::Sender<bool>,

    loader: Loader<T>,
}

impl<T: Send + 'static> Shared<T> {
    /// Wait until the warm-up load has completed
    async fn wait_ready(&self) {
        let mut rx = self.ready.subscribe();
        // The sender lives in self, so wait_for can only fail if the cache
        // itself is gone; either way there is nothing left to wait for.
        let _ = rx.wait_for(|ready| *ready).await;
    }

    /// Invoke the loader and atomically replace the contents
    ///
    /// The lock is held across the loader call, so concurrent refreshes are
    /// totally ordered and no reader sees a partial replacement.
    async fn refresh(&self) {
        self.wait_ready().await;

        let mut items = self.items.lock().await;
        match (self.loader)().await {
            Ok(new) => {
                items.clear();
                items.extend(new);
            }
            Err(e) => {
                tracing::debug!(error = %e, "Cache loader produced no update, keeping contents");
            }
        }
    }
}

/// Generic, periodically self-refreshing, concurrently accessed container
///
/// Items have no implicit identity; mutation operations take caller-supplied
/// match predicates instead.
pub struct RefreshingCache<T> {
    shared: Arc<Shared<T>>,
    warmup: JoinHandle<()>,
    refresher: JoinHandle<()>,
}

impl<T: Send + 'static> RefreshingCache<T> {
    /// Create a cache with the default configuration
    pub fn new<F, Fut>(loader: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<T>>> + Send + 'static,
    {
        Self::with_config(CacheConfig::default(), loader)
    }

    /// Create a cache with a custom configuration
    ///
    /// Spawns the warm-up task and the periodic refresh task. Both are
    /// cancelled when the cache is dropped.
    pub fn with_config<F, Fut>(config: CacheConfig, loader: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<T>>> + Send + 'static,
    {
        let shared = Arc::new(Shared {
            items: Mutex::new(Vec::new()),
            ready: watch::channel(false).0,
            loader: Box::new(move || Box::pin(loader())),
        });

        let warmup = {
            let shared = Arc::clone(&shared);
            tokio::spawn(async move {
                match (shared.loader)().await {
                    Ok(initial) => {
                        shared.items.lock().await.extend(initial);
                        tracing::debug!("Cache warm-up load finished");
                    }
                    Err(e) => {
                        tracing::debug!(error = %e, "Cache warm-up load failed, starting empty");
                    }
                }
                // send_replace stores the flag even while nobody is waiting
                shared.ready.send_replace(true);
            })
        };

        let refresher = {
            let shared = Arc::clone(&shared);
            let interval = config.refresh_interval;
            tokio::spawn(async move {
                let mut ticker = tokio::time::interval(interval);
                // The first tick completes immediately; warm-up covers it.
                ticker.tick().await;
                loop {
                    ticker.tick().await;
                    shared.refresh().await;
                    tracing::debug!("Periodic cache refresh finished");
                }
            })
        };

        Self {
            shared,
            warmup,
            refresher,
        }
    }

    /// Invoke the loader once and replace the contents
    ///
    /// If the loader fails, the existing contents are left untouched: a stale
    /// catalog beats an empty one. Waits for warm-up first.
    pub async fn refresh(&self) {
        self.shared.refresh().await;
    }

    /// Append an item
    pub async fn insert(&self, item: T) {
        self.shared.wait_ready().await;
        self.shared.items.lock().await.push(item);
    }

    /// Replace the first item satisfying `matches` in place, or append
    ///
    /// Find and mutate happen under one lock acquisition, so a concurrent
    /// upsert cannot slip between them.
    pub async fn upsert<F>(&self, item: T, matches: F)
    where
        F: Fn(&T) -> bool,
    {
        self.shared.wait_ready().await;

        let mut items = self.shared.items.lock().await;
        match items.iter().position(|existing| matches(existing)) {
            Some(index) => items[index] = item,
            None => items.push(item),
        }
    }

    /// Number of cached items
    pub async fn len(&self) -> usize {
        self.shared.wait_ready().await;
        self.shared.items.lock().await.len()
    }

    /// Whether the cache holds no items
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl<T: Clone + Send + 'static> RefreshingCache<T> {
    /// Find the first item satisfying the predicate
    pub async fn find<F>(&self, predicate: F) -> Option<T>
    where
        F: Fn(&T) -> bool,
    {
        self.shared.wait_ready().await;

        let items = self.shared.items.lock().await;
        items.iter().find(|item| predicate(item)).cloned()
    }

    /// All items satisfying the predicate, in cache order
    pub async fn filter_all<F>(&self, predicate: F) -> Vec<T>
    where
        F: Fn(&T) -> bool,
    {
        self.shared.wait_ready().await;

        let items = self.shared.items.lock().await;
        items.iter().filter(|item| predicate(item)).cloned().collect()
    }

    /// An owned copy of the current contents, never a live view
    pub async fn snapshot(&self) -> Vec<T> {
        self.shared.wait_ready().await;
        self.shared.items.lock().await.clone()
    }
}

impl<T> Drop for RefreshingCache<T> {
    fn drop(&mut self) {
        self.warmup.abort();
        self.refresher.abort();
    }
}
