//! LookupManager implementation: dedup and completion routing.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures::future::BoxFuture;
use parking_lot::RwLock;
use pushlookup_core::{
    CacheEngine, Identifier, LookupError, LookupStatus, PushProducer, TransactionStart,
};
use tokio::time::Instant;
use tracing::{Instrument, debug, warn};

use super::policy::{LookupConfig, TimeoutPolicy};
use super::task::{CompletionMode, LookupTask};
use crate::error::RouteError;
use crate::metrics;

/// What the manager did with a push notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// A lookup for the identifier is already pending; the notification was dropped.
    Deduplicated,
    /// The in-flight limit was reached; the push proceeds without a lookup.
    Skipped,
    /// The cache engine answered immediately and the lookup is finished.
    Completed,
    /// The lookup is pending and registered under its identifier.
    Pending,
}

/// State shared with the drivers of pending lookups.
///
/// Drivers only hold a [`Weak`] reference, so they can never keep the
/// registry alive on their own.
struct LookupManagerInner<E> {
    engine: E,
    config: LookupConfig,
    tasks: DashMap<Identifier, LookupTask>,
    /// Source of registration tokens handed to drivers.
    generation: AtomicU64,
    /// Set once the manager is dropped. Completions hold the read guard while
    /// they run, so teardown waits for them and none starts afterwards.
    revoked: RwLock<bool>,
}

impl<E> LookupManagerInner<E> {
    /// Removes the task registered under `identifier` and completes it.
    fn complete(&self, identifier: &Identifier, status: LookupStatus) -> Result<(), RouteError> {
        let revoked = self.revoked.read();
        if *revoked {
            return Ok(());
        }
        match self.tasks.remove(identifier) {
            Some((_, task)) => {
                Self::finish(task, status);
                Ok(())
            }
            None => Err(RouteError::Unregistered(identifier.clone())),
        }
    }

    /// Completes the task a driver was spawned for.
    ///
    /// The task may already be gone: resolved early by the host, or replaced
    /// by a newer registration for the same identifier. Both are left alone.
    fn complete_driven(&self, identifier: &Identifier, generation: u64, status: LookupStatus) {
        let revoked = self.revoked.read();
        if *revoked {
            return;
        }
        match self
            .tasks
            .remove_if(identifier, |_, task| task.generation() == generation)
        {
            Some((_, task)) => Self::finish(task, status),
            None => debug!(generation, "lookup already resolved, dropping late result"),
        }
    }

    fn finish(task: LookupTask, status: LookupStatus) {
        metrics::record_in_flight(-1.0);
        task.complete(status, CompletionMode::Async);
    }
}

/// Coordinator of cache-only lookups for pushed resources.
///
/// Each push notification is checked against the cache at most once per
/// identifier at a time: while a lookup is pending, further notifications
/// for the same identifier are dropped. When a lookup finds the resource in
/// the cache the producer's push is canceled; otherwise the push proceeds.
///
/// Pending lookups are driven on the current Tokio runtime. Dropping the
/// manager revokes every pending completion: registered tasks are dropped
/// together with their producers and transactions, and no completion runs
/// afterwards. A completion already running on another worker finishes
/// before the drop returns.
///
/// The cache engine must not call back into the manager from
/// [`Transaction::start`](pushlookup_core::Transaction::start).
///
/// # Example
/// ```no_run
/// # use pushlookup::lookup::{LookupConfig, LookupManager};
/// # fn run(engine: pushlookup_moka::MokaCacheEngine, producer: Box<dyn pushlookup::PushProducer>) {
/// let manager = LookupManager::new(engine, LookupConfig::default());
/// manager.on_push_notification(producer);
/// # }
/// ```
pub struct LookupManager<E> {
    inner: Arc<LookupManagerInner<E>>,
}

impl<E> LookupManager<E>
where
    E: CacheEngine + 'static,
{
    /// Create a new LookupManager reading from `engine`.
    pub fn new(engine: E, config: LookupConfig) -> Self {
        Self {
            inner: Arc::new(LookupManagerInner {
                engine,
                config,
                tasks: DashMap::new(),
                generation: AtomicU64::new(0),
                revoked: RwLock::new(false),
            }),
        }
    }

    /// Create a new LookupManager with default configuration.
    pub fn with_defaults(engine: E) -> Self {
        Self::new(engine, LookupConfig::default())
    }

    /// Handle a producer announcing that it is about to push a resource.
    ///
    /// Starts a cache-only lookup for the producer's identifier unless one is
    /// already pending. A lookup the engine answers immediately is completed
    /// before this call returns and never registered.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn on_push_notification(&self, producer: Box<dyn PushProducer>) -> Dispatch {
        let identifier = producer.identifier().clone();

        if self.inner.tasks.contains_key(&identifier) {
            return self.deduplicated(&identifier);
        }

        if let Some(max) = self.inner.config.max_in_flight
            && self.inner.tasks.len() >= max
        {
            debug!(%identifier, max, "in-flight limit reached, push proceeds without lookup");
            metrics::record_skipped();
            return Dispatch::Skipped;
        }

        match self.inner.tasks.entry(identifier.clone()) {
            Entry::Occupied(_) => self.deduplicated(&identifier),
            Entry::Vacant(slot) => {
                let mut task = LookupTask::new(producer, self.inner.config.priority);
                match task.start_lookup(&self.inner.engine) {
                    TransactionStart::Ready(status) => {
                        drop(slot);
                        task.complete(status, CompletionMode::Sync);
                        Dispatch::Completed
                    }
                    TransactionStart::Pending(lookup) => {
                        let generation = self.inner.generation.fetch_add(1, Ordering::Relaxed);
                        let driver =
                            self.spawn_driver(identifier, generation, lookup, task.span().clone());
                        task.attach_driver(driver, generation);
                        slot.insert(task);
                        metrics::record_in_flight(1.0);
                        Dispatch::Pending
                    }
                }
            }
        }
    }

    /// Route the result of a pending lookup back to its task.
    ///
    /// The task is removed from the registry and completed: a hit cancels its
    /// push. The manager calls this itself when a pending lookup resolves;
    /// hosts may call it to resolve a lookup early.
    ///
    /// Returns [`RouteError::Unregistered`] if no lookup is pending for
    /// `identifier`. Once the host resolved a lookup, the late result of its
    /// own read is discarded.
    pub fn on_lookup_complete(
        &self,
        identifier: &Identifier,
        status: LookupStatus,
    ) -> Result<(), RouteError> {
        self.inner.complete(identifier, status)
    }

    /// Get the number of pending lookups.
    pub fn in_flight_count(&self) -> usize {
        self.inner.tasks.len()
    }

    /// Check if a lookup for the given identifier is pending.
    pub fn is_in_flight(&self, identifier: &Identifier) -> bool {
        self.inner.tasks.contains_key(identifier)
    }

    /// The cache engine lookups are issued against.
    pub fn engine(&self) -> &E {
        &self.inner.engine
    }

    /// The configuration this manager was built with.
    pub fn config(&self) -> &LookupConfig {
        &self.inner.config
    }

    /// Wait until no lookups are pending.
    ///
    /// Yields between checks so that lookup drivers can make progress.
    pub async fn wait_idle(&self) {
        while !self.inner.tasks.is_empty() {
            tokio::task::yield_now().await;
        }
    }

    /// Wait until no lookups are pending, with a timeout.
    ///
    /// Returns `true` if the registry drained within the timeout,
    /// `false` if the timeout was reached.
    pub async fn wait_idle_timeout(&self, timeout: Duration) -> bool {
        tokio::time::timeout(timeout, self.wait_idle()).await.is_ok()
    }

    fn deduplicated(&self, identifier: &Identifier) -> Dispatch {
        debug!(%identifier, "lookup already in flight, dropping notification");
        metrics::record_deduplicated();
        Dispatch::Deduplicated
    }

    fn spawn_driver(
        &self,
        identifier: Identifier,
        generation: u64,
        lookup: BoxFuture<'static, LookupStatus>,
        span: tracing::Span,
    ) -> tokio::task::AbortHandle {
        let inner: Weak<LookupManagerInner<E>> = Arc::downgrade(&self.inner);
        let timeout = self.inner.config.timeout;

        let handle = tokio::spawn(
            async move {
                let status = resolve(lookup, timeout).await;
                if let Some(inner) = inner.upgrade() {
                    inner.complete_driven(&identifier, generation, status);
                }
            }
            .instrument(span),
        );
        handle.abort_handle()
    }
}

/// Await a pending lookup under the configured timeout policy.
async fn resolve(lookup: BoxFuture<'static, LookupStatus>, policy: TimeoutPolicy) -> LookupStatus {
    match policy {
        TimeoutPolicy::None => lookup.await,
        TimeoutPolicy::Cancel(duration) => match tokio::time::timeout(duration, lookup).await {
            Ok(status) => status,
            Err(_) => {
                warn!(
                    timeout_ms = duration.as_millis() as u64,
                    "lookup timed out, push proceeds"
                );
                LookupStatus::Error(LookupError::TimedOut(duration))
            }
        },
        TimeoutPolicy::Warn(duration) => {
            let start = Instant::now();
            let status = lookup.await;
            let elapsed = start.elapsed();
            if elapsed > duration {
                warn!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    threshold_ms = duration.as_millis() as u64,
                    "lookup exceeded timeout threshold"
                );
            }
            status
        }
    }
}

impl<E> Drop for LookupManager<E> {
    fn drop(&mut self) {
        *self.inner.revoked.write() = true;
        let pending = self.inner.tasks.len();
        self.inner.tasks.clear();
        if pending > 0 {
            debug!(pending, "lookup manager dropped, pending lookups revoked");
            metrics::record_in_flight(-(pending as f64));
        }
    }
}

impl<E> std::fmt::Debug for LookupManager<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupManager")
            .field("config", &self.inner.config)
            .field("in_flight", &self.inner.tasks.len())
            .finish()
    }
}
