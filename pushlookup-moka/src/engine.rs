//! Moka cache engine implementation.

use chrono::Utc;
use moka::future::Cache;
use pushlookup_core::{
    CacheEngine, EngineLabel, Identifier, LoadFlags, LookupError, LookupRequest, LookupStatus,
    RequestPriority, Transaction, TransactionStart,
};
use tracing::trace;

use crate::builder::{MokaCacheEngineBuilder, NoCapacity};
use crate::entry::CachedEntry;
use crate::metrics::{self, ReadOutcome};

/// In-memory cache engine powered by Moka.
///
/// `MokaCacheEngine` answers cache-only lookups against a Moka async cache:
///
/// - an identifier that is not cached is answered immediately with
///   [`LookupStatus::Miss`]
/// - a cached identifier is read asynchronously; a stale entry counts as a hit
///   only when the request skips cache validation
/// - requests that could reach the network are refused with
///   [`LookupError::CacheOnlyRequired`]
///
/// # Examples
///
/// ```
/// use pushlookup_moka::{CachedEntry, MokaCacheEngine};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let engine = MokaCacheEngine::builder().max_entries(10_000).build();
/// engine.insert("https://example.com/app.css", CachedEntry::new("body")).await;
/// assert!(engine.contains(&"https://example.com/app.css".into()));
/// # }
/// ```
///
/// # Caveats
///
/// - Data is **not persisted**: the cache is lost on process restart
/// - Expiration is **best-effort**: expired entries may briefly remain
///   visible until Moka's background eviction runs
#[derive(Clone)]
pub struct MokaCacheEngine {
    /// The underlying Moka async cache instance.
    pub cache: Cache<Identifier, CachedEntry>,
    /// Label identifying this engine in spans and metrics.
    pub label: EngineLabel,
}

impl std::fmt::Debug for MokaCacheEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MokaCacheEngine")
            .field("label", &self.label)
            .field("cache", &self.cache)
            .finish()
    }
}

impl MokaCacheEngine {
    /// Creates a new builder for `MokaCacheEngine`.
    ///
    /// Capacity must be configured with `max_entries` or `max_bytes` before
    /// calling `build()`.
    pub fn builder() -> MokaCacheEngineBuilder<NoCapacity> {
        MokaCacheEngineBuilder::new()
    }

    /// Returns a reference to the underlying Moka cache.
    pub fn cache(&self) -> &Cache<Identifier, CachedEntry> {
        &self.cache
    }

    /// Stores `entry` under `identifier`.
    pub async fn insert(&self, identifier: impl Into<Identifier>, entry: CachedEntry) {
        self.cache.insert(identifier.into(), entry).await;
        metrics::record_capacity(
            self.label.as_str(),
            self.cache.entry_count(),
            self.cache.weighted_size(),
        );
    }

    /// Removes the entry stored under `identifier`, if any.
    pub async fn invalidate(&self, identifier: &Identifier) {
        self.cache.invalidate(identifier).await;
    }

    /// Returns `true` if an unexpired entry is stored under `identifier`.
    pub fn contains(&self, identifier: &Identifier) -> bool {
        self.cache.contains_key(identifier)
    }
}

impl CacheEngine for MokaCacheEngine {
    fn create_transaction(&self, priority: RequestPriority) -> Box<dyn Transaction> {
        Box::new(MokaTransaction {
            cache: self.cache.clone(),
            label: self.label.clone(),
            priority,
        })
    }

    fn label(&self) -> EngineLabel {
        self.label.clone()
    }
}

/// A single cache-only read against a [`MokaCacheEngine`].
#[derive(Debug)]
pub struct MokaTransaction {
    cache: Cache<Identifier, CachedEntry>,
    label: EngineLabel,
    priority: RequestPriority,
}

impl Transaction for MokaTransaction {
    fn start(&mut self, request: &LookupRequest) -> TransactionStart {
        let flags = request.load_flags();
        if !flags.contains(LoadFlags::ONLY_FROM_CACHE) {
            metrics::record_read(self.label.as_str(), ReadOutcome::Refused);
            return TransactionStart::Ready(LookupError::CacheOnlyRequired.into());
        }

        let identifier = request.identifier().clone();
        if !self.cache.contains_key(&identifier) {
            trace!(%identifier, priority = ?self.priority, "not cached");
            metrics::record_read(self.label.as_str(), ReadOutcome::Absent);
            return TransactionStart::Ready(LookupStatus::Miss);
        }

        let cache = self.cache.clone();
        let label = self.label.clone();
        let skip_validation = flags.contains(LoadFlags::SKIP_CACHE_VALIDATION);
        TransactionStart::pending(async move {
            let outcome = match cache.get(&identifier).await {
                Some(entry) if skip_validation || !entry.is_stale(Utc::now()) => ReadOutcome::Hit,
                // Revalidating a stale entry would need the network.
                Some(_) => ReadOutcome::Stale,
                None => ReadOutcome::Absent,
            };
            metrics::record_read(label.as_str(), outcome);
            match outcome {
                ReadOutcome::Hit => LookupStatus::Hit,
                _ => LookupStatus::Miss,
            }
        })
    }
}
