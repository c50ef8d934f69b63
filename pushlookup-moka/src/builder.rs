//! Builder for configuring [`MokaCacheEngine`].

use std::time::{Duration, Instant};

use chrono::Utc;
use moka::Expiry;
use moka::future::{Cache, CacheBuilder};
use moka::policy::EvictionPolicy;
use pushlookup_core::{EngineLabel, Identifier};

use crate::engine::MokaCacheEngine;
use crate::entry::CachedEntry;

/// Approximate fixed cost of an entry beyond its key and body bytes.
const ENTRY_OVERHEAD: usize = 96;

/// Moka expiry driven by each entry's own `expire_at` timestamp.
///
/// Entries without an expiration time live until evicted.
#[derive(Clone, Copy, Debug)]
struct EntryExpiry;

impl EntryExpiry {
    fn remaining(entry: &CachedEntry) -> Option<Duration> {
        let expire_at = entry.expire()?;
        Some((expire_at - Utc::now()).to_std().unwrap_or(Duration::ZERO))
    }
}

impl Expiry<Identifier, CachedEntry> for EntryExpiry {
    fn expire_after_create(
        &self,
        _identifier: &Identifier,
        entry: &CachedEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Self::remaining(entry)
    }

    // A replaced entry carries its own expiration, not the previous one.
    fn expire_after_update(
        &self,
        _identifier: &Identifier,
        entry: &CachedEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Self::remaining(entry)
    }
}

/// Marker type: capacity has not been configured yet.
///
/// This is the initial state of a [`MokaCacheEngineBuilder`]. You must call either
/// [`max_entries()`](MokaCacheEngineBuilder::max_entries) or
/// [`max_bytes()`](MokaCacheEngineBuilder::max_bytes) before calling `build()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCapacity;

/// Marker type: entry-count capacity has been configured.
#[derive(Debug, Clone, Copy)]
pub struct EntryCapacity(pub(crate) u64);

/// Marker type: byte-based capacity has been configured.
#[derive(Debug, Clone, Copy)]
pub struct ByteCapacity(pub(crate) u64);

/// Builder for creating and configuring a [`MokaCacheEngine`].
///
/// Use [`MokaCacheEngine::builder`] to create a new builder instance.
///
/// `build()` is only available once capacity is set with exactly one of
/// [`max_entries`](Self::max_entries) or [`max_bytes`](Self::max_bytes).
///
/// ```
/// use pushlookup_moka::MokaCacheEngine;
///
/// let engine = MokaCacheEngine::builder()
///     .label("push-cache")
///     .max_bytes(64 * 1024 * 1024)
///     .build();
/// assert_eq!(engine.label.as_str(), "push-cache");
/// ```
#[derive(Debug)]
pub struct MokaCacheEngineBuilder<Cap> {
    capacity: Cap,
    label: EngineLabel,
    eviction_policy: Option<EvictionPolicy>,
}

impl MokaCacheEngineBuilder<NoCapacity> {
    /// Creates a new builder with no capacity configured.
    pub fn new() -> Self {
        Self {
            capacity: NoCapacity,
            label: EngineLabel::new_static("moka"),
            eviction_policy: None,
        }
    }

    /// Sets the maximum number of entries the cache can hold.
    pub fn max_entries(self, capacity: u64) -> MokaCacheEngineBuilder<EntryCapacity> {
        MokaCacheEngineBuilder {
            capacity: EntryCapacity(capacity),
            label: self.label,
            eviction_policy: self.eviction_policy,
        }
    }

    /// Sets the approximate memory budget in bytes.
    ///
    /// Each entry is weighed as its identifier and body length plus a fixed
    /// overhead.
    pub fn max_bytes(self, bytes: u64) -> MokaCacheEngineBuilder<ByteCapacity> {
        MokaCacheEngineBuilder {
            capacity: ByteCapacity(bytes),
            label: self.label,
            eviction_policy: self.eviction_policy,
        }
    }
}

impl Default for MokaCacheEngineBuilder<NoCapacity> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Cap> MokaCacheEngineBuilder<Cap> {
    /// Sets a custom label for this engine.
    ///
    /// # Default
    ///
    /// `"moka"`
    pub fn label(mut self, label: impl Into<EngineLabel>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets the eviction policy for the cache.
    ///
    /// # Default
    ///
    /// - entry-based capacity: [`EvictionPolicy::tiny_lfu()`]
    /// - byte-based capacity: [`EvictionPolicy::lru()`]
    pub fn eviction_policy(mut self, policy: EvictionPolicy) -> Self {
        self.eviction_policy = Some(policy);
        self
    }
}

impl MokaCacheEngineBuilder<EntryCapacity> {
    /// Builds the [`MokaCacheEngine`] bounded by entry count.
    ///
    /// Eviction defaults to TinyLFU.
    pub fn build(self) -> MokaCacheEngine {
        let policy = self
            .eviction_policy
            .unwrap_or_else(EvictionPolicy::tiny_lfu);
        let cache = CacheBuilder::new(self.capacity.0).eviction_policy(policy);
        finish(cache, self.label)
    }
}

impl MokaCacheEngineBuilder<ByteCapacity> {
    /// Builds the [`MokaCacheEngine`] bounded by approximate byte size.
    ///
    /// Eviction defaults to LRU: TinyLFU admission may refuse a freshly
    /// inserted body even when evicting older ones would make room.
    pub fn build(self) -> MokaCacheEngine {
        let policy = self.eviction_policy.unwrap_or_else(EvictionPolicy::lru);
        let cache = CacheBuilder::new(self.capacity.0)
            .weigher(entry_weight)
            .eviction_policy(policy);
        finish(cache, self.label)
    }
}

fn finish(
    cache: CacheBuilder<Identifier, CachedEntry, Cache<Identifier, CachedEntry>>,
    label: EngineLabel,
) -> MokaCacheEngine {
    MokaCacheEngine {
        cache: cache.expire_after(EntryExpiry).build(),
        label,
    }
}

fn entry_weight(identifier: &Identifier, entry: &CachedEntry) -> u32 {
    let bytes = identifier.as_str().len() + entry.body().len() + ENTRY_OVERHEAD;
    u32::try_from(bytes).unwrap_or(u32::MAX)
}
