//! Cached entries stored by [`MokaCacheEngine`](crate::MokaCacheEngine).

use bytes::Bytes;
use chrono::{DateTime, Utc};

/// A cached response body with optional freshness timestamps.
///
/// - after `stale_at` the entry still exists but needs revalidation to be
///   considered fresh
/// - after `expire_at` the entry is evicted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedEntry {
    body: Bytes,
    stale_at: Option<DateTime<Utc>>,
    expire_at: Option<DateTime<Utc>>,
}

impl CachedEntry {
    /// Creates an entry that never goes stale or expires.
    pub fn new(body: impl Into<Bytes>) -> Self {
        Self {
            body: body.into(),
            stale_at: None,
            expire_at: None,
        }
    }

    /// Sets the instant after which the entry is stale.
    pub fn stale_at(mut self, at: DateTime<Utc>) -> Self {
        self.stale_at = Some(at);
        self
    }

    /// Sets the instant after which the entry is evicted.
    pub fn expire_at(mut self, at: DateTime<Utc>) -> Self {
        self.expire_at = Some(at);
        self
    }

    /// The cached body.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// The eviction instant, if any.
    pub fn expire(&self) -> Option<DateTime<Utc>> {
        self.expire_at
    }

    /// Returns `true` if the entry is past its staleness instant at `now`.
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        self.stale_at.is_some_and(|stale_at| stale_at <= now)
    }
}
