//! Request descriptor for cache-only reads.
//!
//! A [`LookupRequest`] describes the single read a lookup performs: a `GET`
//! for the pushed identifier, answered from the local cache only and without
//! revalidating freshness against the origin.

use bitflags::bitflags;
use http::Method;
use serde::{Deserialize, Serialize};

use crate::Identifier;

bitflags! {
    /// Flags controlling how a cache engine may satisfy a read.
    ///
    /// [`LoadFlags::empty()`] places no constraint on the engine.
    ///
    /// # Example
    /// ```
    /// use pushlookup_core::LoadFlags;
    ///
    /// let flags = LoadFlags::ONLY_FROM_CACHE | LoadFlags::SKIP_CACHE_VALIDATION;
    /// assert!(flags.contains(LoadFlags::ONLY_FROM_CACHE));
    /// assert!(!LoadFlags::empty().contains(LoadFlags::SKIP_CACHE_VALIDATION));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct LoadFlags: u32 {
        /// Answer from the cache only; a miss must not reach the network.
        const ONLY_FROM_CACHE = 1 << 0;
        /// Treat a cached entry as usable without checking its freshness.
        const SKIP_CACHE_VALIDATION = 1 << 1;
    }
}

/// Scheduling priority handed to the cache engine when a transaction is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestPriority {
    /// Held back until higher priority work is done.
    Throttled,
    /// Background work.
    #[default]
    Idle,
    /// Lowest non-idle priority.
    Lowest,
    /// Low priority.
    Low,
    /// Medium priority.
    Medium,
    /// Highest priority.
    Highest,
}

/// Owned request descriptor for one cache-only lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    identifier: Identifier,
    method: Method,
    load_flags: LoadFlags,
    priority: RequestPriority,
}

impl LookupRequest {
    /// Builds a `GET` request for `identifier` that may only be answered from
    /// the cache and skips freshness validation.
    ///
    /// ```
    /// use pushlookup_core::{Identifier, LoadFlags, LookupRequest, RequestPriority};
    ///
    /// let request = LookupRequest::cache_only(Identifier::new("/a.css"), RequestPriority::Idle);
    /// assert_eq!(request.method(), &http::Method::GET);
    /// assert!(request.load_flags().contains(LoadFlags::ONLY_FROM_CACHE));
    /// ```
    pub fn cache_only(identifier: Identifier, priority: RequestPriority) -> Self {
        Self {
            identifier,
            method: Method::GET,
            load_flags: LoadFlags::ONLY_FROM_CACHE | LoadFlags::SKIP_CACHE_VALIDATION,
            priority,
        }
    }

    /// Replaces the load flags.
    ///
    /// Lookups always use the cache-only flags; this exists for engines that
    /// need to exercise other combinations.
    pub fn with_load_flags(mut self, load_flags: LoadFlags) -> Self {
        self.load_flags = load_flags;
        self
    }

    /// Identifier of the resource being looked up.
    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    /// Request method. Always `GET` for cache-only lookups.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Flags constraining how the engine may answer.
    pub fn load_flags(&self) -> LoadFlags {
        self.load_flags
    }

    /// Priority the transaction was created with.
    pub fn priority(&self) -> RequestPriority {
        self.priority
    }
}
