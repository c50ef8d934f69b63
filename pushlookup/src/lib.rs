//! # pushlookup
//!
//! Cancels redundant resource pushes by checking the local cache first.
//!
//! When a producer is about to push a resource, [`LookupManager`] runs a
//! cache-only lookup for it. At most one lookup per identifier is pending at a
//! time. If the resource turns out to be cached, the push is canceled.
//!
//! ## Feature Flags
//!
//! - `metrics` - Record lookup counters, gauges and histograms via the `metrics` crate
#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

/// Error types for completion routing.
///
/// Defines [`RouteError`], raised when a completion targets an identifier
/// with no pending lookup.
pub mod error;

/// Lookup coordination.
///
/// Provides the [`LookupManager`](lookup::LookupManager) registry, the
/// [`LookupTask`](lookup::LookupTask) it drives, and their configuration.
pub mod lookup;

/// Metrics collection for lookup observability.
///
/// When the `metrics` feature is enabled, this module provides counters
/// and histograms for:
/// - Lookups started, deduplicated and skipped
/// - Lookup outcomes and canceled pushes
/// - Lookup latency and pending lookups
pub mod metrics;

pub use error::RouteError;
pub use lookup::{Dispatch, LookupConfig, LookupManager, LookupTask, TimeoutPolicy};

pub use pushlookup_core::{
    CacheEngine, EngineLabel, Identifier, LoadFlags, LookupError, LookupRequest, LookupStatus,
    PushProducer, RequestPriority, Transaction, TransactionStart,
};

/// The `pushlookup` prelude.
///
/// ```rust
/// use pushlookup::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{CacheEngine, Identifier, LookupManager, LookupStatus, PushProducer};
}
