//! Cache engine and transaction traits.
//!
//! The lookup coordinator never reads cache entries itself. It asks a
//! [`CacheEngine`] for a [`Transaction`] and starts it with a cache-only
//! [`LookupRequest`]. Starting a transaction answers in one of two ways:
//!
//! - [`TransactionStart::Ready`] - the engine knew the answer immediately
//! - [`TransactionStart::Pending`] - the answer arrives later through a future
//!
//! Callers handle both through the same completion routine, so an engine is
//! free to answer synchronously whenever it can.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;

use crate::{EngineLabel, LookupRequest, LookupStatus, RequestPriority};

/// Result of starting a transaction.
pub enum TransactionStart {
    /// The lookup finished before `start` returned.
    Ready(LookupStatus),
    /// The lookup is in flight; the future resolves to its final status.
    Pending(BoxFuture<'static, LookupStatus>),
}

impl TransactionStart {
    /// Wraps a future as a pending start.
    ///
    /// ```
    /// use pushlookup_core::{LookupStatus, TransactionStart};
    ///
    /// let start = TransactionStart::pending(async { LookupStatus::Miss });
    /// assert!(start.is_pending());
    /// ```
    pub fn pending<F>(future: F) -> Self
    where
        F: Future<Output = LookupStatus> + Send + 'static,
    {
        TransactionStart::Pending(Box::pin(future))
    }

    /// Returns `true` if the result will arrive later.
    pub fn is_pending(&self) -> bool {
        matches!(self, TransactionStart::Pending(_))
    }
}

impl fmt::Debug for TransactionStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionStart::Ready(status) => f.debug_tuple("Ready").field(status).finish(),
            TransactionStart::Pending(_) => f.write_str("Pending"),
        }
    }
}

/// A single read operation created by a [`CacheEngine`].
///
/// A transaction is started at most once. The owner keeps it alive until the
/// lookup completes; dropping it abandons the read.
pub trait Transaction: Send + Sync {
    /// Starts the read described by `request`.
    fn start(&mut self, request: &LookupRequest) -> TransactionStart;
}

/// Factory for cache transactions.
pub trait CacheEngine: Send + Sync {
    /// Creates a new, unstarted transaction.
    fn create_transaction(&self, priority: RequestPriority) -> Box<dyn Transaction>;

    /// Returns the label of this engine for spans and metrics.
    fn label(&self) -> EngineLabel {
        EngineLabel::new_static("engine")
    }
}

impl<E> CacheEngine for Arc<E>
where
    E: CacheEngine + ?Sized,
{
    fn create_transaction(&self, priority: RequestPriority) -> Box<dyn Transaction> {
        (**self).create_transaction(priority)
    }

    fn label(&self) -> EngineLabel {
        (**self).label()
    }
}

impl<E> CacheEngine for Box<E>
where
    E: CacheEngine + ?Sized,
{
    fn create_transaction(&self, priority: RequestPriority) -> Box<dyn Transaction> {
        (**self).create_transaction(priority)
    }

    fn label(&self) -> EngineLabel {
        (**self).label()
    }
}
