//! A single cache-only existence check.

use pushlookup_core::{
    CacheEngine, Identifier, LookupRequest, LookupStatus, PushProducer, RequestPriority,
    Transaction, TransactionStart,
};
use tokio::task::AbortHandle;
use tokio::time::Instant;
use tracing::{Span, debug, field, info_span};

use crate::metrics;

/// How a lookup reached its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionMode {
    /// The engine answered before `start` returned.
    Sync,
    /// The answer arrived later through the pending future.
    Async,
}

impl CompletionMode {
    /// Returns the mode as a string slice for span fields and metric labels.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            CompletionMode::Sync => "sync",
            CompletionMode::Async => "async",
        }
    }
}

/// One in-flight cache lookup tied to one push producer.
///
/// The task exclusively owns the producer handle, the request descriptor and,
/// once started, the engine transaction. [`complete`](Self::complete) consumes
/// the task, so a lookup can only ever complete once. Dropping an unfinished
/// task abandons the read and lets the push proceed.
pub struct LookupTask {
    identifier: Identifier,
    producer: Box<dyn PushProducer>,
    request: LookupRequest,
    transaction: Option<Box<dyn Transaction>>,
    driver: Option<AbortHandle>,
    generation: u64,
    span: Span,
    started_at: Option<Instant>,
}

impl LookupTask {
    /// Wraps `producer` in a task whose request will be created with `priority`.
    pub fn new(producer: Box<dyn PushProducer>, priority: RequestPriority) -> Self {
        let identifier = producer.identifier().clone();
        let request = LookupRequest::cache_only(identifier.clone(), priority);
        Self {
            identifier,
            producer,
            request,
            transaction: None,
            driver: None,
            generation: 0,
            span: Span::none(),
            started_at: None,
        }
    }

    /// Identifier of the resource being checked.
    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    /// The cache-only request this task issues.
    pub fn request(&self) -> &LookupRequest {
        &self.request
    }

    /// Span covering the lifetime of this lookup.
    pub fn span(&self) -> &Span {
        &self.span
    }

    /// Returns `true` once [`start_lookup`](Self::start_lookup) has run.
    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    /// Creates a transaction on `engine` and starts the cache-only read.
    ///
    /// Returns whatever the transaction reported: a ready status, or a pending
    /// future the caller must drive and feed back into [`complete`](Self::complete).
    pub fn start_lookup<E>(&mut self, engine: &E) -> TransactionStart
    where
        E: CacheEngine + ?Sized,
    {
        debug_assert!(!self.is_started(), "lookup task started twice");

        self.span = info_span!(
            "pushlookup.lookup",
            identifier = %self.identifier,
            engine = %engine.label(),
            priority = ?self.request.priority(),
            mode = field::Empty,
            status = field::Empty,
        );
        let _entered = self.span.enter();
        self.started_at = Some(Instant::now());

        let transaction = self
            .transaction
            .insert(engine.create_transaction(self.request.priority()));
        let start = transaction.start(&self.request);
        debug!(pending = start.is_pending(), "cache-only lookup started");
        metrics::record_started();
        start
    }

    /// Attaches the handle of the future driving a pending lookup, so that
    /// dropping the task also stops the driver. `generation` identifies this
    /// registration to the driver.
    pub(crate) fn attach_driver(&mut self, driver: AbortHandle, generation: u64) {
        self.driver = Some(driver);
        self.generation = generation;
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation
    }

    /// Finishes the lookup: a hit cancels the push, anything else leaves it alone.
    pub fn complete(mut self, status: LookupStatus, mode: CompletionMode) {
        let _entered = self.span.clone().entered();
        self.span.record("mode", mode.as_str());
        self.span.record("status", status.as_str());

        let canceled = status.is_hit();
        if canceled {
            self.producer.cancel();
        }

        match &status {
            LookupStatus::Error(error) => debug!(%error, "lookup failed, push proceeds"),
            _ => debug!(canceled, "lookup complete"),
        }
        metrics::record_completed(
            status.as_str(),
            mode.as_str(),
            canceled,
            self.started_at.map(|start| start.elapsed()),
        );
    }
}

impl Drop for LookupTask {
    fn drop(&mut self) {
        if let Some(driver) = self.driver.take() {
            driver.abort();
        }
    }
}

impl std::fmt::Debug for LookupTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupTask")
            .field("identifier", &self.identifier)
            .field("request", &self.request)
            .field("started", &self.is_started())
            .field("pending", &self.driver.is_some())
            .finish()
    }
}
