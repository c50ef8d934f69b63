//! Scripted cache engine and recording producer shared by integration tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use pushlookup::{
    CacheEngine, Identifier, LookupError, LookupRequest, LookupStatus, PushProducer,
    RequestPriority, Transaction, TransactionStart,
};
use tokio::sync::oneshot;

/// How the next started transaction answers.
enum Plan {
    Ready(LookupStatus),
    Pending(oneshot::Receiver<LookupStatus>),
    /// Blocks the polling worker for the delay once the answer arrives.
    Blocking(oneshot::Receiver<LookupStatus>, Duration),
}

#[derive(Default)]
struct ScriptState {
    plans: Mutex<VecDeque<Plan>>,
    requests: Mutex<Vec<LookupRequest>>,
    created: AtomicUsize,
    started: AtomicUsize,
    dropped: AtomicUsize,
}

/// Cache engine whose transactions answer according to queued plans.
///
/// Transactions started without a queued plan answer with a synchronous miss.
#[derive(Clone, Default)]
pub struct ScriptedEngine {
    state: Arc<ScriptState>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a synchronous answer.
    pub fn ready(&self, status: LookupStatus) {
        self.state.plans.lock().unwrap().push_back(Plan::Ready(status));
    }

    /// Queue a pending answer resolved through the returned sender.
    pub fn pending(&self) -> oneshot::Sender<LookupStatus> {
        let (tx, rx) = oneshot::channel();
        self.state.plans.lock().unwrap().push_back(Plan::Pending(rx));
        tx
    }

    /// Queue a pending answer whose future blocks its worker thread for
    /// `delay` after the answer is sent, before resolving.
    pub fn pending_blocking(&self, delay: Duration) -> oneshot::Sender<LookupStatus> {
        let (tx, rx) = oneshot::channel();
        self.state
            .plans
            .lock()
            .unwrap()
            .push_back(Plan::Blocking(rx, delay));
        tx
    }

    pub fn created(&self) -> usize {
        self.state.created.load(Ordering::SeqCst)
    }

    pub fn started(&self) -> usize {
        self.state.started.load(Ordering::SeqCst)
    }

    /// Number of transactions dropped so far.
    pub fn dropped(&self) -> usize {
        self.state.dropped.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<LookupRequest> {
        self.state.requests.lock().unwrap().clone()
    }
}

impl CacheEngine for ScriptedEngine {
    fn create_transaction(&self, _priority: RequestPriority) -> Box<dyn Transaction> {
        self.state.created.fetch_add(1, Ordering::SeqCst);
        Box::new(ScriptedTransaction {
            state: Arc::clone(&self.state),
        })
    }
}

struct ScriptedTransaction {
    state: Arc<ScriptState>,
}

impl Transaction for ScriptedTransaction {
    fn start(&mut self, request: &LookupRequest) -> TransactionStart {
        self.state.started.fetch_add(1, Ordering::SeqCst);
        self.state.requests.lock().unwrap().push(request.clone());
        let plan = self.state.plans.lock().unwrap().pop_front();
        match plan {
            None => TransactionStart::Ready(LookupStatus::Miss),
            Some(Plan::Ready(status)) => TransactionStart::Ready(status),
            Some(Plan::Pending(rx)) => TransactionStart::pending(async move {
                rx.await
                    .unwrap_or(LookupStatus::Error(LookupError::Unavailable))
            }),
            Some(Plan::Blocking(rx, delay)) => TransactionStart::pending(async move {
                let status = rx
                    .await
                    .unwrap_or(LookupStatus::Error(LookupError::Unavailable));
                std::thread::sleep(delay);
                status
            }),
        }
    }
}

impl Drop for ScriptedTransaction {
    fn drop(&mut self) {
        self.state.dropped.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
struct ProbeState {
    cancels: AtomicUsize,
    dropped: AtomicBool,
}

/// Observes what happened to a [`RecordingProducer`] after it was handed off.
#[derive(Clone, Default)]
pub struct ProducerProbe {
    state: Arc<ProbeState>,
}

impl ProducerProbe {
    pub fn cancels(&self) -> usize {
        self.state.cancels.load(Ordering::SeqCst)
    }

    /// `true` once the manager released the producer handle.
    pub fn dropped(&self) -> bool {
        self.state.dropped.load(Ordering::SeqCst)
    }
}

/// Push producer that records cancellation.
pub struct RecordingProducer {
    identifier: Identifier,
    probe: ProducerProbe,
    cancel_delay: Option<Duration>,
}

impl RecordingProducer {
    pub fn new(identifier: &str) -> (Box<dyn PushProducer>, ProducerProbe) {
        Self::build(identifier, None)
    }

    /// Producer whose `cancel` blocks for `delay` before it is recorded.
    pub fn slow_cancel(identifier: &str, delay: Duration) -> (Box<dyn PushProducer>, ProducerProbe) {
        Self::build(identifier, Some(delay))
    }

    fn build(
        identifier: &str,
        cancel_delay: Option<Duration>,
    ) -> (Box<dyn PushProducer>, ProducerProbe) {
        let probe = ProducerProbe::default();
        let producer = RecordingProducer {
            identifier: Identifier::new(identifier),
            probe: probe.clone(),
            cancel_delay,
        };
        (Box::new(producer), probe)
    }
}

impl PushProducer for RecordingProducer {
    fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    fn cancel(&mut self) {
        if let Some(delay) = self.cancel_delay {
            std::thread::sleep(delay);
        }
        self.probe.state.cancels.fetch_add(1, Ordering::SeqCst);
    }
}

impl Drop for RecordingProducer {
    fn drop(&mut self) {
        self.probe.state.dropped.store(true, Ordering::SeqCst);
    }
}

/// Give spawned lookup drivers a chance to run.
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}
