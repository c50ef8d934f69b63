//! Completions racing each other and teardown on a multi-thread runtime.

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use common::{RecordingProducer, ScriptedEngine};
use pushlookup::{Dispatch, Identifier, LookupManager, LookupStatus, RouteError};

/// Counts panics raised on any thread from now on, including spawned drivers.
fn count_panics() -> Arc<AtomicUsize> {
    let count = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&count);
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        seen.fetch_add(1, Ordering::SeqCst);
        previous(info);
    }));
    count
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn host_resolve_while_driver_finishes_is_quiet() {
    let panics = count_panics();
    let engine = ScriptedEngine::new();
    let tx = engine.pending_blocking(Duration::from_millis(300));
    let manager = LookupManager::with_defaults(engine.clone());
    let id = Identifier::new("/race.css");

    let (producer, probe) = RecordingProducer::new("/race.css");
    assert_eq!(manager.on_push_notification(producer), Dispatch::Pending);

    // The driver is now blocked inside its final poll.
    tx.send(LookupStatus::Hit).unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    manager.on_lookup_complete(&id, LookupStatus::Hit).unwrap();
    assert_eq!(probe.cancels(), 1);

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(probe.cancels(), 1);
    assert_eq!(panics.load(Ordering::SeqCst), 0);
    assert_eq!(
        manager.on_lookup_complete(&id, LookupStatus::Hit),
        Err(RouteError::Unregistered(id.clone()))
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn late_result_does_not_complete_newer_registration() {
    let engine = ScriptedEngine::new();
    let stale = engine.pending_blocking(Duration::from_millis(300));
    let fresh = engine.pending();
    let manager = LookupManager::with_defaults(engine.clone());
    let id = Identifier::new("/reused.js");

    let (first, first_probe) = RecordingProducer::new("/reused.js");
    assert_eq!(manager.on_push_notification(first), Dispatch::Pending);
    stale.send(LookupStatus::Hit).unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    manager.on_lookup_complete(&id, LookupStatus::Miss).unwrap();
    let (second, second_probe) = RecordingProducer::new("/reused.js");
    assert_eq!(manager.on_push_notification(second), Dispatch::Pending);

    // The first driver delivers its hit after the identifier was registered again.
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(manager.is_in_flight(&id));
    assert_eq!(first_probe.cancels(), 0);
    assert_eq!(second_probe.cancels(), 0);

    fresh.send(LookupStatus::Miss).unwrap();
    assert!(manager.wait_idle_timeout(Duration::from_secs(5)).await);
    assert_eq!(second_probe.cancels(), 0);
    assert!(second_probe.dropped());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn dropping_manager_waits_for_running_completion() {
    let engine = ScriptedEngine::new();
    let tx = engine.pending();
    let manager = LookupManager::with_defaults(engine.clone());

    let (producer, probe) =
        RecordingProducer::slow_cancel("/teardown.js", Duration::from_millis(300));
    assert_eq!(manager.on_push_notification(producer), Dispatch::Pending);

    // The driver is now inside the producer's cancel.
    tx.send(LookupStatus::Hit).unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;

    drop(manager);
    assert_eq!(probe.cancels(), 1);
    assert!(probe.dropped());
}
