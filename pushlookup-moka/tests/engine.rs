//! Tests for cache-only transactions against the Moka engine.

use chrono::Utc;
use pushlookup_core::{
    CacheEngine, Identifier, LoadFlags, LookupError, LookupRequest, LookupStatus,
    RequestPriority, TransactionStart,
};
use pushlookup_moka::{CachedEntry, MokaCacheEngine};

fn request(identifier: &str) -> LookupRequest {
    LookupRequest::cache_only(Identifier::new(identifier), RequestPriority::Idle)
}

async fn resolve(start: TransactionStart) -> LookupStatus {
    match start {
        TransactionStart::Ready(status) => status,
        TransactionStart::Pending(lookup) => lookup.await,
    }
}

#[tokio::test]
async fn uncached_identifier_misses_synchronously() {
    let engine = MokaCacheEngine::builder().max_entries(100).build();
    let mut transaction = engine.create_transaction(RequestPriority::Idle);

    match transaction.start(&request("/missing.js")) {
        TransactionStart::Ready(LookupStatus::Miss) => {}
        other => panic!("expected a synchronous miss, got {other:?}"),
    }
}

#[tokio::test]
async fn cached_identifier_hits_asynchronously() {
    let engine = MokaCacheEngine::builder().max_entries(100).build();
    engine.insert("/app.css", CachedEntry::new("body {}")).await;

    let mut transaction = engine.create_transaction(RequestPriority::Idle);
    let start = transaction.start(&request("/app.css"));
    assert!(start.is_pending());
    assert!(resolve(start).await.is_hit());
}

#[tokio::test]
async fn stale_entry_is_a_hit_when_validation_is_skipped() {
    let engine = MokaCacheEngine::builder().max_entries(100).build();
    let entry = CachedEntry::new("old").stale_at(Utc::now() - chrono::Duration::minutes(5));
    engine.insert("/stale.js", entry).await;

    let mut transaction = engine.create_transaction(RequestPriority::Idle);
    let status = resolve(transaction.start(&request("/stale.js"))).await;
    assert!(status.is_hit());
}

#[tokio::test]
async fn stale_entry_misses_when_validation_is_required() {
    let engine = MokaCacheEngine::builder().max_entries(100).build();
    let entry = CachedEntry::new("old").stale_at(Utc::now() - chrono::Duration::minutes(5));
    engine.insert("/stale.js", entry).await;

    let mut transaction = engine.create_transaction(RequestPriority::Idle);
    let request = request("/stale.js").with_load_flags(LoadFlags::ONLY_FROM_CACHE);
    let status = resolve(transaction.start(&request)).await;
    assert!(matches!(status, LookupStatus::Miss));
}

#[tokio::test]
async fn network_capable_request_is_refused() {
    let engine = MokaCacheEngine::builder().max_entries(100).build();
    engine.insert("/app.css", CachedEntry::new("body {}")).await;

    let mut transaction = engine.create_transaction(RequestPriority::Idle);
    let request = request("/app.css").with_load_flags(LoadFlags::empty());
    match transaction.start(&request) {
        TransactionStart::Ready(LookupStatus::Error(LookupError::CacheOnlyRequired)) => {}
        other => panic!("expected refusal, got {other:?}"),
    }
}

#[tokio::test]
async fn expired_entry_is_not_present() {
    let engine = MokaCacheEngine::builder().max_entries(100).build();
    let entry = CachedEntry::new("gone").expire_at(Utc::now() - chrono::Duration::seconds(1));
    engine.insert("/expired.js", entry).await;
    engine.cache().run_pending_tasks().await;

    assert!(!engine.contains(&Identifier::new("/expired.js")));
    let mut transaction = engine.create_transaction(RequestPriority::Idle);
    let status = resolve(transaction.start(&request("/expired.js"))).await;
    assert!(matches!(status, LookupStatus::Miss));
}

#[tokio::test]
async fn invalidated_entry_misses() {
    let engine = MokaCacheEngine::builder().max_entries(100).build();
    let identifier = Identifier::new("/app.css");
    engine.insert(identifier.clone(), CachedEntry::new("body {}")).await;
    engine.invalidate(&identifier).await;

    let mut transaction = engine.create_transaction(RequestPriority::Idle);
    let status = resolve(transaction.start(&request("/app.css"))).await;
    assert!(matches!(status, LookupStatus::Miss));
}

#[test]
fn label_defaults_to_moka() {
    let engine = MokaCacheEngine::builder().max_entries(1).build();
    assert_eq!(engine.label().as_str(), "moka");
}
