//! Integration tests against a real Redis server.
//!
//! All tests are `#[ignore]`d; run them with a local Redis on 6379:
//!
//! ```bash
//! cargo test --features redis -- --ignored
//! ```

#![cfg(feature = "redis")]

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tierkit::local::LocalCacheConfig;
use tierkit::store::RedisStore;
use tierkit::{CacheFactory, Error};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
struct Order {
    id: String,
    user_id: String,
    total: f64,
}

fn order() -> Order {
    Order {
        id: "order_1".to_string(),
        user_id: "user_1".to_string(),
        total: 99.5,
    }
}

fn redis_factory() -> CacheFactory<RedisStore> {
    let _ = env_logger::builder().is_test(true).try_init();
    let store = RedisStore::from_connection_string("redis://localhost:6379/0")
        .expect("Failed to create Redis store");
    CacheFactory::new(store, LocalCacheConfig::default(), Duration::from_secs(60))
        .expect("Failed to build factory")
}

#[tokio::test]
#[ignore]
async fn test_redis_coordinator_roundtrip() {
    let cache = redis_factory().cache::<Order>().unwrap();

    cache
        .set_with_ttl(
            "tierkit_it:order:1",
            order(),
            Duration::from_secs(10),
            Duration::from_secs(30),
        )
        .await
        .expect("Failed to set");

    assert_eq!(
        cache.get("tierkit_it:order:1").await.expect("Failed to get"),
        order()
    );

    cache.del("tierkit_it:order:1").await.expect("Failed to del");
    assert!(matches!(
        cache.get("tierkit_it:order:1").await.unwrap_err(),
        Error::RemoteUnavailable(_)
    ));
}

#[tokio::test]
#[ignore]
async fn test_redis_backfill_across_coordinators() {
    let f = redis_factory();
    let writer = f.cache::<Order>().unwrap();
    let reader = f.cache::<Order>().unwrap();

    writer
        .set_with_default_ttl("tierkit_it:order:2", order())
        .await
        .expect("Failed to set");

    // The reader's local tier has never seen the key; the remote tier serves
    assert_eq!(
        reader.get("tierkit_it:order:2").await.expect("Failed to get"),
        order()
    );

    writer.del("tierkit_it:order:2").await.expect("Failed to del");
}

#[tokio::test]
#[ignore]
async fn test_redis_lock_contention_and_release() {
    let f = redis_factory();
    let lock = f.lock();

    let token = lock
        .acquire("tierkit_it:lock", Duration::from_secs(30))
        .await
        .expect("Failed to acquire")
        .expect("Lock should be free");

    assert!(lock
        .acquire("tierkit_it:lock", Duration::from_secs(30))
        .await
        .expect("Contention must not be an error")
        .is_none());

    assert!(lock
        .release("tierkit_it:lock", &token)
        .await
        .expect("Failed to release"));

    // Double release is a silent no-op
    assert!(!lock
        .release("tierkit_it:lock", &token)
        .await
        .expect("No-op, not error"));
}

#[tokio::test]
#[ignore]
async fn test_redis_ttl_expiry() {
    let f = redis_factory();
    let cache = f.cache::<Order>().unwrap();

    cache
        .set_with_ttl(
            "tierkit_it:order:ttl",
            order(),
            Duration::from_secs(1),
            Duration::from_secs(1),
        )
        .await
        .expect("Failed to set");

    tokio::time::sleep(Duration::from_secs(2)).await;

    assert!(matches!(
        cache.get("tierkit_it:order:ttl").await.unwrap_err(),
        Error::RemoteUnavailable(_)
    ));
}
