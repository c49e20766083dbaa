//! Wiring: one factory per deployment, one coordinator per value type.
//!
//! The factory owns the shared remote store handle plus the tuning every
//! coordinator shares (local cache parameters, remote default TTL). Each
//! [`CacheFactory::cache`] call wires a fresh, private local tier to a remote
//! tier on the shared store; [`CacheFactory::lock`] hands out lock primitives
//! over the same store handle.

use crate::error::Result;
use crate::local::{LocalCache, LocalCacheConfig};
use crate::lock::DistributedLock;
use crate::multilevel::MultiLevelCache;
use crate::remote::RemoteCache;
use crate::serialization::CacheValue;
use crate::store::RemoteStore;
use std::time::Duration;

/// Builds coordinators and locks over one shared remote store.
///
/// # Example
///
/// ```
/// use tierkit::factory::CacheFactory;
/// use tierkit::local::LocalCacheConfig;
/// use tierkit::store::InMemoryStore;
/// use std::time::Duration;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> tierkit::Result<()> {
/// let factory = CacheFactory::new(
///     InMemoryStore::new(),
///     LocalCacheConfig::default(),
///     Duration::from_secs(300),
/// )?;
///
/// let users = factory.cache::<String>()?;
/// let lock = factory.lock();
///
/// users.set_with_default_ttl("user:1", "Alice".to_string()).await?;
/// assert_eq!(users.get("user:1").await?, "Alice");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct CacheFactory<S: RemoteStore> {
    store: S,
    local_config: LocalCacheConfig,
    remote_default_ttl: Duration,
}

impl<S: RemoteStore> CacheFactory<S> {
    /// Create a factory from a shared store handle and shared tuning.
    ///
    /// # Errors
    /// Returns `Error::Config` if the local cache configuration is invalid;
    /// the factory never aborts the process.
    pub fn new(
        store: S,
        local_config: LocalCacheConfig,
        remote_default_ttl: Duration,
    ) -> Result<Self> {
        local_config.validate()?;
        Ok(CacheFactory {
            store,
            local_config,
            remote_default_ttl,
        })
    }

    /// Wire a coordinator for one value type.
    ///
    /// The local tier is private to the returned coordinator; the remote
    /// tier shares the factory's store handle.
    ///
    /// # Errors
    /// Returns `Error::Config` if the local tier cannot be constructed.
    pub fn cache<V: CacheValue>(&self) -> Result<MultiLevelCache<V, S>> {
        let local = LocalCache::new(&self.local_config)?;
        let remote = RemoteCache::new(self.store.clone(), self.remote_default_ttl);
        Ok(MultiLevelCache::new(local, remote))
    }

    /// A lock primitive over the factory's store handle.
    pub fn lock(&self) -> DistributedLock<S> {
        DistributedLock::new(self.store.clone())
    }
}

#[cfg(all(test, feature = "inmemory"))]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::store::InMemoryStore;

    #[test]
    fn test_invalid_config_is_typed_error() {
        let bad = LocalCacheConfig {
            max_cost: 0,
            ..LocalCacheConfig::default()
        };

        let result = CacheFactory::new(InMemoryStore::new(), bad, Duration::from_secs(60));
        assert!(matches!(result.unwrap_err(), Error::Config(_)));
    }

    #[tokio::test]
    async fn test_caches_share_remote_store() {
        let store = InMemoryStore::new();
        let factory = CacheFactory::new(
            store,
            LocalCacheConfig::default(),
            Duration::from_secs(60),
        )
        .unwrap();

        // Two coordinators of the same type share the remote keyspace but
        // not the local tier
        let a = factory.cache::<u64>().unwrap();
        let b = factory.cache::<u64>().unwrap();

        a.set_with_default_ttl("n", 7).await.unwrap();
        assert_eq!(b.get("n").await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_lock_shares_store_with_caches() {
        let factory = CacheFactory::new(
            InMemoryStore::new(),
            LocalCacheConfig::default(),
            Duration::from_secs(60),
        )
        .unwrap();

        let lock_a = factory.lock();
        let lock_b = factory.lock();

        let token = lock_a
            .acquire("job", Duration::from_secs(10))
            .await
            .unwrap()
            .unwrap();
        // Same keyspace: a second handle contends
        assert!(lock_b
            .acquire("job", Duration::from_secs(10))
            .await
            .unwrap()
            .is_none());
        assert!(lock_a.release("job", &token).await.unwrap());
    }
}
