//! Multi-level cache coordinator.
//!
//! Presents a single cache-shaped API over two tiers: a private
//! [`LocalCache`] (L1) and a shared [`RemoteCache`] (L2). The remote tier is
//! the source of truth; the local tier is purely an accelerator that may be
//! empty, stale-within-TTL, or behind the remote at any time.
//!
//! # Consistency policy
//!
//! The remote tier is always mutated before the local one, and a remote
//! failure short-circuits the operation with the local tier untouched. The
//! local tier therefore only ever holds data the remote tier reflected at
//! write time - it can be briefly stale relative to a concurrent delete from
//! another process (bounded by the local TTL), but never ahead.
//!
//! Reads check local first; on a miss they fall through to remote and
//! backfill local best-effort with the local default TTL. All read paths
//! backfill - [`MultiLevelCache::get_arc`] included.
//!
//! Concurrent misses on the same key each independently query the remote
//! tier and backfill; there is no stampede guard here. Callers that need to
//! serialize an expensive recomputation use [`crate::lock::DistributedLock`]
//! around it.

use crate::error::Result;
use crate::local::LocalCache;
use crate::metrics::{CacheMetrics, NoOpMetrics};
use crate::remote::RemoteCache;
use crate::serialization::CacheValue;
use crate::store::RemoteStore;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Coordinator over one local and one remote cache of the same value type.
///
/// Holds no mutable state of its own beyond the two tier handles; safe to
/// share behind an `Arc`.
///
/// # Example
///
/// ```
/// use tierkit::local::{LocalCache, LocalCacheConfig};
/// use tierkit::multilevel::MultiLevelCache;
/// use tierkit::remote::RemoteCache;
/// use tierkit::store::InMemoryStore;
/// use std::time::Duration;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> tierkit::Result<()> {
/// let local = LocalCache::new(&LocalCacheConfig::default())?;
/// let remote = RemoteCache::new(InMemoryStore::new(), Duration::from_secs(300));
/// let cache: MultiLevelCache<String, _> = MultiLevelCache::new(local, remote);
///
/// cache.set_with_default_ttl("greeting", "hello".to_string()).await?;
/// assert_eq!(cache.get("greeting").await?, "hello");
/// # Ok(())
/// # }
/// ```
pub struct MultiLevelCache<V, S: RemoteStore> {
    local: LocalCache<V>,
    remote: RemoteCache<V, S>,
    metrics: Arc<dyn CacheMetrics>,
}

impl<V: CacheValue, S: RemoteStore> MultiLevelCache<V, S> {
    /// Compose a coordinator from its two tiers.
    pub fn new(local: LocalCache<V>, remote: RemoteCache<V, S>) -> Self {
        MultiLevelCache {
            local,
            remote,
            metrics: Arc::new(NoOpMetrics),
        }
    }

    /// Set custom metrics handler.
    pub fn with_metrics(mut self, metrics: Arc<dyn CacheMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Fetch the value under `key`: local tier first, remote fallback.
    ///
    /// A remote hit is backfilled into the local tier with the local default
    /// TTL; failure to admit it is logged, not propagated.
    ///
    /// # Errors
    /// - `Error::RemoteUnavailable` if both tiers miss or the remote call fails
    /// - `Error::Deserialization` if the remote entry is corrupt
    pub async fn get(&self, key: &str) -> Result<V> {
        let start = Instant::now();

        if let Some(value) = self.local.get(key) {
            self.metrics.record_hit(key, start.elapsed());
            return Ok(value);
        }
        debug!("local tier miss for key {}", key);

        let value = match self.remote.get(key).await {
            Ok(value) => value,
            Err(e) => {
                self.metrics.record_error(key, &e.to_string());
                return Err(e);
            }
        };

        if !self.local.set_with_default_ttl(key, value.clone()) {
            warn!("local tier backfill rejected for key {}", key);
        }

        self.metrics.record_miss(key, start.elapsed());
        Ok(value)
    }

    /// Like [`Self::get`], returning a shared handle instead of a copy.
    ///
    /// Backfills the local tier on a remote hit just like `get`, admitting
    /// the same shared handle it returns.
    ///
    /// # Errors
    /// Same as [`Self::get`].
    pub async fn get_arc(&self, key: &str) -> Result<Arc<V>> {
        let start = Instant::now();

        if let Some(value) = self.local.get_arc(key) {
            self.metrics.record_hit(key, start.elapsed());
            return Ok(value);
        }
        debug!("local tier miss for key {}", key);

        let value = match self.remote.get_arc(key).await {
            Ok(value) => value,
            Err(e) => {
                self.metrics.record_error(key, &e.to_string());
                return Err(e);
            }
        };

        if !self
            .local
            .admit(key, Arc::clone(&value), self.local.default_ttl())
        {
            warn!("local tier backfill rejected for key {}", key);
        }

        self.metrics.record_miss(key, start.elapsed());
        Ok(value)
    }

    /// Write `value` through both tiers with independent TTLs.
    ///
    /// The remote tier is written first; if that fails the operation aborts
    /// with the local tier untouched. Local admission failure is logged only
    /// - the call still succeeds, since the remote tier already holds the
    /// value and a later miss recovers it.
    ///
    /// # Errors
    /// - `Error::Serialization` if encoding fails
    /// - `Error::RemoteUnavailable` if the remote write fails
    pub async fn set_with_ttl(
        &self,
        key: &str,
        value: V,
        l1_ttl: Duration,
        l2_ttl: Duration,
    ) -> Result<()> {
        let start = Instant::now();

        if let Err(e) = self.remote.set_with_ttl(key, &value, l2_ttl).await {
            self.metrics.record_error(key, &e.to_string());
            return Err(e);
        }
        if !self.local.set_with_ttl(key, value, l1_ttl) {
            warn!("local tier set rejected for key {}", key);
        }

        self.metrics.record_set(key, start.elapsed());
        Ok(())
    }

    /// Write `value` through both tiers with each tier's default TTL.
    ///
    /// # Errors
    /// Same as [`Self::set_with_ttl`].
    pub async fn set_with_default_ttl(&self, key: &str, value: V) -> Result<()> {
        let l1_ttl = self.local.default_ttl();
        let l2_ttl = self.remote.default_ttl();
        self.set_with_ttl(key, value, l1_ttl, l2_ttl).await
    }

    /// Delete `key` from both tiers, remote first.
    ///
    /// A remote failure propagates with the local tier untouched - clearing
    /// local first could let a stale remote value be read back and
    /// re-admitted. On remote success the local delete is unconditional.
    ///
    /// # Errors
    /// Returns `Error::RemoteUnavailable` if the remote delete fails.
    pub async fn del(&self, key: &str) -> Result<()> {
        let start = Instant::now();

        if let Err(e) = self.remote.del(key).await {
            self.metrics.record_error(key, &e.to_string());
            return Err(e);
        }
        self.local.del(key);

        self.metrics.record_delete(key, start.elapsed());
        Ok(())
    }
}
