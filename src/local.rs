//! In-process cache tier (L1).
//!
//! A bounded, typed accelerator in front of the remote tier. Every mutation
//! is best-effort: a write that would blow the admission budget is rejected
//! with a `false` return, logged, and never surfaced as an error. Absence on
//! read is a plain `None` - never set, evicted and expired are deliberately
//! indistinguishable to the caller.
//!
//! Values are held behind `Arc` so [`LocalCache::get_arc`] can hand out a
//! shared handle without copying the value.

use crate::error::{Error, Result};
use crate::serialization::CacheValue;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Construction-time tuning for the local tier.
///
/// Sized relative to expected key cardinality and value size:
/// - `num_counters`: estimate of distinct keys, used as the map capacity hint
/// - `max_cost`: admission budget; each admitted entry costs one unit
/// - `buffer_items`: shard width bounding write contention (power of two)
/// - `default_ttl`: applied when no explicit TTL is given
#[derive(Clone, Debug)]
pub struct LocalCacheConfig {
    pub num_counters: usize,
    pub max_cost: u64,
    pub buffer_items: usize,
    pub default_ttl: Duration,
}

impl Default for LocalCacheConfig {
    fn default() -> Self {
        LocalCacheConfig {
            num_counters: 100_000,
            max_cost: 10_000,
            buffer_items: 64,
            default_ttl: Duration::from_secs(60),
        }
    }
}

impl LocalCacheConfig {
    /// Validate tuning parameters.
    ///
    /// # Errors
    /// Returns `Error::Config` instead of aborting, so the embedding
    /// application decides how to handle a bad configuration.
    pub fn validate(&self) -> Result<()> {
        if self.num_counters == 0 {
            return Err(Error::Config("num_counters must be > 0".to_string()));
        }
        if self.max_cost == 0 {
            return Err(Error::Config("max_cost must be > 0".to_string()));
        }
        if self.buffer_items < 2 || !self.buffer_items.is_power_of_two() {
            return Err(Error::Config(
                "buffer_items must be a power of two >= 2".to_string(),
            ));
        }
        if self.default_ttl.is_zero() {
            return Err(Error::Config("default_ttl must be > 0".to_string()));
        }
        Ok(())
    }
}

struct LocalEntry<V> {
    value: Arc<V>,
    expires_at: Instant,
}

impl<V> LocalEntry<V> {
    fn new(value: Arc<V>, ttl: Duration) -> Self {
        LocalEntry {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() > self.expires_at
    }
}

/// Bounded, cost-accounted in-process cache.
///
/// Thread-safe via DashMap sharding; all operations are non-blocking and
/// roughly constant-time. Instances are private to one coordinator and not
/// meant to be shared across value types.
///
/// # Example
///
/// ```
/// use tierkit::local::{LocalCache, LocalCacheConfig};
/// use std::time::Duration;
///
/// # fn main() -> tierkit::Result<()> {
/// let cache: LocalCache<String> = LocalCache::new(&LocalCacheConfig::default())?;
///
/// assert!(cache.set_with_ttl("greeting", "hello".to_string(), Duration::from_secs(60)));
/// assert_eq!(cache.get("greeting"), Some("hello".to_string()));
/// assert_eq!(cache.get("absent"), None);
/// # Ok(())
/// # }
/// ```
pub struct LocalCache<V> {
    store: DashMap<String, LocalEntry<V>>,
    max_cost: u64,
    default_ttl: Duration,
}

impl<V: CacheValue> LocalCache<V> {
    /// Create a local cache from validated tuning parameters.
    ///
    /// # Errors
    /// Returns `Error::Config` if the configuration is invalid.
    pub fn new(config: &LocalCacheConfig) -> Result<Self> {
        config.validate()?;
        Ok(LocalCache {
            store: DashMap::with_capacity_and_shard_amount(
                config.num_counters,
                config.buffer_items,
            ),
            max_cost: config.max_cost,
            default_ttl: config.default_ttl,
        })
    }

    /// Store `value` under `key` for `ttl`, subject to admission.
    ///
    /// Returns `false` when the entry was rejected under budget pressure;
    /// rejection is logged and is a normal outcome, not an error.
    pub fn set_with_ttl(&self, key: &str, value: V, ttl: Duration) -> bool {
        self.admit(key, Arc::new(value), ttl)
    }

    /// Store `value` under `key` with the configured default TTL.
    pub fn set_with_default_ttl(&self, key: &str, value: V) -> bool {
        self.admit(key, Arc::new(value), self.default_ttl)
    }

    /// Admit an already-shared value, e.g. when backfilling from the remote
    /// tier without copying.
    ///
    /// Over budget, expired entries are swept once to reclaim cost; if the
    /// tier is still full the write is rejected. Replacing a live entry
    /// never counts against the budget.
    pub fn admit(&self, key: &str, value: Arc<V>, ttl: Duration) -> bool {
        if !self.store.contains_key(key) && self.cost() >= self.max_cost {
            self.purge_expired();
            if self.cost() >= self.max_cost {
                debug!("local cache admission rejected for key {}", key);
                return false;
            }
        }

        // Budget check and insert are not one atomic step; concurrent
        // writers may briefly overshoot max_cost by their in-flight count.
        self.store
            .insert(key.to_string(), LocalEntry::new(value, ttl));
        true
    }

    /// Fetch a copy of the value under `key`.
    ///
    /// `None` covers never-set, evicted and expired alike.
    pub fn get(&self, key: &str) -> Option<V> {
        self.get_arc(key).map(|v| (*v).clone())
    }

    /// Fetch a shared handle to the value under `key` without copying it.
    pub fn get_arc(&self, key: &str) -> Option<Arc<V>> {
        if let Some(entry) = self.store.get(key) {
            if !entry.is_expired() {
                return Some(Arc::clone(&entry.value));
            }
        }

        // Sweep the expired entry if there was one
        self.store.remove_if(key, |_, e| e.is_expired());
        None
    }

    /// Remove the entry under `key`. Idempotent.
    pub fn del(&self, key: &str) {
        self.store.remove(key);
    }

    /// Currently accounted cost (one unit per admitted entry).
    pub fn cost(&self) -> u64 {
        self.store.len() as u64
    }

    /// Check whether the tier holds no entries.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// The TTL applied when a write does not carry one.
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    fn purge_expired(&self) {
        self.store.retain(|_, entry| !entry.is_expired());
    }
}
