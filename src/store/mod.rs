//! Remote store implementations.
//!
//! A [`RemoteStore`] is the shared, networked keyspace behind the remote
//! cache tier and the distributed lock. It speaks raw bytes; typed
//! encode/decode lives one layer up in [`crate::remote::RemoteCache`].

use crate::error::Result;
use std::time::Duration;

#[cfg(feature = "inmemory")]
pub mod inmemory;
#[cfg(feature = "redis")]
pub mod redis;

#[cfg(feature = "inmemory")]
pub use inmemory::InMemoryStore;
#[cfg(feature = "redis")]
pub use redis::{PoolStats, RedisConfig, RedisStore};

/// Trait for remote store implementations.
///
/// Covers the plain cache verbs (get/set/delete) plus the two atomic verbs
/// the distributed lock needs: create-if-absent and compare-and-delete. Both
/// atomic verbs must execute as a single step against the store; for Redis
/// that means `SET NX EX` and a server-side Lua script.
///
/// **IMPORTANT:** All methods take `&self` so one handle can be shared by
/// many logical keys and locks concurrently. Implementations use interior
/// mutability or an external service.
///
/// **ASYNC:** All methods are async and must be awaited. No retries are
/// performed internally; every call is a single attempt, and cancelling the
/// returned future aborts the in-flight call.
#[allow(async_fn_in_trait)]
pub trait RemoteStore: Send + Sync + Clone {
    /// Retrieve the bytes stored under `key`.
    ///
    /// # Returns
    /// - `Ok(Some(bytes))` - entry present
    /// - `Ok(None)` - no entry under the key (absent or expired)
    ///
    /// # Errors
    /// Returns `Err` on transport or server-side failure.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store `value` under `key`, expiring after `ttl`.
    ///
    /// TTLs are expressed to the store in whole seconds.
    ///
    /// # Errors
    /// Returns `Err` on transport or server-side failure.
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()>;

    /// Remove the entry under `key`. Deleting an absent key is not an error.
    ///
    /// # Errors
    /// Returns `Err` on transport or server-side failure.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Atomically store `value` under `key` only if no live entry exists.
    ///
    /// # Returns
    /// - `Ok(true)` - the key was absent and is now set
    /// - `Ok(false)` - a live entry already exists; nothing was written
    ///
    /// # Errors
    /// Returns `Err` on transport or server-side failure.
    async fn set_if_absent(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<bool>;

    /// Atomically delete the entry under `key` only if its current bytes
    /// equal `value`. The check and the delete are one step; an entry that
    /// expired and was rewritten by another holder is never deleted.
    ///
    /// # Returns
    /// - `Ok(true)` - the entry matched and was deleted
    /// - `Ok(false)` - no entry, or the bytes did not match; nothing deleted
    ///
    /// # Errors
    /// Returns `Err` on transport or server-side failure.
    async fn delete_if_equals(&self, key: &str, value: &[u8]) -> Result<bool>;

    /// Health check - verify the store is accessible.
    ///
    /// Used for readiness probes.
    ///
    /// # Errors
    /// Returns `Err` if the store is not accessible.
    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }
}
