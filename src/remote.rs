//! Remote cache tier (L2): typed adapter over a [`RemoteStore`].
//!
//! This is the authoritative, shared tier. It serializes values through a
//! [`Codec`], manages per-key expiration, and maps store failures into
//! [`crate::Error`]. A missing key on a typed read is reported as
//! `Error::RemoteUnavailable`, matching the store's nil-reply semantics;
//! callers that need miss-vs-outage discrimination sit behind the
//! coordinator, which never needs it.

use crate::error::{Error, Result};
use crate::serialization::{CacheValue, Codec, EnvelopeCodec};
use crate::store::RemoteStore;
use std::sync::Arc;
use std::time::Duration;

/// Type-parametric client for the remote tier.
///
/// Cheap to clone; clones share the codec and the store handle.
///
/// # Example
///
/// ```
/// use tierkit::remote::RemoteCache;
/// use tierkit::store::InMemoryStore;
/// use std::time::Duration;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> tierkit::Result<()> {
/// let cache: RemoteCache<u64, _> =
///     RemoteCache::new(InMemoryStore::new(), Duration::from_secs(300));
///
/// cache.set_with_default_ttl("answer", &42).await?;
/// assert_eq!(cache.get("answer").await?, 42);
/// # Ok(())
/// # }
/// ```
pub struct RemoteCache<V, S: RemoteStore> {
    store: S,
    codec: Arc<dyn Codec<V>>,
    default_ttl: Duration,
}

impl<V, S: RemoteStore> Clone for RemoteCache<V, S> {
    fn clone(&self) -> Self {
        RemoteCache {
            store: self.store.clone(),
            codec: Arc::clone(&self.codec),
            default_ttl: self.default_ttl,
        }
    }
}

impl<V: CacheValue, S: RemoteStore> RemoteCache<V, S> {
    /// Create a remote cache with the default postcard envelope codec.
    pub fn new(store: S, default_ttl: Duration) -> Self {
        RemoteCache {
            store,
            codec: Arc::new(EnvelopeCodec),
            default_ttl,
        }
    }

    /// Replace the wire format for this cache.
    pub fn with_codec(mut self, codec: Arc<dyn Codec<V>>) -> Self {
        self.codec = codec;
        self
    }
}

impl<V, S: RemoteStore> RemoteCache<V, S> {
    /// Serialize `value` and store it under `key` with the given expiration.
    ///
    /// # Errors
    /// - `Error::Serialization` if encoding fails
    /// - `Error::RemoteUnavailable` if the store call fails
    pub async fn set_with_ttl(&self, key: &str, value: &V, ttl: Duration) -> Result<()> {
        let bytes = self.codec.encode(value)?;
        self.store.set(key, bytes, ttl).await
    }

    /// Serialize `value` and store it under `key` with the configured
    /// default expiration.
    ///
    /// # Errors
    /// Same as [`Self::set_with_ttl`].
    pub async fn set_with_default_ttl(&self, key: &str, value: &V) -> Result<()> {
        self.set_with_ttl(key, value, self.default_ttl).await
    }

    /// Fetch and decode the value under `key`.
    ///
    /// # Errors
    /// - `Error::RemoteUnavailable` on a missing key or transport failure
    /// - `Error::Deserialization` on decode failure
    pub async fn get(&self, key: &str) -> Result<V> {
        let bytes = self
            .store
            .get(key)
            .await?
            .ok_or_else(|| Error::RemoteUnavailable(format!("key not found: {}", key)))?;
        self.codec.decode(&bytes)
    }

    /// Fetch the value under `key` behind a shared handle.
    ///
    /// Behaviorally identical to [`Self::get`]; exists for callers that pass
    /// the value on without copying it.
    ///
    /// # Errors
    /// Same as [`Self::get`].
    pub async fn get_arc(&self, key: &str) -> Result<Arc<V>> {
        Ok(Arc::new(self.get(key).await?))
    }

    /// Delete the entry under `key`. Deleting an absent key is not an error.
    ///
    /// # Errors
    /// Returns `Error::RemoteUnavailable` on transport failure.
    pub async fn del(&self, key: &str) -> Result<()> {
        self.store.delete(key).await
    }

    /// The TTL applied when a write does not carry one.
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// The underlying store handle.
    pub fn store(&self) -> &S {
        &self.store
    }
}
