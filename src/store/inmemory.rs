//! In-memory remote-store stand-in (thread-safe, async).
//!
//! Uses DashMap for lock-free concurrent access with per-key sharding and
//! handles TTL expiration on access. The atomic verbs go through DashMap's
//! entry API, which holds the key's shard lock for the whole check-and-write.
//!
//! Meant for tests and single-process development; a real deployment points
//! the same code at [`super::redis::RedisStore`].

use super::RemoteStore;
use crate::error::Result;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Store entry with expiration.
#[derive(Debug)]
struct StoreEntry {
    data: Vec<u8>,
    expires_at: Instant,
}

impl StoreEntry {
    fn new(data: Vec<u8>, ttl: Duration) -> Self {
        StoreEntry {
            data,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() > self.expires_at
    }
}

/// Thread-safe in-memory [`RemoteStore`].
///
/// Clones share the same underlying map, mirroring how Redis handles are
/// cheap copies of one connection pool.
///
/// # Example
///
/// ```
/// use tierkit::store::{InMemoryStore, RemoteStore};
/// use std::time::Duration;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> tierkit::Result<()> {
/// let store = InMemoryStore::new();
/// store.set("key1", b"value".to_vec(), Duration::from_secs(60)).await?;
/// assert!(store.get("key1").await?.is_some());
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemoryStore {
    store: Arc<DashMap<String, StoreEntry>>,
}

impl InMemoryStore {
    /// Create a new in-memory store.
    pub fn new() -> Self {
        InMemoryStore {
            store: Arc::new(DashMap::new()),
        }
    }

    /// Current number of entries, including not-yet-swept expired ones.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

impl RemoteStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        if let Some(entry) = self.store.get(key) {
            if !entry.is_expired() {
                debug!("✓ InMemory GET {} -> HIT", key);
                return Ok(Some(entry.data.clone()));
            }
        }

        // Sweep the expired entry if there was one
        self.store.remove_if(key, |_, e| e.is_expired());
        debug!("✓ InMemory GET {} -> MISS", key);
        Ok(None)
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()> {
        self.store
            .insert(key.to_string(), StoreEntry::new(value, ttl));
        debug!("✓ InMemory SET {} (TTL: {:?})", key, ttl);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.store.remove(key);
        debug!("✓ InMemory DELETE {}", key);
        Ok(())
    }

    async fn set_if_absent(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<bool> {
        match self.store.entry(key.to_string()) {
            Entry::Occupied(mut occupied) if occupied.get().is_expired() => {
                occupied.insert(StoreEntry::new(value, ttl));
                debug!("✓ InMemory SETNX {} -> acquired (expired entry)", key);
                Ok(true)
            }
            Entry::Occupied(_) => {
                debug!("✓ InMemory SETNX {} -> contested", key);
                Ok(false)
            }
            Entry::Vacant(vacant) => {
                vacant.insert(StoreEntry::new(value, ttl));
                debug!("✓ InMemory SETNX {} -> acquired", key);
                Ok(true)
            }
        }
    }

    async fn delete_if_equals(&self, key: &str, value: &[u8]) -> Result<bool> {
        match self.store.entry(key.to_string()) {
            Entry::Occupied(occupied)
                if !occupied.get().is_expired() && occupied.get().data == value =>
            {
                occupied.remove();
                debug!("✓ InMemory CAD {} -> deleted", key);
                Ok(true)
            }
            _ => {
                debug!("✓ InMemory CAD {} -> no-op", key);
                Ok(false)
            }
        }
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get() {
        let store = InMemoryStore::new();

        store
            .set("key1", b"value1".to_vec(), Duration::from_secs(60))
            .await
            .expect("Failed to set");

        let result = store.get("key1").await.expect("Failed to get");
        assert_eq!(result, Some(b"value1".to_vec()));
    }

    #[tokio::test]
    async fn test_get_miss() {
        let store = InMemoryStore::new();

        let result = store.get("nonexistent").await.expect("Failed to get");
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_delete_idempotent() {
        let store = InMemoryStore::new();

        store
            .set("key1", b"value1".to_vec(), Duration::from_secs(60))
            .await
            .expect("Failed to set");

        store.delete("key1").await.expect("Failed to delete");
        assert_eq!(store.get("key1").await.expect("Failed to get"), None);

        // Deleting an absent key is not an error
        store.delete("key1").await.expect("Failed to delete");
    }

    #[tokio::test(start_paused = true)]
    async fn test_ttl_expiration() {
        let store = InMemoryStore::new();

        store
            .set("key1", b"value1".to_vec(), Duration::from_secs(1))
            .await
            .expect("Failed to set");

        assert!(store.get("key1").await.expect("Failed to get").is_some());

        tokio::time::advance(Duration::from_secs(2)).await;

        assert!(store.get("key1").await.expect("Failed to get").is_none());
    }

    #[tokio::test]
    async fn test_set_if_absent_contested() {
        let store = InMemoryStore::new();

        let first = store
            .set_if_absent("lock", b"a".to_vec(), Duration::from_secs(60))
            .await
            .expect("Failed setnx");
        let second = store
            .set_if_absent("lock", b"b".to_vec(), Duration::from_secs(60))
            .await
            .expect("Failed setnx");

        assert!(first);
        assert!(!second);
        // Loser must not have overwritten the winner's value
        assert_eq!(
            store.get("lock").await.expect("Failed to get"),
            Some(b"a".to_vec())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_if_absent_after_expiry() {
        let store = InMemoryStore::new();

        assert!(store
            .set_if_absent("lock", b"a".to_vec(), Duration::from_secs(1))
            .await
            .expect("Failed setnx"));

        tokio::time::advance(Duration::from_secs(2)).await;

        assert!(store
            .set_if_absent("lock", b"b".to_vec(), Duration::from_secs(1))
            .await
            .expect("Failed setnx"));
    }

    #[tokio::test]
    async fn test_delete_if_equals() {
        let store = InMemoryStore::new();

        store
            .set("lock", b"token".to_vec(), Duration::from_secs(60))
            .await
            .expect("Failed to set");

        // Wrong bytes: no-op
        assert!(!store
            .delete_if_equals("lock", b"other")
            .await
            .expect("Failed cad"));
        assert!(store.get("lock").await.expect("Failed to get").is_some());

        // Matching bytes: deleted
        assert!(store
            .delete_if_equals("lock", b"token")
            .await
            .expect("Failed cad"));
        assert!(store.get("lock").await.expect("Failed to get").is_none());

        // Absent key: no-op
        assert!(!store
            .delete_if_equals("lock", b"token")
            .await
            .expect("Failed cad"));
    }

    #[tokio::test]
    async fn test_clone_shares_store() {
        let store1 = InMemoryStore::new();
        store1
            .set("key", b"value".to_vec(), Duration::from_secs(60))
            .await
            .expect("Failed to set");

        let store2 = store1.clone();
        assert_eq!(
            store2.get("key").await.expect("Failed to get"),
            Some(b"value".to_vec())
        );
    }
}
