//! Lease-based distributed mutual exclusion.
//!
//! A lock is a remote-store entry holding a randomly generated
//! [`HolderToken`]. It exists while unexpired and not yet released; its only
//! state path is `absent → held(token, expiry) → absent`. Acquisition uses
//! the store's atomic create-if-absent; release uses atomic
//! compare-and-delete so a delayed release can never destroy a lease that
//! expired and was re-acquired by someone else.
//!
//! Contention is a normal outcome (`Ok(None)`), not an error; callers poll,
//! back off, or abandon. The coordinator never takes locks itself - this is
//! a building block for callers guarding a critical section such as a
//! read-modify-write against the backing store.

use crate::error::Result;
use crate::store::RemoteStore;
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// Proof of ownership for one lease.
///
/// Globally unique per acquisition attempt; required to release the lease.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HolderToken(String);

impl HolderToken {
    fn generate() -> Self {
        HolderToken(Uuid::new_v4().to_string())
    }

    /// The token's string form, as stored under the lock key.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for HolderToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Distributed lock over a shared [`RemoteStore`].
///
/// Clones share the store handle; any number of logical lock keys may go
/// through one instance concurrently.
///
/// # Example
///
/// ```
/// use tierkit::lock::DistributedLock;
/// use tierkit::store::InMemoryStore;
/// use std::time::Duration;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> tierkit::Result<()> {
/// let lock = DistributedLock::new(InMemoryStore::new());
///
/// if let Some(token) = lock.acquire("order:42", Duration::from_secs(10)).await? {
///     // ... critical section ...
///     lock.release("order:42", &token).await?;
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct DistributedLock<S: RemoteStore> {
    store: S,
}

impl<S: RemoteStore> DistributedLock<S> {
    /// Create a lock primitive over the given store handle.
    pub fn new(store: S) -> Self {
        DistributedLock { store }
    }

    /// Attempt to take the lease under `key` for `expiration`.
    ///
    /// # Returns
    /// - `Ok(Some(token))` - lease acquired; keep the token for release
    /// - `Ok(None)` - lease already held by someone else (contention)
    ///
    /// # Errors
    /// Returns `Error::RemoteUnavailable` on transport failure only;
    /// contention is not an error.
    pub async fn acquire(&self, key: &str, expiration: Duration) -> Result<Option<HolderToken>> {
        let token = HolderToken::generate();
        let acquired = self
            .store
            .set_if_absent(key, token.as_bytes().to_vec(), expiration)
            .await?;

        if acquired {
            debug!("lock acquired: {} (token {})", key, token);
            Ok(Some(token))
        } else {
            debug!("lock contested: {}", key);
            Ok(None)
        }
    }

    /// Release the lease under `key`, if and only if `token` still owns it.
    ///
    /// The ownership check and the delete execute as one atomic step against
    /// the store. A mismatch - the lease expired and was re-acquired, or was
    /// never held - is a silent no-op, never a deletion of someone else's
    /// lease.
    ///
    /// # Returns
    /// - `Ok(true)` - the lease was held by `token` and is now released
    /// - `Ok(false)` - no-op; the lease was not held by `token`
    ///
    /// # Errors
    /// Returns `Error::RemoteUnavailable` on transport failure only.
    pub async fn release(&self, key: &str, token: &HolderToken) -> Result<bool> {
        let released = self.store.delete_if_equals(key, token.as_bytes()).await?;

        if released {
            debug!("lock released: {} (token {})", key, token);
        } else {
            debug!("lock release no-op: {} (token {})", key, token);
        }
        Ok(released)
    }
}
