//! # tierkit
//!
//! Two-tier caching with write-through consistency, plus lease-based
//! distributed locks, for Rust services backed by a shared remote store.
//!
//! ## Features
//!
//! - **Fully Generic:** Cache any serde-serializable value type
//! - **Two Tiers:** Bounded in-process accelerator (L1) over a shared remote
//!   store (L2); the remote tier is always the source of truth
//! - **Defined Failure Policy:** Remote failures propagate, local failures
//!   never do; remote is always mutated before local
//! - **Distributed Locks:** Atomic acquire (create-if-absent) and
//!   ownership-checked release (compare-and-delete) over the same store
//! - **Pluggable Wire Format:** Versioned postcard envelopes by default,
//!   JSON available, custom codecs via a trait
//!
//! ## Quick Start
//!
//! ```ignore
//! use tierkit::{CacheFactory, LocalCacheConfig};
//! use tierkit::store::{RedisConfig, RedisStore};
//! use std::time::Duration;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Clone, Serialize, Deserialize)]
//! struct User {
//!     id: String,
//!     name: String,
//! }
//!
//! // One factory per deployment: shared Redis pool, shared tuning
//! let store = RedisStore::new(RedisConfig::default())?;
//! let factory = CacheFactory::new(
//!     store,
//!     LocalCacheConfig::default(),
//!     Duration::from_secs(300),
//! )?;
//!
//! // One coordinator per cached type; wrap in Arc to share across tasks
//! let users = factory.cache::<User>()?;
//! users.set_with_default_ttl("user:1", user).await?;
//! let user = users.get("user:1").await?;
//!
//! // Locks share the factory's store handle
//! let lock = factory.lock();
//! if let Some(token) = lock.acquire("user:1:rebuild", Duration::from_secs(10)).await? {
//!     // critical section
//!     lock.release("user:1:rebuild", &token).await?;
//! }
//! ```

#[macro_use]
extern crate log;

pub mod error;
pub mod factory;
pub mod key;
pub mod local;
pub mod lock;
pub mod metrics;
pub mod multilevel;
pub mod remote;
pub mod serialization;
pub mod store;

// Re-exports for convenience
pub use error::{Error, Result};
pub use factory::CacheFactory;
pub use key::CacheKeyBuilder;
pub use local::{LocalCache, LocalCacheConfig};
pub use lock::{DistributedLock, HolderToken};
pub use metrics::CacheMetrics;
pub use multilevel::MultiLevelCache;
pub use remote::RemoteCache;
pub use serialization::{CacheValue, Codec};
pub use store::RemoteStore;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
