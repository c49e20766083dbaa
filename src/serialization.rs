//! Cache serialization: pluggable codecs with a postcard envelope default.
//!
//! The remote tier stores opaque bytes; a [`Codec`] turns typed values into
//! those bytes and back. The codec is supplied at construction time (see
//! [`crate::remote::RemoteCache::with_codec`]), so the wire format is a
//! per-cache decision rather than a hard-coded one.
//!
//! The default is [`EnvelopeCodec`]: postcard payloads wrapped in a versioned
//! envelope for schema evolution safety.
//!
//! # Envelope format
//!
//! ```text
//! ┌─────────────────┬─────────────────┬──────────────────────────┐
//! │  MAGIC (4 bytes)│VERSION (4 bytes)│POSTCARD PAYLOAD (N bytes)│
//! └─────────────────┴─────────────────┴──────────────────────────┘
//!   "TIER"              u32 (LE)          postcard::to_allocvec(T)
//! ```
//!
//! # Example
//!
//! ```rust
//! use tierkit::serialization::{serialize_for_cache, deserialize_from_cache};
//! use serde::{Serialize, Deserialize};
//!
//! #[derive(Serialize, Deserialize, PartialEq, Debug)]
//! struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! # fn main() -> tierkit::Result<()> {
//! let user = User { id: 1, name: "Alice".to_string() };
//!
//! let bytes = serialize_for_cache(&user)?;
//! let decoded: User = deserialize_from_cache(&bytes)?;
//! assert_eq!(user, decoded);
//! # Ok(())
//! # }
//! ```

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Magic header for tierkit entries: b"TIER"
///
/// This 4-byte signature identifies valid tierkit cache entries. Any entry
/// without this magic is rejected during deserialization.
pub const CACHE_MAGIC: [u8; 4] = *b"TIER";

/// Current schema version.
///
/// Increment when making breaking changes to cached types (adding/removing
/// fields, changing field types, reordering fields). Entries written by a
/// different version are rejected on read and recomputed from the source of
/// truth instead of being silently misread.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// A value type that can live in the cache.
///
/// Blanket-implemented for anything serde-serializable, cloneable and
/// thread-safe; callers never implement this by hand.
pub trait CacheValue: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {}

impl<T> CacheValue for T where T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {}

/// Encode/decode strategy for one cached value type.
///
/// Implementations must be lossless: `decode(encode(v)) == v` for every `v`.
pub trait Codec<V>: Send + Sync {
    /// Serialize a value for storage in the remote tier.
    ///
    /// # Errors
    /// Returns `Error::Serialization` if encoding fails.
    fn encode(&self, value: &V) -> Result<Vec<u8>>;

    /// Deserialize a value read back from the remote tier.
    ///
    /// # Errors
    /// Returns `Error::Deserialization` if the payload is corrupt, was
    /// written with a different schema version, or is not a tierkit entry.
    fn decode(&self, bytes: &[u8]) -> Result<V>;
}

/// Versioned envelope wrapped around every default-codec entry.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CacheEnvelope<T> {
    /// Magic header: must be b"TIER"
    pub magic: [u8; 4],
    /// Schema version: must match CURRENT_SCHEMA_VERSION
    pub version: u32,
    /// The actual cached data
    pub payload: T,
}

impl<T> CacheEnvelope<T> {
    /// Create a new envelope with current magic and version.
    pub fn new(payload: T) -> Self {
        Self {
            magic: CACHE_MAGIC,
            version: CURRENT_SCHEMA_VERSION,
            payload,
        }
    }
}

/// Serialize a value with envelope for cache storage.
///
/// # Errors
///
/// Returns `Error::Serialization` if postcard serialization fails.
pub fn serialize_for_cache<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    let envelope = CacheEnvelope::new(value);
    postcard::to_allocvec(&envelope).map_err(|e| {
        log::error!("Cache serialization failed: {}", e);
        Error::Serialization(e.to_string())
    })
}

/// Deserialize a value from cache storage with validation.
///
/// Checks the magic header and schema version before handing back the
/// payload; anything that fails validation is treated as a corrupt entry.
///
/// # Errors
///
/// Returns `Error::Deserialization` on a corrupt payload, an invalid magic
/// header, or a schema version mismatch.
pub fn deserialize_from_cache<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let envelope: CacheEnvelope<T> = postcard::from_bytes(bytes).map_err(|e| {
        log::error!("Cache deserialization failed: {}", e);
        Error::Deserialization(e.to_string())
    })?;

    if envelope.magic != CACHE_MAGIC {
        log::warn!(
            "Invalid cache entry: expected magic {:?}, got {:?}",
            CACHE_MAGIC,
            envelope.magic
        );
        return Err(Error::Deserialization(format!(
            "invalid magic: expected {:?}, got {:?}",
            CACHE_MAGIC, envelope.magic
        )));
    }

    if envelope.version != CURRENT_SCHEMA_VERSION {
        log::warn!(
            "Cache version mismatch: expected {}, got {}",
            CURRENT_SCHEMA_VERSION,
            envelope.version
        );
        return Err(Error::Deserialization(format!(
            "schema version mismatch: expected {}, found {}",
            CURRENT_SCHEMA_VERSION, envelope.version
        )));
    }

    Ok(envelope.payload)
}

/// Default codec: postcard payloads in a versioned envelope.
#[derive(Clone, Copy, Debug, Default)]
pub struct EnvelopeCodec;

impl<V: CacheValue> Codec<V> for EnvelopeCodec {
    fn encode(&self, value: &V) -> Result<Vec<u8>> {
        serialize_for_cache(value)
    }

    fn decode(&self, bytes: &[u8]) -> Result<V> {
        deserialize_from_cache(bytes)
    }
}

/// JSON codec, for deployments that want human-readable entries in the
/// remote store. Larger and slower than [`EnvelopeCodec`], but greppable.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonCodec;

impl<V: CacheValue> Codec<V> for JsonCodec {
    fn encode(&self, value: &V) -> Result<Vec<u8>> {
        serde_json::to_vec(value).map_err(|e| Error::Serialization(e.to_string()))
    }

    fn decode(&self, bytes: &[u8]) -> Result<V> {
        serde_json::from_slice(bytes).map_err(|e| Error::Deserialization(e.to_string()))
    }
}
