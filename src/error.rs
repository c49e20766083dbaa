//! Error types for the caching and locking layer.

use std::fmt;

/// Result type for cache and lock operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the caching and locking layer.
///
/// All fallible operations return `Result<T>` where `Result` is defined as
/// `std::result::Result<T, Error>`. Soft outcomes are deliberately *not*
/// errors: local-tier admission rejection is a `bool`, lock contention is
/// `Ok(None)`, and a lock release against a foreign token is `Ok(false)`.
#[derive(Debug, Clone)]
pub enum Error {
    /// Serialization failed when converting a value to cache bytes.
    ///
    /// This occurs when the value's `Serde` implementation fails.
    /// Common causes:
    /// - Value contains non-serializable types
    /// - Postcard/JSON codec error
    Serialization(String),

    /// Deserialization failed when converting cache bytes to a value.
    ///
    /// This indicates corrupted or malformed data in the remote tier.
    /// Common causes:
    /// - Entry was written by a different schema version
    /// - Invalid envelope (bad magic header)
    /// - Incomplete data read from the store
    ///
    /// **Recovery:** Delete the entry and recompute from the source of truth.
    Deserialization(String),

    /// The remote tier is unreachable or rejected the operation, or a typed
    /// `get` found no entry under the key.
    ///
    /// Common causes:
    /// - Connection pool exhausted or connection lost
    /// - Network timeout
    /// - Server-side error
    /// - Key absent (typed reads treat not-found as a remote-tier failure,
    ///   matching the store's nil-reply semantics)
    ///
    /// **Recovery:** Retry, or fall back to the backing store. No retries are
    /// performed internally; each call is a single attempt.
    RemoteUnavailable(String),

    /// Invalid construction parameters.
    ///
    /// Returned by constructors instead of aborting the process, so the
    /// embedding application decides whether to bail out.
    /// Common causes:
    /// - Zero admission budget or capacity estimate
    /// - Shard width that is not a power of two
    /// - Malformed connection string
    Config(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            Error::Deserialization(msg) => write!(f, "Deserialization error: {}", msg),
            Error::RemoteUnavailable(msg) => write!(f, "Remote tier unavailable: {}", msg),
            Error::Config(msg) => write!(f, "Config error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ============================================================================
// Conversions from other error types
// ============================================================================

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            Error::RemoteUnavailable(e.to_string())
        } else if e.is_syntax() || e.is_data() || e.is_eof() {
            Error::Deserialization(e.to_string())
        } else {
            Error::Serialization(e.to_string())
        }
    }
}

#[cfg(feature = "redis")]
impl From<redis::RedisError> for Error {
    fn from(e: redis::RedisError) -> Self {
        Error::RemoteUnavailable(format!("Redis error: {}", e))
    }
}
