//! Cache key construction helpers.
//!
//! The tiers treat keys as opaque strings; these helpers just standardize
//! the usual `"<entity>:<id>"` convention for callers that want it.

/// Builder for cache keys.
pub struct CacheKeyBuilder;

impl CacheKeyBuilder {
    /// Build a cache key from an entity prefix and an ID.
    pub fn build(prefix: &str, id: &dyn std::fmt::Display) -> String {
        format!("{}:{}", prefix, id)
    }

    /// Build composite key from multiple parts.
    pub fn build_composite(parts: &[&str]) -> String {
        parts.join(":")
    }

    /// Parse a composite key into parts.
    pub fn parse(key: &str) -> Vec<&str> {
        key.split(':').collect()
    }
}
