//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::Instant;

// == Cache Entry ==
/// Represents a single cache entry with its key, value and expiry.
///
/// The key is kept alongside the value so an entry evicted from the back of
/// the recency list can be unlinked from the index.
#[derive(Debug, Clone)]
pub struct Entry<K, V> {
    /// The key this entry is indexed under
    pub key: K,
    /// The stored value
    pub value: V,
    /// Absolute expiration instant
    pub expires_at: Instant,
}

impl<K, V> Entry<K, V> {
    // == Constructor ==
    /// Creates a new entry expiring at `expires_at`.
    pub fn new(key: K, value: V, expires_at: Instant) -> Self {
        Self {
            key,
            value,
            expires_at,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired as of `now`.
    ///
    /// Boundary condition: an entry is valid only while `now` is strictly
    /// earlier than `expires_at`, so it is already expired at `expires_at`.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}
