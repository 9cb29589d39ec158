//! Cache Module
//!
//! Provides in-memory caching with TTL expiration and LRU eviction.

mod entry;
mod list;
mod locked;
mod store;


use std::hash::Hash;
use std::time::Instant;

// Re-export public types
pub use entry::Entry;
pub use list::{Handle, Iter, LruList};
pub use locked::LockedCache;
pub use store::TtlLruCache;

// == Public Constants ==
/// Default TTL in seconds for `add_default` when none is configured
pub const DEFAULT_TTL_SECS: u64 = 300;

// == Cache Trait ==
/// The operations shared by every cache variant.
///
/// Lets callers pick [`TtlLruCache`] or [`LockedCache`] without changing the
/// code that uses it. Values come back cloned so both variants can satisfy
/// the same signature.
pub trait Cache<K, V> {
    /// Inserts or replaces an entry expiring at `expires_at`.
    fn add(&mut self, key: K, value: V, expires_at: Instant);

    /// Returns the value for `key` unless it is absent or expired.
    fn get(&mut self, key: &K) -> Option<V>;

    /// Deletes the entry for `key` if present.
    fn remove(&mut self, key: &K);

    /// Number of stored entries, expired ones included.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, V> Cache<K, V> for TtlLruCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    fn add(&mut self, key: K, value: V, expires_at: Instant) {
        TtlLruCache::add(self, key, value, expires_at);
    }

    fn get(&mut self, key: &K) -> Option<V> {
        TtlLruCache::get(self, key).cloned()
    }

    fn remove(&mut self, key: &K) {
        TtlLruCache::remove(self, key);
    }

    fn len(&self) -> usize {
        TtlLruCache::len(self)
    }
}

impl<K, V> Cache<K, V> for LockedCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    fn add(&mut self, key: K, value: V, expires_at: Instant) {
        LockedCache::add(self, key, value, expires_at);
    }

    fn get(&mut self, key: &K) -> Option<V> {
        LockedCache::get(self, key)
    }

    fn remove(&mut self, key: &K) {
        LockedCache::remove(self, key);
    }

    fn len(&self) -> usize {
        LockedCache::len(self)
    }
}

// Lets threads sharing a `&LockedCache` drive it through the trait.
impl<K, V> Cache<K, V> for &LockedCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    fn add(&mut self, key: K, value: V, expires_at: Instant) {
        LockedCache::add(*self, key, value, expires_at);
    }

    fn get(&mut self, key: &K) -> Option<V> {
        LockedCache::get(*self, key)
    }

    fn remove(&mut self, key: &K) {
        LockedCache::remove(*self, key);
    }

    fn len(&self) -> usize {
        LockedCache::len(*self)
    }
}
