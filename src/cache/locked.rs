//! Locked Cache Module
//!
//! Thread-safe wrapper serializing every operation behind one mutex.

use std::borrow::Borrow;
use std::hash::Hash;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::cache::TtlLruCache;
use crate::config::Config;
use crate::error::Result;

// == Locked Cache ==
/// [`TtlLruCache`] behind a single coarse lock.
///
/// Every call takes the lock, delegates to the inner cache and releases it
/// before returning, so operations are linearizable. Reads take the same
/// lock as writes because a hit reorders the recency list.
///
/// Share it between threads through an `Arc`.
#[derive(Debug)]
pub struct LockedCache<K, V> {
    inner: Mutex<TtlLruCache<K, V>>,
}

impl<K, V> LockedCache<K, V>
where
    K: Hash + Eq + Clone,
{
    // == Constructor ==
    /// Creates a new locked cache holding at most `capacity` entries.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries the cache can hold
    ///
    /// # Errors
    /// Returns [`CacheError::InvalidCapacity`](crate::error::CacheError::InvalidCapacity)
    /// if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        TtlLruCache::new(capacity).map(Self::from)
    }

    /// Creates a new locked cache from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        TtlLruCache::from_config(config).map(Self::from)
    }

    /// Stores a value that expires at `expires_at`.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    /// * `expires_at` - Instant from which the entry reads as absent
    pub fn add(&self, key: K, value: V, expires_at: Instant) {
        self.inner.lock().add(key, value, expires_at);
    }

    /// Stores a value that expires `ttl` from now.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    /// * `ttl` - Lifetime measured from this call
    pub fn add_with_ttl(&self, key: K, value: V, ttl: Duration) {
        self.inner.lock().add_with_ttl(key, value, ttl);
    }

    /// Stores a value using the cache's default TTL.
    pub fn add_default(&self, key: K, value: V) {
        self.inner.lock().add_default(key, value);
    }

    /// Retrieves a clone of the value stored under `key`.
    ///
    /// The value is cloned because no reference may outlive the lock. Store
    /// `Arc<V>` to make this cheap for large values.
    ///
    /// # Arguments
    /// * `key` - The key to look up, in any borrowed form of `K`
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.inner.lock().get(key).cloned()
    }

    /// Removes an entry by key, returning its value if it was present.
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.lock().remove(key)
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    /// Returns the current number of entries, expired ones included.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// True when no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    /// Consumes the wrapper and returns the inner cache.
    pub fn into_inner(self) -> TtlLruCache<K, V> {
        self.inner.into_inner()
    }
}

impl<K, V> From<TtlLruCache<K, V>> for LockedCache<K, V> {
    fn from(cache: TtlLruCache<K, V>) -> Self {
        Self {
            inner: Mutex::new(cache),
        }
    }
}
