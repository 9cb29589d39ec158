//! Cache Store Module
//!
//! Main cache engine combining a key index with LRU ordering and TTL expiration.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::cache::list::{Handle, LruList};
use crate::cache::{Entry, DEFAULT_TTL_SECS};
use crate::config::Config;
use crate::error::{CacheError, Result};

// Upper bound on up-front allocation; larger caches grow on demand.
const MAX_PREALLOC: usize = 4096;

// Longest TTL honoured by `add_with_ttl`, keeps `Instant` arithmetic in range.
const MAX_TTL: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

// == TTL LRU Cache ==
/// Fixed-capacity cache with LRU eviction and per-entry expiry.
///
/// Not synchronized. Wrap it in [`LockedCache`](crate::cache::LockedCache)
/// to share it between threads.
///
/// Expired entries are reclaimed lazily: a [`get`](Self::get) that finds an
/// expired entry removes it, and capacity eviction may drop one. Until then
/// they still count towards [`len`](Self::len).
#[derive(Debug)]
pub struct TtlLruCache<K, V> {
    /// Key to list handle
    index: HashMap<K, Handle>,
    /// Entries ordered most recently used first
    lru: LruList<Entry<K, V>>,
    /// Maximum number of entries allowed
    capacity: usize,
    /// TTL used by `add_default`
    default_ttl: Duration,
}

impl<K, V> TtlLruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    // == Constructor ==
    /// Creates a new cache holding at most `capacity` entries.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries the cache can hold
    ///
    /// # Errors
    /// Returns [`CacheError::InvalidCapacity`] if `capacity` is zero.
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_default_ttl(capacity, Duration::from_secs(DEFAULT_TTL_SECS))
    }

    /// Creates a new cache from configuration.
    ///
    /// Uses `capacity` and `default_ttl` from the Config.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_default_ttl(config.capacity, config.default_ttl())
    }

    /// Creates a new cache with an explicit default TTL for `add_default`.
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries the cache can hold
    /// * `default_ttl` - Lifetime given to entries stored with `add_default`
    ///
    /// # Errors
    /// Returns [`CacheError::InvalidCapacity`] if `capacity` is zero.
    pub fn with_default_ttl(capacity: usize, default_ttl: Duration) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::InvalidCapacity(capacity));
        }
        let prealloc = capacity.min(MAX_PREALLOC);
        Ok(Self {
            index: HashMap::with_capacity(prealloc),
            lru: LruList::with_capacity(prealloc),
            capacity,
            default_ttl,
        })
    }

    // == Add ==
    /// Stores a value that expires at `expires_at`.
    ///
    /// An existing key has its value and expiry overwritten and becomes the
    /// most recently used entry; the length does not change. A new key is
    /// inserted as most recently used. When the cache is full the least
    /// recently used entry is evicted first, whether or not it has expired.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    /// * `expires_at` - Instant from which the entry reads as absent
    pub fn add(&mut self, key: K, value: V, expires_at: Instant) {
        if let Some(&handle) = self.index.get(&key) {
            if let Some(entry) = self.lru.get_mut(handle) {
                entry.value = value;
                entry.expires_at = expires_at;
            }
            self.lru.touch(handle);
            return;
        }

        // Evicting before linking leaves the same survivors as linking first,
        // and keeps the slab at `capacity` slots.
        if self.lru.len() >= self.capacity {
            if let Some(evicted) = self.lru.evict_oldest() {
                self.index.remove(&evicted.key);
                debug!(capacity = self.capacity, "evicted least recently used entry");
            }
        }

        let handle = self
            .lru
            .push_front(Entry::new(key.clone(), value, expires_at));
        self.index.insert(key, handle);
    }

    /// Stores a value that expires `ttl` from now.
    ///
    /// TTLs longer than a century are clamped to one.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store
    /// * `ttl` - Lifetime measured from this call
    pub fn add_with_ttl(&mut self, key: K, value: V, ttl: Duration) {
        let now = Instant::now();
        let expires_at = now.checked_add(ttl.min(MAX_TTL)).unwrap_or(now);
        self.add(key, value, expires_at);
    }

    /// Stores a value using the cache's default TTL.
    pub fn add_default(&mut self, key: K, value: V) {
        self.add_with_ttl(key, value, self.default_ttl);
    }

    // == Get ==
    /// Retrieves a value by key.
    ///
    /// A live entry is promoted to most recently used. An expired entry is
    /// removed and reported as absent.
    ///
    /// # Arguments
    /// * `key` - The key to look up, in any borrowed form of `K`
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_at(key, Instant::now())
    }

    fn get_at<Q>(&mut self, key: &Q, now: Instant) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let handle = *self.index.get(key)?;

        let live = self
            .lru
            .get(handle)
            .is_some_and(|entry| !entry.is_expired_at(now));
        if !live {
            self.index.remove(key);
            self.lru.remove(handle);
            trace!("dropped expired entry on read");
            return None;
        }

        self.lru.touch(handle);
        self.lru.get(handle).map(|entry| &entry.value)
    }

    // == Remove ==
    /// Removes an entry by key, returning its value if it was present.
    ///
    /// Removing an absent key is a no-op.
    ///
    /// # Arguments
    /// * `key` - The key to remove
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let handle = self.index.remove(key)?;
        self.lru.remove(handle).map(|entry| entry.value)
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        self.index.clear();
        self.lru.clear();
    }

    // == Length ==
    /// Returns the current number of entries, expired ones included.
    pub fn len(&self) -> usize {
        self.lru.len()
    }

    // == Is Empty ==
    /// True when no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.lru.is_empty()
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// TTL applied by `add_default`.
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Keys from most to least recently used. Does not promote anything.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.lru.iter().map(|entry| &entry.key)
    }
}
