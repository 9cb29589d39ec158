//! inmem_cache - A fixed-capacity in-process cache
//!
//! Combines LRU eviction with per-entry TTL expiration. [`TtlLruCache`] is the
//! unsynchronized core; [`LockedCache`] serializes it behind one lock for
//! multi-threaded use. Both implement [`Cache`].

pub mod cache;
pub mod config;
pub mod error;
pub mod workload;

pub use cache::{Cache, LockedCache, TtlLruCache};
pub use config::Config;
pub use error::{CacheError, Result};
