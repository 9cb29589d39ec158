//! Integration Tests for the public cache API
//!
//! Tests both variants through the crate's public surface, including a
//! multi-threaded stress run over the locked cache.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use inmem_cache::workload::{run_locked, run_single};
use inmem_cache::{Cache, CacheError, Config, LockedCache, TtlLruCache};

// == Helper Functions ==

fn hour_from_now() -> Instant {
    Instant::now() + Duration::from_secs(3600)
}

fn unlocked(capacity: usize) -> TtlLruCache<i32, i32> {
    TtlLruCache::new(capacity).unwrap()
}

fn locked(capacity: usize) -> LockedCache<i32, i32> {
    LockedCache::new(capacity).unwrap()
}

// == Shared Contract ==

fn check_many_things<C: Cache<i32, i32>>(mut cache: C) {
    let (k, v1, v2) = (1, 2, 3);

    assert_eq!(cache.len(), 0);
    assert_eq!(cache.get(&k), None);

    cache.add(k, v1, hour_from_now());
    assert_eq!(cache.get(&k), Some(v1));
    assert_eq!(cache.len(), 1);

    cache.add(k, v2, hour_from_now());
    assert_eq!(cache.get(&k), Some(v2));
    assert_eq!(cache.len(), 1);

    cache.remove(&k);
    assert_eq!(cache.get(&k), None);
    assert_eq!(cache.len(), 0);
}

#[test]
fn test_many_things_unlocked() {
    check_many_things(unlocked(10));
}

#[test]
fn test_many_things_locked() {
    check_many_things(locked(10));
}

// == Construction ==

#[test]
fn test_zero_capacity_unlocked() {
    let err = TtlLruCache::<i32, i32>::new(0).unwrap_err();
    assert_eq!(err, CacheError::InvalidCapacity(0));
}

#[test]
fn test_zero_capacity_locked() {
    let err = LockedCache::<i32, i32>::new(0).unwrap_err();
    assert_eq!(err, CacheError::InvalidCapacity(0));
}

#[test]
fn test_zero_capacity_from_config() {
    let config = Config {
        capacity: 0,
        ..Config::default()
    };
    assert!(TtlLruCache::<i32, i32>::from_config(&config).is_err());
    assert!(LockedCache::<i32, i32>::from_config(&config).is_err());
}

// == Capacity and Recency ==

#[test]
fn test_cache_size() {
    let mut cache = unlocked(2);
    let e = hour_from_now();

    cache.add(1, 1, e);
    cache.add(2, 2, e);
    cache.add(3, 3, e);

    assert_eq!(cache.len(), 2);
    assert_eq!(cache.get(&1), None);
}

#[test]
fn test_promotion_on_access() {
    let mut cache = unlocked(2);
    let e = hour_from_now();

    cache.add(1, 1, e);
    cache.add(2, 2, e);
    assert_eq!(cache.get(&1), Some(&1));
    cache.add(3, 3, e);

    assert_eq!(cache.get(&2), None);
    assert_eq!(cache.get(&1), Some(&1));
    assert_eq!(cache.get(&3), Some(&3));
}

#[test]
fn test_remove_absent_is_noop() {
    let cache = locked(4);
    cache.add(1, 1, hour_from_now());

    assert_eq!(cache.remove(&42), None);
    assert_eq!(cache.len(), 1);
}

// == Expiry ==

#[test]
fn test_ttl_expired() {
    let mut cache = unlocked(2);

    cache.add(1, 1, Instant::now());
    assert_eq!(cache.len(), 1);

    assert_eq!(cache.get(&1), None);
    assert_eq!(cache.len(), 0);
}

#[test]
fn test_ttl_elapses() {
    let cache = locked(2);

    cache.add_with_ttl(1, 1, Duration::from_secs(2));
    assert_eq!(cache.get(&1), Some(1));

    thread::sleep(Duration::from_millis(2_100));

    assert_eq!(cache.get(&1), None);
    assert!(cache.is_empty());
}

// == Concurrency ==

#[test]
fn test_concurrent_len_never_exceeds_capacity() {
    const CAPACITY: usize = 32;
    const WORKERS: i32 = 8;

    let cache = Arc::new(locked(CAPACITY));
    let done = Arc::new(AtomicBool::new(false));

    // Watches the invariant while the writers run
    let watcher = {
        let cache = Arc::clone(&cache);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            let mut observations = 0u64;
            while !done.load(Ordering::Acquire) {
                assert!(cache.len() <= CAPACITY);
                observations += 1;
            }
            observations
        })
    };

    let writers: Vec<_> = (0..WORKERS)
        .map(|w| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..5_000 {
                    let key = (w * 5_000 + i) % 97;
                    match i % 4 {
                        0 | 1 => cache.add(key, i, hour_from_now()),
                        2 => {
                            cache.get(&key);
                        }
                        _ => {
                            cache.remove(&key);
                        }
                    }
                    assert!(cache.len() <= CAPACITY);
                }
            })
        })
        .collect();

    for writer in writers {
        writer.join().unwrap();
    }
    done.store(true, Ordering::Release);
    let observations = watcher.join().unwrap();

    assert!(observations > 0);
    assert!(cache.len() <= CAPACITY);
}

// == Workload ==

#[test]
fn test_workload_unlocked_is_clean() {
    let mut cache: TtlLruCache<String, String> = TtlLruCache::new(10).unwrap();

    let report = run_single(&mut cache, 10, 1_000);

    assert!(report.is_clean(), "{:?}", report.first_failure);
    assert_eq!(report.early_evictions, 0);
}

#[test]
fn test_workload_locked_is_clean() {
    let cache: LockedCache<String, String> = LockedCache::new(1_000).unwrap();

    let report = run_locked(&cache, 4, 1_000);

    assert!(report.is_clean(), "{:?}", report.first_failure);
    assert_eq!(report.final_len, cache.len());
    assert!(report.final_len <= 1_000);
}
