//! Workload Runner
//!
//! Drives a fixed operation sequence against a cache and checks every answer.
//!
//! Each sequence owns a key no other sequence touches, so any hit after a
//! removal or an expired write, and any wrong value, is a contract violation.
//! A miss right after a fresh write can only happen when other workers
//! evicted the key in between; it is counted, not failed.

use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::cache::{Cache, LockedCache};
use crate::workload::WorkloadReport;

// Cache operations issued by one `run_sequence` call
const OPS_PER_SEQUENCE: u64 = 12;

// == Violation ==
/// A cache answer that contradicts the cache contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// A key that must be absent was found
    #[error("{step}: unexpected hit for key {key}")]
    UnexpectedHit { step: &'static str, key: String },

    /// A key was found holding a value it was never given last
    #[error("{step}: wrong value for key {key}: expected {expected}, got {actual}")]
    WrongValue {
        step: &'static str,
        key: String,
        expected: String,
        actual: String,
    },

    /// The cache held more entries than its capacity
    #[error("cache holds {len} entries, capacity is {capacity}")]
    OverCapacity { len: usize, capacity: usize },
}

/// Result of one clean sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SequenceOutcome {
    /// Operations issued
    pub operations: u64,
    /// Fresh writes that were gone on read-back
    pub early_evictions: u64,
}

// == Sequence ==
/// Runs the miss / add / hit / replace / expire / remove sequence on `key`.
///
/// Leaves `key` stored with a live expiry, as a caller's working set would.
pub fn run_sequence<C>(
    cache: &mut C,
    capacity: usize,
    key: &str,
) -> Result<SequenceOutcome, Violation>
where
    C: Cache<String, String> + ?Sized,
{
    let key = key.to_string();
    let live = Instant::now() + Duration::from_secs(3600);
    let mut outcome = SequenceOutcome {
        operations: OPS_PER_SEQUENCE,
        early_evictions: 0,
    };

    // cache miss
    expect_miss(cache, "initial miss", &key)?;

    // add, then hit
    let first = format!("{key}:first");
    cache.add(key.clone(), first.clone(), live);
    expect_value(cache, "hit after add", &key, &first, &mut outcome)?;

    // replace, then hit the new value
    let second = format!("{key}:second");
    cache.add(key.clone(), second.clone(), live);
    expect_value(cache, "hit after replace", &key, &second, &mut outcome)?;

    // replace with an already expired entry
    let third = format!("{key}:third");
    cache.add(key.clone(), third.clone(), Instant::now());
    expect_miss(cache, "miss after expired replace", &key)?;

    // re-add so it can be removed
    cache.add(key.clone(), third.clone(), live);
    cache.remove(&key);
    expect_miss(cache, "miss after remove", &key)?;

    // re-add the value
    cache.add(key, third, live);

    let len = cache.len();
    if len > capacity {
        return Err(Violation::OverCapacity { len, capacity });
    }
    Ok(outcome)
}

fn expect_miss<C>(cache: &mut C, step: &'static str, key: &String) -> Result<(), Violation>
where
    C: Cache<String, String> + ?Sized,
{
    match cache.get(key) {
        None => Ok(()),
        Some(_) => Err(Violation::UnexpectedHit {
            step,
            key: key.clone(),
        }),
    }
}

fn expect_value<C>(
    cache: &mut C,
    step: &'static str,
    key: &String,
    expected: &str,
    outcome: &mut SequenceOutcome,
) -> Result<(), Violation>
where
    C: Cache<String, String> + ?Sized,
{
    match cache.get(key) {
        Some(actual) if actual == expected => Ok(()),
        Some(actual) => Err(Violation::WrongValue {
            step,
            key: key.clone(),
            expected: expected.to_string(),
            actual,
        }),
        None => {
            outcome.early_evictions += 1;
            Ok(())
        }
    }
}

// == Runners ==
/// Runs `iterations` sequences on one thread.
///
/// Keys are `w{worker}-{i}`; the cache must not already hold any of them.
pub fn run_single<C>(cache: &mut C, capacity: usize, iterations: usize) -> WorkloadReport
where
    C: Cache<String, String> + ?Sized,
{
    let started = Instant::now();
    let mut report = WorkloadReport::new(capacity, 1, iterations);

    run_worker(cache, capacity, 0, iterations, &mut report);

    report.final_len = cache.len();
    report.elapsed_ms = elapsed_ms(started);
    report
}

/// Runs `iterations` sequences on each of `workers` threads sharing `cache`.
///
/// Same key scheme as [`run_single`], one worker index per thread.
pub fn run_locked(
    cache: &LockedCache<String, String>,
    workers: usize,
    iterations: usize,
) -> WorkloadReport {
    let started = Instant::now();
    let capacity = cache.capacity();
    let workers = workers.max(1);

    info!(workers, iterations, capacity, "starting workload");

    let partials: Vec<WorkloadReport> = thread::scope(|scope| {
        let handles: Vec<_> = (0..workers)
            .map(|worker| {
                scope.spawn(move || {
                    let mut partial = WorkloadReport::new(capacity, 1, iterations);
                    let mut shared = cache;
                    run_worker(&mut shared, capacity, worker, iterations, &mut partial);
                    partial
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| match handle.join() {
                Ok(partial) => partial,
                Err(_) => {
                    let mut partial = WorkloadReport::new(capacity, 1, iterations);
                    partial.record_failure("worker panicked".to_string());
                    partial
                }
            })
            .collect()
    });

    let mut report = WorkloadReport::new(capacity, workers, iterations);
    for partial in partials {
        report.absorb(partial);
    }
    report.final_len = cache.len();
    report.elapsed_ms = elapsed_ms(started);

    info!(
        operations = report.operations,
        failures = report.failures,
        elapsed_ms = report.elapsed_ms,
        "workload finished"
    );
    report
}

fn run_worker<C>(
    cache: &mut C,
    capacity: usize,
    worker: usize,
    iterations: usize,
    report: &mut WorkloadReport,
) where
    C: Cache<String, String> + ?Sized,
{
    for i in 0..iterations {
        let key = format!("w{worker}-{i}");
        match run_sequence(cache, capacity, &key) {
            Ok(outcome) => {
                report.operations += outcome.operations;
                report.early_evictions += outcome.early_evictions;
            }
            Err(violation) => {
                warn!(worker, %violation, "workload violation");
                report.operations += OPS_PER_SEQUENCE;
                report.record_failure(violation.to_string());
            }
        }
    }
    debug!(worker, iterations, "worker done");
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
