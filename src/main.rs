//! inmem_cache - workload driver
//!
//! Builds a locked cache from the environment, hammers it from several
//! threads with the check-as-you-go workload and prints a JSON report.

use anyhow::{bail, Context};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use inmem_cache::{workload, Config, LockedCache};

/// Main entry point for the workload driver.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the locked cache with configured parameters
/// 4. Run the workload on the configured number of threads
/// 5. Print the report, failing the process on any violation
fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "inmem_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting inmem_cache workload");

    let config = Config::from_env();
    info!(
        "Configuration loaded: capacity={}, default_ttl={}s, workers={}, iterations={}",
        config.capacity, config.default_ttl, config.workers, config.iterations
    );

    let cache: LockedCache<String, String> =
        LockedCache::from_config(&config).context("failed to build cache")?;

    let report = workload::run_locked(&cache, config.workers, config.iterations);

    let json = serde_json::to_string_pretty(&report).context("failed to encode report")?;
    println!("{json}");

    if !report.is_clean() {
        warn!(failures = report.failures, "workload observed violations");
        bail!(
            "workload observed {} contract violations, first: {}",
            report.failures,
            report.first_failure.unwrap_or_default()
        );
    }

    info!("Workload complete");
    Ok(())
}
