//! # Kitchen Display Runtime
//!
//! Runs one kitchen screen against the in-memory POS backend.
//!
//! ## Startup Sequence
//!
//! 1. Initialize logging at the level from `KDS_LOG_LEVEL`
//! 2. Load the rest of the configuration from the environment
//! 3. Start the runtime (snapshot + bus adapter)
//! 4. Run until Ctrl+C, then shut down gracefully

use std::time::Duration;

use anyhow::{Context, Result};
use kds_runtime::config::RuntimeConfig;
use kds_runtime::KdsRuntime;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

/// Interval between simulated orders when demo data is enabled
const CASHIER_INTERVAL: Duration = Duration::from_secs(20);

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(RuntimeConfig::level_from_env())
        .with_target(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install log subscriber")?;

    let config = RuntimeConfig::from_env();

    info!(
        config = %serde_json::to_string(&config).unwrap_or_default(),
        "Configuration loaded"
    );

    let runtime = KdsRuntime::new(config)?;
    let adapter = runtime.start().await?;

    let cashier = runtime
        .config()
        .demo_seed
        .then(|| runtime.spawn_cashier(CASHIER_INTERVAL));

    info!("Kitchen screen is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")?;

    runtime.shutdown(adapter).await;
    if let Some(cashier) = cashier {
        cashier.abort();
    }

    Ok(())
}
