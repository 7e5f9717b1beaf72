//! Runtime configuration
//!
//! Defaults overridden by environment variables:
//!
//! | Variable | Field |
//! |----------|-------|
//! | `KDS_SCREEN_ID` | `reconcile.screen_id` |
//! | `KDS_DEBOUNCE_MS` | `reconcile.debounce_ms` |
//! | `KDS_BUS_CAPACITY` | `bus_capacity` |
//! | `KDS_LOG_LEVEL` | `log_level` |
//! | `KDS_DEMO_SEED` | `demo_seed` |

use kds_reconciliation::{ReconcileConfig, ReconcileError};
use serde::{Deserialize, Serialize};
use shared_bus::DEFAULT_CHANNEL_CAPACITY;
use shared_types::ScreenId;
use std::str::FromStr;
use tracing::{info, warn, Level};

/// Configuration of the kitchen screen runtime
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Engine settings
    pub reconcile: ReconcileConfig,
    /// Events buffered per bus subscriber before it lags
    pub bus_capacity: usize,
    /// `trace`, `debug`, `info`, `warn` or `error`
    pub log_level: String,
    /// Populate the in-memory backend with a demo screen and orders
    pub demo_seed: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            reconcile: ReconcileConfig::default(),
            bus_capacity: DEFAULT_CHANNEL_CAPACITY,
            log_level: "info".to_string(),
            demo_seed: true,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, ignoring unparsable values
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(screen_id) = parse_var::<u64>(&lookup, "KDS_SCREEN_ID") {
            config.reconcile.screen_id = ScreenId(screen_id);
        }
        if let Some(debounce_ms) = parse_var(&lookup, "KDS_DEBOUNCE_MS") {
            config.reconcile.debounce_ms = debounce_ms;
        }
        if let Some(capacity) = parse_var(&lookup, "KDS_BUS_CAPACITY") {
            config.bus_capacity = capacity;
        }
        if let Some(level) = lookup("KDS_LOG_LEVEL") {
            if Level::from_str(&level).is_ok() {
                config.log_level = level.to_lowercase();
            } else {
                warn!(value = %level, "KDS_LOG_LEVEL is not a log level, keeping default");
            }
        }
        if let Some(seed) = parse_var(&lookup, "KDS_DEMO_SEED") {
            config.demo_seed = seed;
        }

        config
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ReconcileError> {
        self.reconcile.validate()?;
        if self.bus_capacity == 0 {
            return Err(ReconcileError::InvalidConfig(
                "bus_capacity must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Log level, `INFO` if unparsable
    pub fn level(&self) -> Level {
        Level::from_str(&self.log_level).unwrap_or(Level::INFO)
    }

    /// Log level from `KDS_LOG_LEVEL` alone
    ///
    /// Read before the log subscriber exists, so that the rest of the
    /// configuration can be loaded with logging in place.
    pub fn level_from_env() -> Level {
        Self::level_from_lookup(|key| std::env::var(key).ok())
    }

    pub fn level_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Level {
        lookup("KDS_LOG_LEVEL")
            .and_then(|level| Level::from_str(&level).ok())
            .unwrap_or(Level::INFO)
    }
}

fn parse_var<T: FromStr>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => {
            info!(key = key, value = %raw, "Loaded setting from environment");
            Some(value)
        }
        Err(_) => {
            warn!(key = key, value = %raw, "Unparsable setting ignored");
            None
        }
    }
}
