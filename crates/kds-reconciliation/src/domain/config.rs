//! Reconciliation configuration and validation
//!
//! # Example
//!
//! ```ignore
//! use kds_reconciliation::domain::ReconcileConfig;
//! use shared_types::ScreenId;
//!
//! let config = ReconcileConfig::default()
//!     .with_screen(ScreenId(3))
//!     .with_debounce_ms(250);
//! config.validate()?;
//! ```

use crate::error::ReconcileError;
use serde::{Deserialize, Serialize};
use shared_types::ScreenId;
use std::time::Duration;

/// Upper bound for the debounce window.
pub const MAX_DEBOUNCE_MS: u64 = 60_000;

/// Configuration of one kitchen screen's reconciliation engine
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileConfig {
    /// Screen whose snapshot is pulled on reload
    pub screen_id: ScreenId,
    /// Delay after the most recent status event before the queue is applied
    pub debounce_ms: u64,
    /// Order age (minutes) from which it is shown as a warning
    pub warning_after_mins: u64,
    /// Order age (minutes) from which it is shown as urgent
    pub urgent_after_mins: u64,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            screen_id: ScreenId(1),
            debounce_ms: 300,
            warning_after_mins: 5,
            urgent_after_mins: 15,
        }
    }
}

impl ReconcileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ReconcileError> {
        if self.debounce_ms == 0 || self.debounce_ms > MAX_DEBOUNCE_MS {
            return Err(ReconcileError::InvalidConfig(format!(
                "debounce_ms must be between 1 and {MAX_DEBOUNCE_MS}, got {}",
                self.debounce_ms
            )));
        }

        if self.warning_after_mins >= self.urgent_after_mins {
            return Err(ReconcileError::InvalidConfig(format!(
                "warning_after_mins ({}) must be below urgent_after_mins ({})",
                self.warning_after_mins, self.urgent_after_mins
            )));
        }

        Ok(())
    }

    /// Debounce window as a `Duration`
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Builder-style method to set the screen
    pub fn with_screen(mut self, screen_id: ScreenId) -> Self {
        self.screen_id = screen_id;
        self
    }

    /// Builder-style method to set the debounce window
    pub fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    /// Builder-style method to set the urgency thresholds
    pub fn with_urgency_minutes(mut self, warning_after: u64, urgent_after: u64) -> Self {
        self.warning_after_mins = warning_after;
        self.urgent_after_mins = urgent_after;
        self
    }
}
