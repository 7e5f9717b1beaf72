//! Order age classification used to colour tickets

use serde::{Deserialize, Serialize};
use shared_types::Timestamp;
use std::fmt;

const MINUTE_MS: u64 = 60_000;
const HOUR_MS: u64 = 60 * MINUTE_MS;
const DAY_MS: u64 = 24 * HOUR_MS;

/// How long an order has been waiting, relative to the configured thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Normal,
    Warning,
    Urgent,
}

impl Urgency {
    /// Classify an order created at `created_at`
    ///
    /// Orders without a creation time are `Normal`. A creation time in the
    /// future (clock skew) counts as zero age.
    pub fn classify(
        created_at: Option<Timestamp>,
        now: Timestamp,
        warning_after_mins: u64,
        urgent_after_mins: u64,
    ) -> Self {
        let Some(created_at) = created_at else {
            return Self::Normal;
        };

        let age_mins = now.saturating_sub(created_at) / MINUTE_MS;
        if age_mins >= urgent_after_mins {
            Self::Urgent
        } else if age_mins >= warning_after_mins {
            Self::Warning
        } else {
            Self::Normal
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Warning => "warning",
            Self::Urgent => "urgent",
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse relative age such as `"12 min ago"`, empty without a timestamp
pub fn age_label(created_at: Option<Timestamp>, now: Timestamp) -> String {
    let Some(created_at) = created_at else {
        return String::new();
    };

    let age = now.saturating_sub(created_at);
    if age < MINUTE_MS {
        "just now".to_string()
    } else if age < HOUR_MS {
        format!("{} min ago", age / MINUTE_MS)
    } else if age < DAY_MS {
        format!("{} h ago", age / HOUR_MS)
    } else {
        format!("{} d ago", age / DAY_MS)
    }
}
