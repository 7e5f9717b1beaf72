//! # Boundary Payloads
//!
//! Shapes exchanged with the write boundary of the POS backend.
//!
//! ## Design Rules
//!
//! - A status change names its target kind through the enum variant, so an
//!   order status can never be written to a line and vice versa.
//! - The backend acknowledges a write with `WriteAck`; a rejected write is
//!   not a transport error.

use crate::entities::{LineId, LineStatus, OrderId, OrderStatus};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of record a status update targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTarget {
    /// A whole order.
    Order,
    /// A single order line.
    Line,
}

impl fmt::Display for StatusTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Order => f.write_str("order"),
            Self::Line => f.write_str("line"),
        }
    }
}

/// A requested status transition for one order or line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StatusChange {
    /// Change the status of an order.
    Order {
        /// Target order.
        id: OrderId,
        /// Requested status.
        status: OrderStatus,
    },
    /// Change the status of an order line.
    Line {
        /// Target line.
        id: LineId,
        /// Requested status.
        status: LineStatus,
    },
}

impl StatusChange {
    /// Order status change.
    pub fn order(id: OrderId, status: OrderStatus) -> Self {
        Self::Order { id, status }
    }

    /// Line status change.
    pub fn line(id: LineId, status: LineStatus) -> Self {
        Self::Line { id, status }
    }

    /// Target kind.
    pub fn target(&self) -> StatusTarget {
        match self {
            Self::Order { .. } => StatusTarget::Order,
            Self::Line { .. } => StatusTarget::Line,
        }
    }

    /// Numeric id of the target, for logging.
    pub fn raw_id(&self) -> u64 {
        match self {
            Self::Order { id, .. } => id.0,
            Self::Line { id, .. } => id.0,
        }
    }

    /// Requested status, for logging.
    pub fn status_str(&self) -> &str {
        match self {
            Self::Order { status, .. } => status.as_str(),
            Self::Line { status, .. } => status.as_str(),
        }
    }
}

/// Acknowledgement returned by the write boundary.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WriteAck {
    /// Whether the backend accepted the write.
    pub success: bool,
    /// Backend-provided reason when rejected.
    #[serde(default)]
    pub error: Option<String>,
}

impl WriteAck {
    /// Accepted write.
    pub fn accepted() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    /// Rejected write with a reason.
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(reason.into()),
        }
    }
}
