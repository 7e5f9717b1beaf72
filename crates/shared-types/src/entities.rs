//! # Core Domain Entities
//!
//! Defines the kitchen entities as they arrive from the POS backend.
//!
//! ## Clusters
//!
//! - **Identity**: `OrderId`, `LineId`, `CategoryId`, `ScreenId`, `ConfigId`
//! - **Orders**: `Order`, `OrderStatus`
//! - **Lines**: `OrderLine`, `LineStatus`
//! - **Screens**: `ScreenInfo`, `BoardSnapshot`

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Timestamp in milliseconds since UNIX epoch.
pub type Timestamp = u64;

// =============================================================================
// CLUSTER A: IDENTITY
// =============================================================================

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }
    };
}

numeric_id!(
    /// Identifier of a POS order.
    OrderId
);
numeric_id!(
    /// Identifier of a single order line.
    LineId
);
numeric_id!(
    /// Identifier of a POS product category.
    CategoryId
);
numeric_id!(
    /// Identifier of a kitchen screen (display partition).
    ScreenId
);
numeric_id!(
    /// Identifier of the POS configuration a screen belongs to.
    ConfigId
);

// =============================================================================
// CLUSTER B: STATUSES
// =============================================================================

/// Kitchen status of an order.
///
/// Values the kitchen does not know are kept in `Other` so they survive a
/// round trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    /// New order, nothing started.
    #[default]
    Draft,
    /// Being prepared.
    Waiting,
    /// Ready to serve.
    Done,
    /// Cancelled.
    Cancel,
    /// Any other backend value.
    Other(String),
}

impl OrderStatus {
    /// Wire representation.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Draft => "draft",
            Self::Waiting => "waiting",
            Self::Done => "done",
            Self::Cancel => "cancel",
            Self::Other(raw) => raw,
        }
    }
}

impl From<&str> for OrderStatus {
    fn from(raw: &str) -> Self {
        match raw {
            "draft" => Self::Draft,
            "waiting" => Self::Waiting,
            "done" => Self::Done,
            "cancel" => Self::Cancel,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for OrderStatus {
    fn from(raw: String) -> Self {
        Self::from(raw.as_str())
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kitchen status of a single order line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LineStatus {
    /// Not started. Also accepts `new` and `pending` on input.
    #[default]
    Draft,
    /// Cooking.
    Waiting,
    /// Plated and ready.
    Ready,
    /// Cancelled.
    Cancel,
    /// Any other backend value.
    Other(String),
}

impl LineStatus {
    /// Wire representation.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Draft => "draft",
            Self::Waiting => "waiting",
            Self::Ready => "ready",
            Self::Cancel => "cancel",
            Self::Other(raw) => raw,
        }
    }
}

impl From<&str> for LineStatus {
    fn from(raw: &str) -> Self {
        match raw {
            "draft" | "new" | "pending" => Self::Draft,
            "waiting" => Self::Waiting,
            "ready" => Self::Ready,
            "cancel" => Self::Cancel,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for LineStatus {
    fn from(raw: String) -> Self {
        Self::from(raw.as_str())
    }
}

impl From<LineStatus> for String {
    fn from(status: LineStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for LineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// CLUSTER C: ORDERS AND LINES
// =============================================================================

/// A POS order as seen by the kitchen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Unique order id.
    pub id: OrderId,
    /// Display name (e.g. "Shop/0042").
    pub name: String,
    /// POS receipt reference, if any.
    #[serde(default)]
    pub pos_reference: Option<String>,
    /// Kitchen status.
    #[serde(default)]
    pub status: OrderStatus,
    /// Creation time (ms). Missing on some legacy orders.
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    /// POS configuration owning this order.
    #[serde(default)]
    pub config_id: Option<ConfigId>,
}

impl Order {
    /// Creates a draft order with only the required fields.
    pub fn new(id: OrderId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            pos_reference: None,
            status: OrderStatus::Draft,
            created_at: None,
            config_id: None,
        }
    }

    /// Builder-style method to set the status.
    pub fn with_status(mut self, status: OrderStatus) -> Self {
        self.status = status;
        self
    }

    /// Builder-style method to set the creation time.
    pub fn with_created_at(mut self, created_at: Timestamp) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Builder-style method to set the owning configuration.
    pub fn with_config(mut self, config_id: ConfigId) -> Self {
        self.config_id = Some(config_id);
        self
    }
}

/// A single order line (one product on a ticket).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Unique line id.
    pub id: LineId,
    /// Owning order.
    pub order_id: OrderId,
    /// Kitchen status.
    #[serde(default)]
    pub status: LineStatus,
    /// Product categories used for screen visibility.
    #[serde(default)]
    pub categories: BTreeSet<CategoryId>,
    /// Product display name.
    #[serde(default)]
    pub product_name: String,
    /// Ordered quantity.
    #[serde(default)]
    pub qty: f64,
    /// Free-text note from the cashier.
    #[serde(default)]
    pub note: String,
}

impl OrderLine {
    /// Creates a draft line with the given categories.
    pub fn new(
        id: LineId,
        order_id: OrderId,
        categories: impl IntoIterator<Item = CategoryId>,
    ) -> Self {
        Self {
            id,
            order_id,
            status: LineStatus::Draft,
            categories: categories.into_iter().collect(),
            product_name: String::new(),
            qty: 1.0,
            note: String::new(),
        }
    }

    /// Builder-style method to set the status.
    pub fn with_status(mut self, status: LineStatus) -> Self {
        self.status = status;
        self
    }

    /// Builder-style method to set the product name.
    pub fn with_product(mut self, name: impl Into<String>) -> Self {
        self.product_name = name.into();
        self
    }

    /// True iff one of the line's categories is in `visible`.
    ///
    /// An empty `visible` set matches nothing.
    pub fn is_visible_in(&self, visible: &BTreeSet<CategoryId>) -> bool {
        !self.categories.is_disjoint(visible)
    }
}

// =============================================================================
// CLUSTER D: SCREENS
// =============================================================================

/// Metadata of the kitchen screen a snapshot was taken for.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScreenInfo {
    /// Screen id.
    pub screen_id: ScreenId,
    /// Human-readable name.
    #[serde(default)]
    pub screen_name: String,
    /// POS configuration shown on this screen.
    #[serde(default)]
    pub config_id: Option<ConfigId>,
    /// Categories assigned to this screen.
    #[serde(default)]
    pub category_ids: BTreeSet<CategoryId>,
}

impl Default for ScreenId {
    fn default() -> Self {
        Self(1)
    }
}

/// Everything the query boundary returns for one screen.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BoardSnapshot {
    /// Active orders of the screen's configuration.
    pub orders: Vec<Order>,
    /// Lines of those orders.
    pub lines: Vec<OrderLine>,
    /// Screen metadata.
    pub screen: ScreenInfo,
}

impl BoardSnapshot {
    /// Snapshot of a screen that shows nothing.
    pub fn empty(screen_id: ScreenId) -> Self {
        Self {
            orders: Vec::new(),
            lines: Vec::new(),
            screen: ScreenInfo {
                screen_id,
                ..ScreenInfo::default()
            },
        }
    }
}
