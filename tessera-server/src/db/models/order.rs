//! Order Model

use serde::{Deserialize, Serialize};
use surrealdb::sql::Thing;
use validator::Validate;

pub type OrderId = Thing;

/// Order lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Paid,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Paid => "paid",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

/// One purchased line
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderLine {
    /// Record link to product
    pub product: Thing,
    /// Denormalized display name at time of purchase
    pub name: String,
    #[validate(range(min = 1, max = 9999))]
    pub quantity: i64,
    /// Unit price in euros at time of purchase
    #[validate(range(min = 0.0))]
    pub unit_price: f64,
}

/// A single status transition, appended to `status_history`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusChange {
    pub status: OrderStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Epoch millis
    pub at: i64,
}

impl StatusChange {
    pub fn now(status: OrderStatus, note: Option<String>) -> Self {
        Self {
            status,
            note,
            at: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// Stock that could not be deducted at completion time
///
/// Recorded on the order so it can be reported; the order still completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockShortfall {
    pub product: Thing,
    pub requested: i64,
    /// Stock observed after the failed conditional decrement, if readable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<i64>,
}

/// Order model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Option<OrderId>,
    /// Human-facing order number
    pub number: String,
    /// Cart session this order was placed from
    pub session: Option<String>,
    pub lines: Vec<OrderLine>,
    /// Grand total in euros
    pub total: f64,
    pub status: OrderStatus,
    #[serde(default)]
    pub status_history: Vec<StatusChange>,
    #[serde(default)]
    pub stock_issues: Vec<StockShortfall>,
    /// Epoch millis
    #[serde(default)]
    pub created_at: i64,
}

/// Order creation payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderCreate {
    pub session: Option<String>,
    #[validate(length(min = 1), nested)]
    pub lines: Vec<OrderLine>,
    /// Client-computed grand total; must match the line arithmetic
    #[validate(range(min = 0.0))]
    pub total: f64,
}
