//! Order Model

use serde::{Deserialize, Serialize};

/// Order lifecycle
///
/// PENDING → COMPLETED | CANCELLED, COMPLETED → REFUNDED.
/// The server rejects any other transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Completed,
    Cancelled,
    Refunded,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Cancelled => "CANCELLED",
            OrderStatus::Refunded => "REFUNDED",
        }
    }

    /// Legal transitions of the order state machine
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Pending, OrderStatus::Completed)
                | (OrderStatus::Pending, OrderStatus::Cancelled)
                | (OrderStatus::Completed, OrderStatus::Refunded)
        )
    }
}

/// Order channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    DineIn,
    Delivery,
    Pickup,
}

/// Order line item — a price/cost snapshot taken at placement time
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    pub product_id: String,
    pub name: String,
    pub price: f64,
    pub cost_price: Option<f64>,
    pub image: Option<String>,
    pub unit: String,
    pub quantity: i32,
    pub subtotal: f64,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub order_no: String,
    pub table_id: String,
    pub user_id: Option<String>,

    /// Line items (populated by application code, skipped by FromRow)
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub items: Vec<OrderItem>,

    pub total: f64,
    pub total_cost: Option<f64>,
    pub discount: Option<f64>,
    pub status: OrderStatus,
    pub payment_method: Option<String>,
    pub paid_at: Option<i64>,
    pub timestamp: i64,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub notes: Option<String>,
    pub operator_id: Option<String>,
}

/// Create order line item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemCreate {
    pub product_id: String,
    pub name: String,
    pub price: f64,
    pub cost_price: Option<f64>,
    pub image: Option<String>,
    pub unit: String,
    pub quantity: i32,
}

/// Create order payload
///
/// Placement is transactional on the server: order + item snapshots,
/// table → SCANNED, and per-item stock deduction with OUT_SALE logs either
/// all land or none do.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderCreate {
    pub order_no: String,
    pub table_id: String,
    /// Member placing the order, when known
    pub user_id: Option<String>,
    pub items: Vec<OrderItemCreate>,
    pub status: OrderStatus,
    pub payment_method: Option<String>,
    pub timestamp: i64,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    pub notes: Option<String>,
    pub operator_id: Option<String>,
}
