//! Stock Log Model (库存流水)

use serde::{Deserialize, Serialize};

/// Kind of inventory movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockLogType {
    InPurchase,
    InReturn,
    OutSale,
    OutLoss,
    Adjustment,
}

impl StockLogType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockLogType::InPurchase => "IN_PURCHASE",
            StockLogType::InReturn => "IN_RETURN",
            StockLogType::OutSale => "OUT_SALE",
            StockLogType::OutLoss => "OUT_LOSS",
            StockLogType::Adjustment => "ADJUSTMENT",
        }
    }
}

/// Append-only inventory ledger entry
///
/// `delta` is the delta actually applied after clamping stock at 0, which
/// may differ from the requested delta when stock runs out.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct StockLog {
    pub id: String,
    pub product_id: String,
    pub product_name: String,
    #[serde(rename = "type")]
    pub log_type: StockLogType,
    pub delta: i32,
    pub before_stock: i32,
    pub current_stock: i32,
    pub cost_price: Option<f64>,
    pub operator: String,
    pub timestamp: i64,
    pub note: Option<String>,
    pub reference_no: Option<String>,
}

/// Create stock log payload (manual ledger entry via /api/inventory/logs)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockLogCreate {
    pub product_id: String,
    #[serde(rename = "type")]
    pub log_type: StockLogType,
    pub delta: i32,
    pub operator: String,
    pub note: Option<String>,
    pub reference_no: Option<String>,
}
