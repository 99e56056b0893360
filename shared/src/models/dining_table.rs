//! Dining Table Model

use serde::{Deserialize, Serialize};

/// Table lifecycle (桌台状态)
///
/// AVAILABLE → SCANNED (order placed) → UNPAID (opened) → PAID (settled)
/// → AVAILABLE (cleared). Transitions happen only through explicit
/// operator actions; clearing back to AVAILABLE drops `current_order_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableStatus {
    Available,
    Scanned,
    Unpaid,
    Paid,
}

impl TableStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableStatus::Available => "AVAILABLE",
            TableStatus::Scanned => "SCANNED",
            TableStatus::Unpaid => "UNPAID",
            TableStatus::Paid => "PAID",
        }
    }
}

/// Dining table entity (桌台)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct DiningTable {
    pub id: String,
    pub name: String,
    pub status: TableStatus,
    pub capacity: i32,
    pub area: Option<String>,
    pub current_order_id: Option<String>,
    pub sort_order: i32,
}

/// Create dining table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiningTableCreate {
    pub name: String,
    pub status: Option<TableStatus>,
    pub capacity: i32,
    pub area: Option<String>,
    pub sort_order: Option<i32>,
}

/// Update dining table payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiningTableUpdate {
    pub name: Option<String>,
    pub capacity: Option<i32>,
    pub area: Option<String>,
    pub current_order_id: Option<String>,
    pub sort_order: Option<i32>,
}
