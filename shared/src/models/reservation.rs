//! Reservation Model

use serde::{Deserialize, Serialize};

/// Reservation lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    Confirmed,
    Pending,
    Arrived,
    Cancelled,
}

/// Reservation entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: String,
    pub table_id: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub reservation_time: String,
    pub guests: i32,
    pub status: ReservationStatus,
    pub notes: Option<String>,
    pub source: Option<String>,
}

/// Create reservation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationCreate {
    pub table_id: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub reservation_time: String,
    pub guests: i32,
    pub status: ReservationStatus,
    pub notes: Option<String>,
    pub source: Option<String>,
}

/// Update reservation payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationUpdate {
    pub table_id: Option<String>,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub reservation_time: Option<String>,
    pub guests: Option<i32>,
    pub status: Option<ReservationStatus>,
    pub notes: Option<String>,
}
