//! Client-related types shared between server and client
//!
//! Common request/response types used in API communication.
//! These types are shared between pos-server and pos-client.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{OrderStatus, StockLogType, TableStatus, UserRole};

// =============================================================================
// Auth API DTOs
// =============================================================================

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub user: AuthUser,
}

/// Authenticated user information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub username: String,
    pub name: String,
    pub role: UserRole,
    #[serde(default)]
    pub permissions: Vec<String>,
    pub avatar: Option<String>,
}

/// Register request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, message = "username is required"))]
    pub username: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
    pub name: String,
    pub phone: Option<String>,
    pub role: Option<UserRole>,
}

/// Register response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub id: String,
    pub username: String,
}

/// Refresh token request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Refresh token response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
}

/// Change password request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    #[validate(length(min = 6, message = "new password must be at least 6 characters"))]
    pub new_password: String,
}

/// Generic message response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Generic ok response (delete endpoints)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OkResponse {
    pub ok: bool,
}

// =============================================================================
// Mutation DTOs
// =============================================================================

/// Stock adjustment request (POST /api/products/{id}/stock)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockAdjustRequest {
    pub delta: i32,
    #[serde(rename = "type")]
    pub log_type: StockLogType,
    pub note: Option<String>,
}

/// Table status transition request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableStatusRequest {
    pub status: TableStatus,
}

/// Order status transition request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusRequest {
    pub status: OrderStatus,
}

/// Member balance top-up request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceRequest {
    pub amount: f64,
}

/// Member points grant request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointsRequest {
    pub points: i32,
}

// =============================================================================
// Inventory / Analytics DTOs
// =============================================================================

/// Aggregate value of on-shelf inventory
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockValue {
    pub total_value: f64,
    pub total_cost: f64,
    pub item_count: i64,
}

/// One daily sales bucket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesSummary {
    pub date: String,
    pub orders: i64,
    pub gross: f64,
    pub profit: f64,
}

/// Today-vs-yesterday delta block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayComparison {
    pub revenue: f64,
    pub orders: i64,
    pub profit: f64,
}

/// Dashboard headline figures
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub today_revenue: f64,
    pub today_orders: i64,
    pub today_profit: f64,
    pub average_order_value: f64,
    pub compared_to_yesterday: DayComparison,
}

/// Best-selling product row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopProduct {
    pub product_id: String,
    pub name: String,
    pub quantity: i64,
    pub revenue: f64,
}

/// Per-category sales row
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySales {
    pub category_id: String,
    pub name: String,
    pub revenue: f64,
    pub orders: i64,
}

// =============================================================================
// AI proxy DTOs
// =============================================================================

/// Business insight request — raw JSON blobs the dashboard already holds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightRequest {
    pub sales_data: serde_json::Value,
    #[serde(default)]
    pub recent_orders: Vec<serde_json::Value>,
}

/// Business insight response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightResponse {
    pub insight: String,
}

/// Product description request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDescriptionRequest {
    pub product_name: String,
}

/// Product description response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescriptionResponse {
    pub description: String,
}

/// AI service availability
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiStatus {
    pub available: bool,
    pub provider: Option<String>,
}
