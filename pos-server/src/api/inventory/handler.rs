//! Inventory API Handlers (库存流水)

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use shared::client::StockValue;
use shared::models::{Product, StockLog, StockLogCreate, StockLogType};

use crate::core::ServerState;
use crate::db::repository::{analytics, product, stock_log};
use crate::utils::AppResult;

#[derive(Debug, Deserialize)]
pub struct LogQuery {
    pub product_id: Option<String>,
    #[serde(rename = "type")]
    pub log_type: Option<StockLogType>,
    pub start_ts: Option<i64>,
    pub end_ts: Option<i64>,
}

/// GET /api/inventory/logs - 流水查询
pub async fn list_logs(
    State(state): State<ServerState>,
    Query(query): Query<LogQuery>,
) -> AppResult<Json<Vec<StockLog>>> {
    let logs = stock_log::find_filtered(
        state.pool(),
        stock_log::StockLogFilter {
            product_id: query.product_id,
            log_type: query.log_type,
            start_ts: query.start_ts,
            end_ts: query.end_ts,
        },
    )
    .await?;
    Ok(Json(logs))
}

/// POST /api/inventory/logs - 手工流水录入 (同步调整库存)
pub async fn create_log(
    State(state): State<ServerState>,
    Json(payload): Json<StockLogCreate>,
) -> AppResult<Json<StockLog>> {
    Ok(Json(stock_log::apply(state.pool(), payload).await?))
}

/// GET /api/inventory/low-stock - 低库存商品
pub async fn low_stock(State(state): State<ServerState>) -> AppResult<Json<Vec<Product>>> {
    Ok(Json(product::find_low_stock(state.pool()).await?))
}

/// GET /api/inventory/value - 在售库存价值
pub async fn stock_value(State(state): State<ServerState>) -> AppResult<Json<StockValue>> {
    Ok(Json(analytics::stock_value(state.pool()).await?))
}
