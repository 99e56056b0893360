//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::client::OrderStatusRequest;
use shared::models::{Order, OrderCreate, OrderStatus};

use crate::core::ServerState;
use crate::db::repository::order::{self, OrderFilter};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct OrderListQuery {
    pub status: Option<OrderStatus>,
    pub start_ts: Option<i64>,
    pub end_ts: Option<i64>,
}

/// GET /api/orders?status&start_ts&end_ts - 订单列表
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = order::find_filtered(
        state.pool(),
        OrderFilter {
            status: query.status,
            start_ts: query.start_ts,
            end_ts: query.end_ts,
        },
    )
    .await?;
    Ok(Json(orders))
}

/// GET /api/orders/{id} - 获取单个订单 (含行项目)
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Order>> {
    let o = order::find_by_id(state.pool(), &id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Order {id}")))?;
    Ok(Json(o))
}

/// POST /api/orders - 下单 (订单 + 桌台 + 库存的单事务)
pub async fn place(
    State(state): State<ServerState>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<Order>> {
    let order = order::place(state.pool(), payload).await?;
    tracing::info!(order_no = %order.order_no, total = order.total, "Order placed");
    Ok(Json(order))
}

/// PATCH /api/orders/{id}/status - 订单状态流转
pub async fn set_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<OrderStatusRequest>,
) -> AppResult<Json<Order>> {
    Ok(Json(
        order::set_status(state.pool(), &id, payload.status).await?,
    ))
}
