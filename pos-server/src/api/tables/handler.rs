//! Dining Table API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::client::{OkResponse, TableStatusRequest};
use shared::models::{DiningTable, DiningTableCreate, DiningTableUpdate};

use crate::core::ServerState;
use crate::db::repository::dining_table;
use crate::utils::{AppError, AppResult};

/// GET /api/tables - 获取所有桌台
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<DiningTable>>> {
    Ok(Json(dining_table::find_all(state.pool()).await?))
}

/// GET /api/tables/{id} - 获取单个桌台
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<DiningTable>> {
    let t = dining_table::find_by_id(state.pool(), &id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Table {id}")))?;
    Ok(Json(t))
}

/// POST /api/tables - 创建桌台
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<DiningTableCreate>,
) -> AppResult<Json<DiningTable>> {
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("name is required"));
    }
    Ok(Json(dining_table::create(state.pool(), payload).await?))
}

/// PUT /api/tables/{id} - 更新桌台
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<DiningTableUpdate>,
) -> AppResult<Json<DiningTable>> {
    Ok(Json(dining_table::update(state.pool(), &id, payload).await?))
}

/// PATCH /api/tables/{id}/status - 桌台状态流转
///
/// 状态取枚举值；回到 AVAILABLE 时清掉 current_order_id。
pub async fn set_status(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<TableStatusRequest>,
) -> AppResult<Json<DiningTable>> {
    Ok(Json(
        dining_table::set_status(state.pool(), &id, payload.status).await?,
    ))
}

/// DELETE /api/tables/{id} - 删除桌台
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<OkResponse>> {
    dining_table::delete(state.pool(), &id).await?;
    Ok(Json(OkResponse { ok: true }))
}
