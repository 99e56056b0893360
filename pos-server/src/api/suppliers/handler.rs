//! Supplier API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::client::OkResponse;
use shared::models::{Supplier, SupplierCreate, SupplierUpdate};

use crate::core::ServerState;
use crate::db::repository::supplier;
use crate::utils::{AppError, AppResult};

/// GET /api/suppliers - 获取所有供应商
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Supplier>>> {
    Ok(Json(supplier::find_all(state.pool()).await?))
}

/// GET /api/suppliers/{id} - 获取单个供应商
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Supplier>> {
    let s = supplier::find_by_id(state.pool(), &id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Supplier {id}")))?;
    Ok(Json(s))
}

/// POST /api/suppliers - 创建供应商
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<SupplierCreate>,
) -> AppResult<Json<Supplier>> {
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("name is required"));
    }
    Ok(Json(supplier::create(state.pool(), payload).await?))
}

/// PUT /api/suppliers/{id} - 更新供应商
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<SupplierUpdate>,
) -> AppResult<Json<Supplier>> {
    Ok(Json(supplier::update(state.pool(), &id, payload).await?))
}

/// DELETE /api/suppliers/{id} - 删除供应商 (软删除)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<OkResponse>> {
    supplier::delete(state.pool(), &id).await?;
    Ok(Json(OkResponse { ok: true }))
}
