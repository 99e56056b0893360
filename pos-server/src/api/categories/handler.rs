//! Category API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::client::OkResponse;
use shared::models::{Category, CategoryCreate, CategoryUpdate};

use crate::core::ServerState;
use crate::db::repository::category;
use crate::utils::{AppError, AppResult};

/// GET /api/categories - 获取所有分类
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Category>>> {
    Ok(Json(category::find_all(state.pool()).await?))
}

/// GET /api/categories/{id} - 获取单个分类
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Category>> {
    let cat = category::find_by_id(state.pool(), &id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Category {id}")))?;
    Ok(Json(cat))
}

/// POST /api/categories - 创建分类
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<Json<Category>> {
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("name is required"));
    }
    Ok(Json(category::create(state.pool(), payload).await?))
}

/// PUT /api/categories/{id} - 更新分类
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<CategoryUpdate>,
) -> AppResult<Json<Category>> {
    Ok(Json(category::update(state.pool(), &id, payload).await?))
}

/// DELETE /api/categories/{id} - 删除分类
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<OkResponse>> {
    category::delete(state.pool(), &id).await?;
    Ok(Json(OkResponse { ok: true }))
}
