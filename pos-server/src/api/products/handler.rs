//! Product API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::client::{OkResponse, StockAdjustRequest};
use shared::models::{Product, ProductCreate, ProductUpdate, StockLog, StockLogCreate};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{product, stock_log};
use crate::utils::{AppError, AppResult};

/// GET /api/products - 获取所有商品
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Product>>> {
    Ok(Json(product::find_all(state.pool()).await?))
}

/// GET /api/products/{id} - 获取单个商品
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    let p = product::find_by_id(state.pool(), &id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product {id}")))?;
    Ok(Json(p))
}

/// POST /api/products - 创建商品
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<Product>> {
    if payload.name.trim().is_empty() {
        return Err(AppError::validation("name is required"));
    }
    Ok(Json(product::create(state.pool(), payload).await?))
}

/// PUT /api/products/{id} - 更新商品
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<Product>> {
    Ok(Json(product::update(state.pool(), &id, payload).await?))
}

/// DELETE /api/products/{id} - 删除商品 (软删除)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<OkResponse>> {
    product::delete(state.pool(), &id).await?;
    Ok(Json(OkResponse { ok: true }))
}

/// POST /api/products/{id}/stock - 库存调整 (追加流水)
pub async fn adjust_stock(
    State(state): State<ServerState>,
    current: CurrentUser,
    Path(id): Path<String>,
    Json(payload): Json<StockAdjustRequest>,
) -> AppResult<Json<StockLog>> {
    let log = stock_log::apply(
        state.pool(),
        StockLogCreate {
            product_id: id,
            log_type: payload.log_type,
            delta: payload.delta,
            operator: current.name,
            note: payload.note,
            reference_no: None,
        },
    )
    .await?;
    Ok(Json(log))
}
