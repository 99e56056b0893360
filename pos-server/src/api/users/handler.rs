//! Member API Handlers (会员)

use axum::{
    Json,
    extract::{Path, State},
};
use shared::client::{BalanceRequest, OkResponse, PointsRequest};
use shared::models::{Member, MemberCreate, MemberUpdate};

use crate::core::ServerState;
use crate::db::repository::member;
use crate::utils::{AppError, AppResult};

/// GET /api/users - 获取所有会员
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Member>>> {
    Ok(Json(member::find_all(state.pool()).await?))
}

/// GET /api/users/{id} - 获取单个会员
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Member>> {
    let m = member::find_by_id(state.pool(), &id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Member {id}")))?;
    Ok(Json(m))
}

/// POST /api/users - 创建会员
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<MemberCreate>,
) -> AppResult<Json<Member>> {
    if payload.name.trim().is_empty() || payload.phone.trim().is_empty() {
        return Err(AppError::validation("name and phone are required"));
    }
    Ok(Json(member::create(state.pool(), payload).await?))
}

/// PUT /api/users/{id} - 更新会员
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<MemberUpdate>,
) -> AppResult<Json<Member>> {
    Ok(Json(member::update(state.pool(), &id, payload).await?))
}

/// DELETE /api/users/{id} - 删除会员 (软删除)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<OkResponse>> {
    member::delete(state.pool(), &id).await?;
    Ok(Json(OkResponse { ok: true }))
}

/// POST /api/users/{id}/balance - 余额充值
pub async fn add_balance(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<BalanceRequest>,
) -> AppResult<Json<Member>> {
    Ok(Json(
        member::add_balance(state.pool(), &id, payload.amount).await?,
    ))
}

/// POST /api/users/{id}/points - 积分发放
pub async fn add_points(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<PointsRequest>,
) -> AppResult<Json<Member>> {
    Ok(Json(
        member::add_points(state.pool(), &id, payload.points).await?,
    ))
}
