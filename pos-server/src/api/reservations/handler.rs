//! Reservation API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::models::{Reservation, ReservationCreate, ReservationUpdate};

use crate::core::ServerState;
use crate::db::repository::reservation;
use crate::utils::{AppError, AppResult};

/// GET /api/reservations - 获取所有预订
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Reservation>>> {
    Ok(Json(reservation::find_all(state.pool()).await?))
}

/// POST /api/reservations - 创建预订
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ReservationCreate>,
) -> AppResult<Json<Reservation>> {
    if payload.customer_name.trim().is_empty() || payload.customer_phone.trim().is_empty() {
        return Err(AppError::validation("customer name and phone are required"));
    }
    Ok(Json(reservation::create(state.pool(), payload).await?))
}

/// PUT /api/reservations/{id} - 更新预订
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ReservationUpdate>,
) -> AppResult<Json<Reservation>> {
    Ok(Json(reservation::update(state.pool(), &id, payload).await?))
}

/// POST /api/reservations/{id}/cancel - 取消预订
pub async fn cancel(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Reservation>> {
    Ok(Json(reservation::cancel(state.pool(), &id).await?))
}

/// POST /api/reservations/{id}/arrive - 标记到店
pub async fn arrive(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Reservation>> {
    Ok(Json(reservation::arrive(state.pool(), &id).await?))
}
