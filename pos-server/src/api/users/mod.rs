//! Member API 模块 (路径沿用 /api/users)

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/users/", get(handler::list).post(handler::create))
        .nest("/api/users", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/{id}", get(handler::get_by_id).put(handler::update).delete(handler::delete))
        .route("/{id}/balance", post(handler::add_balance))
        .route("/{id}/points", post(handler::add_points))
}
