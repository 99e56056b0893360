//! Order API 模块

mod handler;

use axum::{Router, routing::get, routing::patch};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/orders/", get(handler::list).post(handler::place))
        .nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/status", patch(handler::set_status))
}
