//! Product API 模块

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/products/", get(handler::list).post(handler::create))
        .nest("/api/products", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/{id}", get(handler::get_by_id).put(handler::update).delete(handler::delete))
        .route("/{id}/stock", post(handler::adjust_stock))
}
