//! Reservation API 模块

mod handler;

use axum::{Router, routing::get, routing::post, routing::put};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/reservations/", get(handler::list).post(handler::create))
        .nest("/api/reservations", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/{id}", put(handler::update))
        .route("/{id}/cancel", post(handler::cancel))
        .route("/{id}/arrive", post(handler::arrive))
}
