//! Auth API 模块

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/auth", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/login", post(handler::login))
        .route("/logout", post(handler::logout))
        .route("/refresh", post(handler::refresh))
        .route("/me", get(handler::me))
        .route("/register", post(handler::register))
        .route("/change-password", post(handler::change_password))
}
