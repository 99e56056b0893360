//! Inventory API 模块

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/inventory", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/logs", get(handler::list_logs).post(handler::create_log))
        .route("/low-stock", get(handler::low_stock))
        .route("/value", get(handler::stock_value))
}
