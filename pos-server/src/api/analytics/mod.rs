//! Analytics API 模块

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/analytics", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/sales-summary", get(handler::sales_summary))
        .route("/dashboard", get(handler::dashboard))
        .route("/top-products", get(handler::top_products))
        .route("/category-sales", get(handler::category_sales))
}
