//! AI Proxy API 模块
//!
//! 把仪表盘的 AI 请求代理到 Gemini REST API，
//! 密钥缺失或上游失败时退回固定文案，前端无需感知。

mod handler;

use axum::{Router, routing::get, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/ai", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/insight", post(handler::insight))
        .route("/product-description", post(handler::product_description))
        .route("/status", get(handler::status))
}
