//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 认证相关接口
//! - [`categories`] - 分类管理接口
//! - [`suppliers`] - 供应商管理接口
//! - [`products`] - 商品管理接口 (含库存调整)
//! - [`tables`] - 桌台管理接口
//! - [`users`] - 会员管理接口
//! - [`orders`] - 订单管理接口
//! - [`reservations`] - 预订管理接口
//! - [`inventory`] - 库存流水接口
//! - [`analytics`] - 报表接口
//! - [`ai`] - AI 代理接口

pub mod ai;
pub mod analytics;
pub mod auth;
pub mod categories;
pub mod health;
pub mod inventory;
pub mod orders;
pub mod products;
pub mod reservations;
pub mod suppliers;
pub mod tables;
pub mod users;

use axum::{Router, middleware};
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::auth::require_auth;
use crate::core::ServerState;

/// 组装完整路由
///
/// require_auth 挂在 Router 级别，内部跳过公共路由。
pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(auth::router())
        .merge(categories::router())
        .merge(suppliers::router())
        .merge(products::router())
        .merge(tables::router())
        .merge(users::router())
        .merge(orders::router())
        .merge(reservations::router())
        .merge(inventory::router())
        .merge(analytics::router())
        .merge(ai::router())
        .layer(middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
