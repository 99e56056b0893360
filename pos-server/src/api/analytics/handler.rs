//! Analytics API Handlers (报表)

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use shared::client::{CategorySales, DashboardStats, SalesSummary, TopProduct};

use crate::core::ServerState;
use crate::db::repository::analytics;
use crate::utils::AppResult;

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub start_ts: Option<i64>,
    pub end_ts: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct TopQuery {
    pub limit: Option<i64>,
    pub start_ts: Option<i64>,
    pub end_ts: Option<i64>,
}

/// GET /api/analytics/sales-summary - 日销售汇总
pub async fn sales_summary(
    State(state): State<ServerState>,
    Query(query): Query<RangeQuery>,
) -> AppResult<Json<Vec<SalesSummary>>> {
    Ok(Json(
        analytics::sales_summary(state.pool(), query.start_ts, query.end_ts).await?,
    ))
}

/// GET /api/analytics/dashboard - 今日 vs 昨日
pub async fn dashboard(State(state): State<ServerState>) -> AppResult<Json<DashboardStats>> {
    Ok(Json(analytics::dashboard(state.pool()).await?))
}

/// GET /api/analytics/top-products - 销量排行
pub async fn top_products(
    State(state): State<ServerState>,
    Query(query): Query<TopQuery>,
) -> AppResult<Json<Vec<TopProduct>>> {
    Ok(Json(
        analytics::top_products(
            state.pool(),
            query.limit.unwrap_or(10),
            query.start_ts,
            query.end_ts,
        )
        .await?,
    ))
}

/// GET /api/analytics/category-sales - 分类销售额
pub async fn category_sales(
    State(state): State<ServerState>,
    Query(query): Query<RangeQuery>,
) -> AppResult<Json<Vec<CategorySales>>> {
    Ok(Json(
        analytics::category_sales(state.pool(), query.start_ts, query.end_ts).await?,
    ))
}
