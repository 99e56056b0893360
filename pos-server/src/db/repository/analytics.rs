//! Analytics Repository (报表聚合)
//!
//! 营收口径：只统计 COMPLETED 订单。时间戳为毫秒，
//! 日分桶用 `strftime(..., timestamp/1000, 'unixepoch')` 按 UTC 切。

use super::RepoResult;
use chrono::{Duration, TimeZone, Utc};
use shared::client::{CategorySales, DashboardStats, DayComparison, SalesSummary, StockValue, TopProduct};
use sqlx::SqlitePool;

/// 日销售汇总 (GET /api/analytics/sales-summary)
pub async fn sales_summary(
    pool: &SqlitePool,
    start_ts: Option<i64>,
    end_ts: Option<i64>,
) -> RepoResult<Vec<SalesSummary>> {
    let mut qb = sqlx::QueryBuilder::new(
        "SELECT strftime('%Y-%m-%d', timestamp/1000, 'unixepoch') AS date, COUNT(*) AS orders, COALESCE(SUM(total), 0) AS gross, COALESCE(SUM(total - COALESCE(total_cost, 0)), 0) AS profit FROM orders WHERE status = 'COMPLETED'",
    );
    if let Some(start_ts) = start_ts {
        qb.push(" AND timestamp >= ").push_bind(start_ts);
    }
    if let Some(end_ts) = end_ts {
        qb.push(" AND timestamp <= ").push_bind(end_ts);
    }
    qb.push(" GROUP BY date ORDER BY date");

    let rows: Vec<(String, i64, f64, f64)> = qb.build_query_as().fetch_all(pool).await?;
    Ok(rows
        .into_iter()
        .map(|(date, orders, gross, profit)| SalesSummary {
            date,
            orders,
            gross,
            profit,
        })
        .collect())
}

async fn range_totals(pool: &SqlitePool, start_ts: i64, end_ts: i64) -> RepoResult<(f64, i64, f64)> {
    let (revenue, orders, profit): (f64, i64, f64) = sqlx::query_as(
        "SELECT COALESCE(SUM(total), 0.0), COUNT(*), COALESCE(SUM(total - COALESCE(total_cost, 0)), 0.0) FROM orders WHERE status = 'COMPLETED' AND timestamp >= ?1 AND timestamp < ?2",
    )
    .bind(start_ts)
    .bind(end_ts)
    .fetch_one(pool)
    .await?;
    Ok((revenue, orders, profit))
}

/// 今日 vs 昨日 (GET /api/analytics/dashboard)
pub async fn dashboard(pool: &SqlitePool) -> RepoResult<DashboardStats> {
    let today_start = Utc
        .from_utc_datetime(&Utc::now().date_naive().and_time(chrono::NaiveTime::MIN))
        .timestamp_millis();
    let yesterday_start = today_start - Duration::days(1).num_milliseconds();
    let tomorrow_start = today_start + Duration::days(1).num_milliseconds();

    let (today_revenue, today_orders, today_profit) =
        range_totals(pool, today_start, tomorrow_start).await?;
    let (y_revenue, y_orders, y_profit) =
        range_totals(pool, yesterday_start, today_start).await?;

    let average_order_value = if today_orders > 0 {
        today_revenue / today_orders as f64
    } else {
        0.0
    };

    Ok(DashboardStats {
        today_revenue,
        today_orders,
        today_profit,
        average_order_value,
        compared_to_yesterday: DayComparison {
            revenue: today_revenue - y_revenue,
            orders: today_orders - y_orders,
            profit: today_profit - y_profit,
        },
    })
}

/// 销量排行 (GET /api/analytics/top-products)
pub async fn top_products(
    pool: &SqlitePool,
    limit: i64,
    start_ts: Option<i64>,
    end_ts: Option<i64>,
) -> RepoResult<Vec<TopProduct>> {
    let mut qb = sqlx::QueryBuilder::new(
        "SELECT oi.product_id, oi.name, SUM(oi.quantity) AS quantity, COALESCE(SUM(oi.subtotal), 0) AS revenue FROM order_items oi JOIN orders o ON o.id = oi.order_id WHERE o.status = 'COMPLETED'",
    );
    if let Some(start_ts) = start_ts {
        qb.push(" AND o.timestamp >= ").push_bind(start_ts);
    }
    if let Some(end_ts) = end_ts {
        qb.push(" AND o.timestamp <= ").push_bind(end_ts);
    }
    qb.push(" GROUP BY oi.product_id, oi.name ORDER BY quantity DESC LIMIT ")
        .push_bind(limit.clamp(1, 100));

    let rows: Vec<(String, String, i64, f64)> = qb.build_query_as().fetch_all(pool).await?;
    Ok(rows
        .into_iter()
        .map(|(product_id, name, quantity, revenue)| TopProduct {
            product_id,
            name,
            quantity,
            revenue,
        })
        .collect())
}

/// 分类销售额 (GET /api/analytics/category-sales)
///
/// 通过商品表关联分类；软删除的商品仍计入历史销售。
pub async fn category_sales(
    pool: &SqlitePool,
    start_ts: Option<i64>,
    end_ts: Option<i64>,
) -> RepoResult<Vec<CategorySales>> {
    let mut qb = sqlx::QueryBuilder::new(
        "SELECT c.id, c.name, COALESCE(SUM(oi.subtotal), 0) AS revenue, COUNT(DISTINCT o.id) AS orders FROM order_items oi JOIN orders o ON o.id = oi.order_id JOIN products p ON p.id = oi.product_id JOIN categories c ON c.id = p.category_id WHERE o.status = 'COMPLETED'",
    );
    if let Some(start_ts) = start_ts {
        qb.push(" AND o.timestamp >= ").push_bind(start_ts);
    }
    if let Some(end_ts) = end_ts {
        qb.push(" AND o.timestamp <= ").push_bind(end_ts);
    }
    qb.push(" GROUP BY c.id, c.name ORDER BY revenue DESC");

    let rows: Vec<(String, String, f64, i64)> = qb.build_query_as().fetch_all(pool).await?;
    Ok(rows
        .into_iter()
        .map(|(category_id, name, revenue, orders)| CategorySales {
            category_id,
            name,
            revenue,
            orders,
        })
        .collect())
}

/// 在售库存价值 (GET /api/inventory/value)
pub async fn stock_value(pool: &SqlitePool) -> RepoResult<StockValue> {
    let (total_value, total_cost, item_count): (f64, f64, i64) = sqlx::query_as(
        "SELECT COALESCE(SUM(stock * price), 0), COALESCE(SUM(stock * COALESCE(cost_price, 0)), 0), COUNT(*) FROM products WHERE is_deleted = 0 AND is_on_shelf = 1",
    )
    .fetch_one(pool)
    .await?;
    Ok(StockValue {
        total_value,
        total_cost,
        item_count,
    })
}
