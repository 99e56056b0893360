//! Stock Log Repository (库存流水)
//!
//! 流水只追加，不修改不删除。[`apply_in_tx`] 是库存变动的唯一入口：
//! 商品库存调整、手工流水录入和下单扣减走同一段代码。

use super::{RepoError, RepoResult};
use shared::models::{StockLog, StockLogCreate};
use sqlx::{SqliteConnection, SqlitePool};

const COLS: &str = "id, product_id, product_name, log_type, delta, before_stock, current_stock, cost_price, operator, timestamp, note, reference_no";

/// List filter (all fields optional, combined with AND)
#[derive(Debug, Default, Clone)]
pub struct StockLogFilter {
    pub product_id: Option<String>,
    pub log_type: Option<shared::models::StockLogType>,
    pub start_ts: Option<i64>,
    pub end_ts: Option<i64>,
}

pub async fn find_filtered(pool: &SqlitePool, filter: StockLogFilter) -> RepoResult<Vec<StockLog>> {
    let mut qb = sqlx::QueryBuilder::new(format!("SELECT {COLS} FROM stock_logs WHERE 1=1"));

    if let Some(product_id) = filter.product_id {
        qb.push(" AND product_id = ").push_bind(product_id);
    }
    if let Some(log_type) = filter.log_type {
        qb.push(" AND log_type = ").push_bind(log_type);
    }
    if let Some(start_ts) = filter.start_ts {
        qb.push(" AND timestamp >= ").push_bind(start_ts);
    }
    if let Some(end_ts) = filter.end_ts {
        qb.push(" AND timestamp <= ").push_bind(end_ts);
    }
    qb.push(" ORDER BY timestamp DESC");

    let rows = qb.build_query_as::<StockLog>().fetch_all(pool).await?;
    Ok(rows)
}

/// 应用一次库存变动并追加流水 (独立事务)
pub async fn apply(pool: &SqlitePool, data: StockLogCreate) -> RepoResult<StockLog> {
    let mut tx = pool.begin().await?;
    let log = apply_in_tx(&mut *tx, &data, shared::util::now_millis()).await?;
    tx.commit().await?;
    Ok(log)
}

/// 在调用方的事务里应用一次库存变动
///
/// 库存在 0 处截断：请求的 delta 会把库存压到负数时，
/// 实际应用的 delta 被缩减，流水记录的是应用值而非请求值。
pub async fn apply_in_tx(
    conn: &mut SqliteConnection,
    data: &StockLogCreate,
    timestamp: i64,
) -> RepoResult<StockLog> {
    if data.delta == 0 {
        return Err(RepoError::Validation("delta must be non-zero".into()));
    }

    let row: Option<(String, i32, Option<f64>)> = sqlx::query_as(
        "SELECT name, stock, cost_price FROM products WHERE id = ? AND is_deleted = 0",
    )
    .bind(&data.product_id)
    .fetch_optional(&mut *conn)
    .await?;

    let (product_name, before_stock, cost_price) =
        row.ok_or_else(|| RepoError::NotFound(format!("Product {}", data.product_id)))?;

    let current_stock = (before_stock + data.delta).max(0);
    let applied_delta = current_stock - before_stock;

    sqlx::query("UPDATE products SET stock = ?1 WHERE id = ?2")
        .bind(current_stock)
        .bind(&data.product_id)
        .execute(&mut *conn)
        .await?;

    let log = StockLog {
        id: shared::util::new_id(),
        product_id: data.product_id.clone(),
        product_name,
        log_type: data.log_type,
        delta: applied_delta,
        before_stock,
        current_stock,
        cost_price,
        operator: data.operator.clone(),
        timestamp,
        note: data.note.clone(),
        reference_no: data.reference_no.clone(),
    };

    sqlx::query(
        "INSERT INTO stock_logs (id, product_id, product_name, log_type, delta, before_stock, current_stock, cost_price, operator, timestamp, note, reference_no) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
    )
    .bind(&log.id)
    .bind(&log.product_id)
    .bind(&log.product_name)
    .bind(log.log_type)
    .bind(log.delta)
    .bind(log.before_stock)
    .bind(log.current_stock)
    .bind(log.cost_price)
    .bind(&log.operator)
    .bind(log.timestamp)
    .bind(&log.note)
    .bind(&log.reference_no)
    .execute(&mut *conn)
    .await?;

    Ok(log)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::product::tests::{sample, seed_category};
    use crate::db::repository::{product, test_support::test_pool};
    use shared::models::StockLogType;

    async fn seed_product(pool: &SqlitePool) -> String {
        let cat = seed_category(pool).await;
        product::create(pool, sample(&cat)).await.unwrap().id
    }

    fn entry(product_id: &str, delta: i32, log_type: StockLogType) -> StockLogCreate {
        StockLogCreate {
            product_id: product_id.to_string(),
            log_type,
            delta,
            operator: "admin".into(),
            note: None,
            reference_no: None,
        }
    }

    #[tokio::test]
    async fn purchase_increases_stock_and_logs() {
        let pool = test_pool().await;
        let pid = seed_product(&pool).await; // stock 50

        let log = apply(&pool, entry(&pid, 20, StockLogType::InPurchase))
            .await
            .unwrap();
        assert_eq!(log.before_stock, 50);
        assert_eq!(log.current_stock, 70);
        assert_eq!(log.delta, 20);

        let p = product::find_by_id(&pool, &pid).await.unwrap().unwrap();
        assert_eq!(p.stock, 70);
    }

    #[tokio::test]
    async fn stock_clamps_at_zero_and_records_applied_delta() {
        let pool = test_pool().await;
        let pid = seed_product(&pool).await; // stock 50

        let log = apply(&pool, entry(&pid, -80, StockLogType::OutLoss))
            .await
            .unwrap();
        assert_eq!(log.current_stock, 0);
        assert_eq!(log.delta, -50); // applied, not requested

        let p = product::find_by_id(&pool, &pid).await.unwrap().unwrap();
        assert_eq!(p.stock, 0);
    }

    #[tokio::test]
    async fn zero_delta_rejected() {
        let pool = test_pool().await;
        let pid = seed_product(&pool).await;
        assert!(matches!(
            apply(&pool, entry(&pid, 0, StockLogType::Adjustment)).await,
            Err(RepoError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn unknown_product_rejected() {
        let pool = test_pool().await;
        assert!(matches!(
            apply(&pool, entry("missing", 5, StockLogType::InPurchase)).await,
            Err(RepoError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn filter_by_type_and_product() {
        let pool = test_pool().await;
        let pid = seed_product(&pool).await;
        apply(&pool, entry(&pid, 10, StockLogType::InPurchase))
            .await
            .unwrap();
        apply(&pool, entry(&pid, -5, StockLogType::OutLoss))
            .await
            .unwrap();

        let purchases = find_filtered(
            &pool,
            StockLogFilter {
                product_id: Some(pid.clone()),
                log_type: Some(StockLogType::InPurchase),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(purchases.len(), 1);
        assert_eq!(purchases[0].delta, 10);

        let all = find_filtered(&pool, StockLogFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);
    }
}
