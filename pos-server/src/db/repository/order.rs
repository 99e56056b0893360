//! Order Repository
//!
//! 下单是跨订单、桌台、库存三个实体的单事务操作，
//! 任何一步失败整体回滚。

use super::{RepoError, RepoResult, stock_log};
use shared::models::{
    Order, OrderCreate, OrderItem, OrderStatus, StockLogCreate, StockLogType, TableStatus,
};
use sqlx::SqlitePool;
use std::collections::HashMap;

const ORDER_COLS: &str = "id, order_no, table_id, user_id, total, total_cost, discount, status, payment_method, paid_at, timestamp, order_type, notes, operator_id";
const ITEM_COLS: &str =
    "id, order_id, product_id, name, price, cost_price, image, unit, quantity, subtotal";

/// List filter (all fields optional, combined with AND)
#[derive(Debug, Default, Clone)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub start_ts: Option<i64>,
    pub end_ts: Option<i64>,
}

pub async fn find_filtered(pool: &SqlitePool, filter: OrderFilter) -> RepoResult<Vec<Order>> {
    let mut qb = sqlx::QueryBuilder::new(format!("SELECT {ORDER_COLS} FROM orders WHERE 1=1"));

    if let Some(status) = filter.status {
        qb.push(" AND status = ").push_bind(status);
    }
    if let Some(start_ts) = filter.start_ts {
        qb.push(" AND timestamp >= ").push_bind(start_ts);
    }
    if let Some(end_ts) = filter.end_ts {
        qb.push(" AND timestamp <= ").push_bind(end_ts);
    }
    qb.push(" ORDER BY timestamp DESC");

    let mut orders = qb.build_query_as::<Order>().fetch_all(pool).await?;
    attach_items(pool, &mut orders).await?;
    Ok(orders)
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<Order>> {
    let order = sqlx::query_as::<_, Order>(&format!("SELECT {ORDER_COLS} FROM orders WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;

    match order {
        Some(mut order) => {
            attach_items(pool, std::slice::from_mut(&mut order)).await?;
            Ok(Some(order))
        }
        None => Ok(None),
    }
}

async fn attach_items(pool: &SqlitePool, orders: &mut [Order]) -> RepoResult<()> {
    if orders.is_empty() {
        return Ok(());
    }

    let mut qb =
        sqlx::QueryBuilder::new(format!("SELECT {ITEM_COLS} FROM order_items WHERE order_id IN ("));
    let mut separated = qb.separated(", ");
    for order in orders.iter() {
        separated.push_bind(order.id.clone());
    }
    qb.push(")");

    let items = qb.build_query_as::<OrderItem>().fetch_all(pool).await?;

    let mut by_order: HashMap<String, Vec<OrderItem>> = HashMap::new();
    for item in items {
        by_order.entry(item.order_id.clone()).or_default().push(item);
    }
    for order in orders.iter_mut() {
        order.items = by_order.remove(&order.id).unwrap_or_default();
    }
    Ok(())
}

/// 下单 (单事务)
///
/// 1. 写入订单与行项目快照，total/total_cost 由快照算出
/// 2. 桌台置为 SCANNED 并挂上订单
/// 3. 逐行扣减库存并追加 OUT_SALE 流水 (reference_no = order_no)
pub async fn place(pool: &SqlitePool, data: OrderCreate) -> RepoResult<Order> {
    if data.items.is_empty() {
        return Err(RepoError::Validation("order must contain items".into()));
    }
    for item in &data.items {
        if item.quantity <= 0 {
            return Err(RepoError::Validation(format!(
                "quantity must be positive: {}",
                item.name
            )));
        }
    }

    let mut tx = pool.begin().await?;

    let duplicate: Option<(String,)> = sqlx::query_as("SELECT id FROM orders WHERE order_no = ?")
        .bind(&data.order_no)
        .fetch_optional(&mut *tx)
        .await?;
    if duplicate.is_some() {
        return Err(RepoError::Duplicate(format!(
            "Order number already exists: {}",
            data.order_no
        )));
    }

    let table: Option<(String,)> = sqlx::query_as("SELECT id FROM dining_tables WHERE id = ?")
        .bind(&data.table_id)
        .fetch_optional(&mut *tx)
        .await?;
    if table.is_none() {
        return Err(RepoError::NotFound(format!("Table {}", data.table_id)));
    }

    let order_id = shared::util::new_id();
    let now = chrono::Utc::now().to_rfc3339();

    let total: f64 = data
        .items
        .iter()
        .map(|i| i.price * f64::from(i.quantity))
        .sum();
    let has_cost = data.items.iter().any(|i| i.cost_price.is_some());
    let total_cost: Option<f64> = has_cost.then(|| {
        data.items
            .iter()
            .filter_map(|i| i.cost_price.map(|c| c * f64::from(i.quantity)))
            .sum()
    });
    let paid_at = (data.status == OrderStatus::Completed).then_some(data.timestamp);

    sqlx::query(
        "INSERT INTO orders (id, order_no, table_id, user_id, total, total_cost, status, payment_method, paid_at, timestamp, order_type, notes, operator_id, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
    )
    .bind(&order_id)
    .bind(&data.order_no)
    .bind(&data.table_id)
    .bind(&data.user_id)
    .bind(total)
    .bind(total_cost)
    .bind(data.status)
    .bind(&data.payment_method)
    .bind(paid_at)
    .bind(data.timestamp)
    .bind(data.order_type)
    .bind(&data.notes)
    .bind(&data.operator_id)
    .bind(&now)
    .execute(&mut *tx)
    .await?;

    for item in &data.items {
        let subtotal = item.price * f64::from(item.quantity);
        sqlx::query(
            "INSERT INTO order_items (id, order_id, product_id, name, price, cost_price, image, unit, quantity, subtotal) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )
        .bind(shared::util::new_id())
        .bind(&order_id)
        .bind(&item.product_id)
        .bind(&item.name)
        .bind(item.price)
        .bind(item.cost_price)
        .bind(&item.image)
        .bind(&item.unit)
        .bind(item.quantity)
        .bind(subtotal)
        .execute(&mut *tx)
        .await?;
    }

    sqlx::query("UPDATE dining_tables SET status = ?1, current_order_id = ?2 WHERE id = ?3")
        .bind(TableStatus::Scanned)
        .bind(&order_id)
        .bind(&data.table_id)
        .execute(&mut *tx)
        .await?;

    let operator = data.operator_id.clone().unwrap_or_else(|| "system".into());
    for item in &data.items {
        stock_log::apply_in_tx(
            &mut *tx,
            &StockLogCreate {
                product_id: item.product_id.clone(),
                log_type: StockLogType::OutSale,
                delta: -item.quantity,
                operator: operator.clone(),
                note: None,
                reference_no: Some(data.order_no.clone()),
            },
            data.timestamp,
        )
        .await?;
    }

    tx.commit().await?;

    find_by_id(pool, &order_id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to place order".into()))
}

/// 订单状态流转 (PATCH /api/orders/{id}/status)
///
/// 非法流转拒绝；取消时释放桌台。取消不回补库存，
/// 需要回补时走库存流水的 IN_RETURN 录入。
pub async fn set_status(pool: &SqlitePool, id: &str, next: OrderStatus) -> RepoResult<Order> {
    let current = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {id}")))?;

    if !current.status.can_transition_to(next) {
        return Err(RepoError::BusinessRule(format!(
            "Illegal order transition: {} -> {}",
            current.status.as_str(),
            next.as_str()
        )));
    }

    let mut tx = pool.begin().await?;

    let paid_at = (next == OrderStatus::Completed).then(shared::util::now_millis);
    sqlx::query("UPDATE orders SET status = ?1, paid_at = COALESCE(?2, paid_at) WHERE id = ?3")
        .bind(next)
        .bind(paid_at)
        .bind(id)
        .execute(&mut *tx)
        .await?;

    if next == OrderStatus::Cancelled {
        sqlx::query(
            "UPDATE dining_tables SET status = ?1, current_order_id = NULL WHERE id = ?2 AND current_order_id = ?3",
        )
        .bind(TableStatus::Available)
        .bind(&current.table_id)
        .bind(id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {id}")))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::db::repository::dining_table::tests::seed_table;
    use crate::db::repository::product::tests::{sample, seed_category};
    use crate::db::repository::stock_log::StockLogFilter;
    use crate::db::repository::{dining_table, product, stock_log, test_support::test_pool};
    use shared::models::{OrderItemCreate, OrderType, Product};

    pub(crate) async fn seed_products(pool: &SqlitePool) -> (Product, Product) {
        let cat = seed_category(pool).await;
        let a = product::create(pool, sample(&cat)).await.unwrap(); // stock 50
        let mut data = sample(&cat);
        data.name = "Iced Tea".into();
        data.price = 3.0;
        data.cost_price = Some(1.0);
        data.stock = 2;
        let b = product::create(pool, data).await.unwrap();
        (a, b)
    }

    pub(crate) fn order_for(
        table_id: &str,
        order_no: &str,
        items: Vec<(&Product, i32)>,
    ) -> OrderCreate {
        OrderCreate {
            order_no: order_no.to_string(),
            table_id: table_id.to_string(),
            user_id: None,
            items: items
                .into_iter()
                .map(|(p, quantity)| OrderItemCreate {
                    product_id: p.id.clone(),
                    name: p.name.clone(),
                    price: p.price,
                    cost_price: p.cost_price,
                    image: None,
                    unit: p.unit.clone(),
                    quantity,
                })
                .collect(),
            status: OrderStatus::Pending,
            payment_method: None,
            timestamp: shared::util::now_millis(),
            order_type: OrderType::DineIn,
            notes: None,
            operator_id: Some("admin".into()),
        }
    }

    #[tokio::test]
    async fn placement_is_atomic_across_entities() {
        let pool = test_pool().await;
        let table = seed_table(&pool).await;
        let (a, b) = seed_products(&pool).await;

        let order = place(&pool, order_for(&table.id, "ORD-001", vec![(&a, 2), (&b, 1)]))
            .await
            .unwrap();

        assert_eq!(order.items.len(), 2);
        assert!((order.total - (12.5 * 2.0 + 3.0)).abs() < 1e-9);
        assert!((order.total_cost.unwrap() - 9.0).abs() < 1e-9);

        // Table marked SCANNED with the order attached
        let t = dining_table::find_by_id(&pool, &table.id).await.unwrap().unwrap();
        assert_eq!(t.status, TableStatus::Scanned);
        assert_eq!(t.current_order_id.as_deref(), Some(order.id.as_str()));

        // One OUT_SALE log per line item, referencing the order_no
        let logs = stock_log::find_filtered(&pool, StockLogFilter::default())
            .await
            .unwrap();
        assert_eq!(logs.len(), 2);
        assert!(logs.iter().all(|l| l.log_type == StockLogType::OutSale));
        assert!(logs.iter().all(|l| l.reference_no.as_deref() == Some("ORD-001")));

        let a2 = product::find_by_id(&pool, &a.id).await.unwrap().unwrap();
        assert_eq!(a2.stock, 48);
    }

    #[tokio::test]
    async fn insufficient_stock_clamps_at_zero() {
        let pool = test_pool().await;
        let table = seed_table(&pool).await;
        let (_, b) = seed_products(&pool).await; // b has stock 2

        place(&pool, order_for(&table.id, "ORD-002", vec![(&b, 5)]))
            .await
            .unwrap();

        let b2 = product::find_by_id(&pool, &b.id).await.unwrap().unwrap();
        assert_eq!(b2.stock, 0);

        let logs = stock_log::find_filtered(&pool, StockLogFilter::default())
            .await
            .unwrap();
        assert_eq!(logs[0].delta, -2); // applied, not requested
    }

    #[tokio::test]
    async fn member_linked_order_keeps_user_id() {
        let pool = test_pool().await;
        let table = seed_table(&pool).await;
        let (a, _) = seed_products(&pool).await;

        let mut data = order_for(&table.id, "ORD-010", vec![(&a, 1)]);
        data.user_id = Some("member-42".into());
        let order = place(&pool, data).await.unwrap();
        assert_eq!(order.user_id.as_deref(), Some("member-42"));

        let order = find_by_id(&pool, &order.id).await.unwrap().unwrap();
        assert_eq!(order.user_id.as_deref(), Some("member-42"));
    }

    #[tokio::test]
    async fn duplicate_order_no_rejected() {
        let pool = test_pool().await;
        let table = seed_table(&pool).await;
        let (a, _) = seed_products(&pool).await;

        place(&pool, order_for(&table.id, "ORD-003", vec![(&a, 1)]))
            .await
            .unwrap();
        assert!(matches!(
            place(&pool, order_for(&table.id, "ORD-003", vec![(&a, 1)])).await,
            Err(RepoError::Duplicate(_))
        ));
    }

    #[tokio::test]
    async fn illegal_transition_rejected() {
        let pool = test_pool().await;
        let table = seed_table(&pool).await;
        let (a, _) = seed_products(&pool).await;

        let order = place(&pool, order_for(&table.id, "ORD-004", vec![(&a, 1)]))
            .await
            .unwrap();

        let order = set_status(&pool, &order.id, OrderStatus::Completed)
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::Completed);
        assert!(order.paid_at.is_some());

        // COMPLETED -> CANCELLED is not in the legal set
        assert!(matches!(
            set_status(&pool, &order.id, OrderStatus::Cancelled).await,
            Err(RepoError::BusinessRule(_))
        ));
    }

    #[tokio::test]
    async fn cancel_frees_table_without_restock() {
        let pool = test_pool().await;
        let table = seed_table(&pool).await;
        let (a, _) = seed_products(&pool).await;

        let order = place(&pool, order_for(&table.id, "ORD-005", vec![(&a, 3)]))
            .await
            .unwrap();
        set_status(&pool, &order.id, OrderStatus::Cancelled)
            .await
            .unwrap();

        let t = dining_table::find_by_id(&pool, &table.id).await.unwrap().unwrap();
        assert_eq!(t.status, TableStatus::Available);
        assert!(t.current_order_id.is_none());

        // Stock stays deducted
        let a2 = product::find_by_id(&pool, &a.id).await.unwrap().unwrap();
        assert_eq!(a2.stock, 47);
    }

    #[tokio::test]
    async fn empty_order_rejected() {
        let pool = test_pool().await;
        let table = seed_table(&pool).await;
        assert!(matches!(
            place(&pool, order_for(&table.id, "ORD-006", vec![])).await,
            Err(RepoError::Validation(_))
        ));
    }
}
