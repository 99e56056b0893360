//! Dining Table Repository

use super::{RepoError, RepoResult};
use shared::models::{DiningTable, DiningTableCreate, DiningTableUpdate, TableStatus};
use sqlx::SqlitePool;

const COLS: &str = "id, name, status, capacity, area, current_order_id, sort_order";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<DiningTable>> {
    let rows = sqlx::query_as::<_, DiningTable>(&format!(
        "SELECT {COLS} FROM dining_tables ORDER BY sort_order, name"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<DiningTable>> {
    let row = sqlx::query_as::<_, DiningTable>(&format!(
        "SELECT {COLS} FROM dining_tables WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: DiningTableCreate) -> RepoResult<DiningTable> {
    if data.capacity <= 0 {
        return Err(RepoError::Validation("capacity must be positive".into()));
    }

    let id = shared::util::new_id();
    let now = chrono::Utc::now().to_rfc3339();

    sqlx::query(
        "INSERT INTO dining_tables (id, name, status, capacity, area, sort_order, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .bind(&id)
    .bind(&data.name)
    .bind(data.status.unwrap_or(TableStatus::Available))
    .bind(data.capacity)
    .bind(&data.area)
    .bind(data.sort_order.unwrap_or(0))
    .bind(&now)
    .execute(pool)
    .await?;

    find_by_id(pool, &id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create table".into()))
}

pub async fn update(pool: &SqlitePool, id: &str, data: DiningTableUpdate) -> RepoResult<DiningTable> {
    if let Some(capacity) = data.capacity
        && capacity <= 0
    {
        return Err(RepoError::Validation("capacity must be positive".into()));
    }

    let result = sqlx::query(
        "UPDATE dining_tables SET name = COALESCE(?1, name), capacity = COALESCE(?2, capacity), area = COALESCE(?3, area), current_order_id = COALESCE(?4, current_order_id), sort_order = COALESCE(?5, sort_order) WHERE id = ?6",
    )
    .bind(&data.name)
    .bind(data.capacity)
    .bind(&data.area)
    .bind(&data.current_order_id)
    .bind(data.sort_order)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Table {id}")));
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Table {id}")))
}

/// 状态流转 (PATCH /api/tables/{id}/status)
///
/// 回到 AVAILABLE 时一并清掉 current_order_id。
pub async fn set_status(
    pool: &SqlitePool,
    id: &str,
    status: TableStatus,
) -> RepoResult<DiningTable> {
    let result = if status == TableStatus::Available {
        sqlx::query("UPDATE dining_tables SET status = ?1, current_order_id = NULL WHERE id = ?2")
            .bind(status)
            .bind(id)
            .execute(pool)
            .await?
    } else {
        sqlx::query("UPDATE dining_tables SET status = ?1 WHERE id = ?2")
            .bind(status)
            .bind(id)
            .execute(pool)
            .await?
    };

    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Table {id}")));
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Table {id}")))
}

pub async fn delete(pool: &SqlitePool, id: &str) -> RepoResult<()> {
    let table = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Table {id}")))?;

    // 占用中的桌台不可删除
    if table.status != TableStatus::Available {
        return Err(RepoError::BusinessRule(format!(
            "Table {} is {}, clear it first",
            table.name,
            table.status.as_str()
        )));
    }

    sqlx::query("DELETE FROM dining_tables WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
