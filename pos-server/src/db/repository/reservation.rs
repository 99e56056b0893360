//! Reservation Repository

use super::{RepoError, RepoResult};
use shared::models::{Reservation, ReservationCreate, ReservationStatus, ReservationUpdate};
use sqlx::SqlitePool;

const COLS: &str =
    "id, table_id, customer_name, customer_phone, reservation_time, guests, status, notes, source";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Reservation>> {
    let rows = sqlx::query_as::<_, Reservation>(&format!(
        "SELECT {COLS} FROM reservations ORDER BY reservation_time"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<Reservation>> {
    let row = sqlx::query_as::<_, Reservation>(&format!(
        "SELECT {COLS} FROM reservations WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: ReservationCreate) -> RepoResult<Reservation> {
    if data.guests <= 0 {
        return Err(RepoError::Validation("guests must be positive".into()));
    }
    if super::dining_table::find_by_id(pool, &data.table_id).await?.is_none() {
        return Err(RepoError::NotFound(format!("Table {}", data.table_id)));
    }

    let id = shared::util::new_id();
    let now = chrono::Utc::now().to_rfc3339();

    sqlx::query(
        "INSERT INTO reservations (id, table_id, customer_name, customer_phone, reservation_time, guests, status, notes, source, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
    )
    .bind(&id)
    .bind(&data.table_id)
    .bind(&data.customer_name)
    .bind(&data.customer_phone)
    .bind(&data.reservation_time)
    .bind(data.guests)
    .bind(data.status)
    .bind(&data.notes)
    .bind(&data.source)
    .bind(&now)
    .execute(pool)
    .await?;

    find_by_id(pool, &id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create reservation".into()))
}

pub async fn update(pool: &SqlitePool, id: &str, data: ReservationUpdate) -> RepoResult<Reservation> {
    if let Some(guests) = data.guests
        && guests <= 0
    {
        return Err(RepoError::Validation("guests must be positive".into()));
    }
    if let Some(table_id) = &data.table_id
        && super::dining_table::find_by_id(pool, table_id).await?.is_none()
    {
        return Err(RepoError::NotFound(format!("Table {table_id}")));
    }

    let result = sqlx::query(
        "UPDATE reservations SET table_id = COALESCE(?1, table_id), customer_name = COALESCE(?2, customer_name), customer_phone = COALESCE(?3, customer_phone), reservation_time = COALESCE(?4, reservation_time), guests = COALESCE(?5, guests), status = COALESCE(?6, status), notes = COALESCE(?7, notes) WHERE id = ?8",
    )
    .bind(&data.table_id)
    .bind(&data.customer_name)
    .bind(&data.customer_phone)
    .bind(&data.reservation_time)
    .bind(data.guests)
    .bind(data.status)
    .bind(&data.notes)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Reservation {id}")));
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Reservation {id}")))
}

/// 取消预订。已到店或已取消的预订不可再取消。
pub async fn cancel(pool: &SqlitePool, id: &str) -> RepoResult<Reservation> {
    transition(pool, id, ReservationStatus::Cancelled).await
}

/// 标记到店。已到店或已取消的预订不可标记。
pub async fn arrive(pool: &SqlitePool, id: &str) -> RepoResult<Reservation> {
    transition(pool, id, ReservationStatus::Arrived).await
}

async fn transition(
    pool: &SqlitePool,
    id: &str,
    next: ReservationStatus,
) -> RepoResult<Reservation> {
    let current = find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Reservation {id}")))?;

    // ARRIVED 和 CANCELLED 是终态
    if matches!(
        current.status,
        ReservationStatus::Arrived | ReservationStatus::Cancelled
    ) {
        return Err(RepoError::BusinessRule(format!(
            "Reservation {id} is already settled"
        )));
    }

    sqlx::query("UPDATE reservations SET status = ?1 WHERE id = ?2")
        .bind(next)
        .bind(id)
        .execute(pool)
        .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Reservation {id}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::dining_table::tests::seed_table;
    use crate::db::repository::test_support::test_pool;

    fn sample(table_id: &str) -> ReservationCreate {
        ReservationCreate {
            table_id: table_id.to_string(),
            customer_name: "Bob".into(),
            customer_phone: "13700000000".into(),
            reservation_time: "2026-09-01T19:00:00Z".into(),
            guests: 4,
            status: ReservationStatus::Pending,
            notes: None,
            source: Some("phone".into()),
        }
    }

    #[tokio::test]
    async fn cancel_then_arrive_is_rejected() {
        let pool = test_pool().await;
        let table = seed_table(&pool).await;
        let r = create(&pool, sample(&table.id)).await.unwrap();

        let r = cancel(&pool, &r.id).await.unwrap();
        assert_eq!(r.status, ReservationStatus::Cancelled);

        assert!(matches!(
            arrive(&pool, &r.id).await,
            Err(RepoError::BusinessRule(_))
        ));
    }

    #[tokio::test]
    async fn arrive_marks_reservation() {
        let pool = test_pool().await;
        let table = seed_table(&pool).await;
        let r = create(&pool, sample(&table.id)).await.unwrap();
        let r = arrive(&pool, &r.id).await.unwrap();
        assert_eq!(r.status, ReservationStatus::Arrived);
    }

    #[tokio::test]
    async fn unknown_table_rejected() {
        let pool = test_pool().await;
        assert!(matches!(
            create(&pool, sample("missing")).await,
            Err(RepoError::NotFound(_))
        ));
    }
}
