//! Supplier Repository (soft delete)

use super::{RepoError, RepoResult};
use shared::models::{Supplier, SupplierCreate, SupplierUpdate};
use sqlx::SqlitePool;

const COLS: &str = "id, name, contact_name, phone, email, address, notes";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Supplier>> {
    let rows = sqlx::query_as::<_, Supplier>(&format!(
        "SELECT {COLS} FROM suppliers WHERE is_deleted = 0 ORDER BY name"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<Supplier>> {
    let row = sqlx::query_as::<_, Supplier>(&format!(
        "SELECT {COLS} FROM suppliers WHERE id = ? AND is_deleted = 0"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: SupplierCreate) -> RepoResult<Supplier> {
    let id = shared::util::new_id();
    let now = chrono::Utc::now().to_rfc3339();

    sqlx::query(
        "INSERT INTO suppliers (id, name, contact_name, phone, email, address, notes, is_deleted, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, ?8)",
    )
    .bind(&id)
    .bind(&data.name)
    .bind(&data.contact_name)
    .bind(&data.phone)
    .bind(&data.email)
    .bind(&data.address)
    .bind(&data.notes)
    .bind(&now)
    .execute(pool)
    .await?;

    find_by_id(pool, &id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create supplier".into()))
}

pub async fn update(pool: &SqlitePool, id: &str, data: SupplierUpdate) -> RepoResult<Supplier> {
    let result = sqlx::query(
        "UPDATE suppliers SET name = COALESCE(?1, name), contact_name = COALESCE(?2, contact_name), phone = COALESCE(?3, phone), email = COALESCE(?4, email), address = COALESCE(?5, address), notes = COALESCE(?6, notes) WHERE id = ?7 AND is_deleted = 0",
    )
    .bind(&data.name)
    .bind(&data.contact_name)
    .bind(&data.phone)
    .bind(&data.email)
    .bind(&data.address)
    .bind(&data.notes)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Supplier {id}")));
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Supplier {id}")))
}

/// 软删除：历史库存流水仍引用供应商，行永不物理删除
pub async fn delete(pool: &SqlitePool, id: &str) -> RepoResult<()> {
    let result = sqlx::query("UPDATE suppliers SET is_deleted = 1 WHERE id = ? AND is_deleted = 0")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Supplier {id}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::test_pool;

    fn sample() -> SupplierCreate {
        SupplierCreate {
            name: "Fresh Foods".into(),
            contact_name: "Li Wei".into(),
            phone: "13800000000".into(),
            email: None,
            address: None,
            notes: None,
        }
    }

    #[tokio::test]
    async fn soft_delete_hides_from_list() {
        let pool = test_pool().await;
        let s = create(&pool, sample()).await.unwrap();

        delete(&pool, &s.id).await.unwrap();
        assert!(find_by_id(&pool, &s.id).await.unwrap().is_none());
        assert!(find_all(&pool).await.unwrap().is_empty());

        // Deleting twice is NotFound
        assert!(matches!(
            delete(&pool, &s.id).await,
            Err(RepoError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn update_contact() {
        let pool = test_pool().await;
        let s = create(&pool, sample()).await.unwrap();
        let updated = update(
            &pool,
            &s.id,
            SupplierUpdate {
                contact_name: Some("Zhang San".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.contact_name, "Zhang San");
        assert_eq!(updated.phone, "13800000000");
    }
}
