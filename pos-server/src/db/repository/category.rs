//! Category Repository

use super::{RepoError, RepoResult};
use shared::models::{Category, CategoryCreate, CategoryUpdate};
use sqlx::SqlitePool;

const COLS: &str = "id, name, icon, sort_order, is_active";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Category>> {
    let rows = sqlx::query_as::<_, Category>(&format!(
        "SELECT {COLS} FROM categories ORDER BY sort_order, name"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<Category>> {
    let row = sqlx::query_as::<_, Category>(&format!("SELECT {COLS} FROM categories WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: CategoryCreate) -> RepoResult<Category> {
    let id = shared::util::new_id();
    let now = chrono::Utc::now().to_rfc3339();

    sqlx::query(
        "INSERT INTO categories (id, name, icon, sort_order, is_active, created_at) VALUES (?1, ?2, ?3, ?4, 1, ?5)",
    )
    .bind(&id)
    .bind(&data.name)
    .bind(&data.icon)
    .bind(data.sort_order.unwrap_or(0))
    .bind(&now)
    .execute(pool)
    .await?;

    find_by_id(pool, &id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create category".into()))
}

pub async fn update(pool: &SqlitePool, id: &str, data: CategoryUpdate) -> RepoResult<Category> {
    let result = sqlx::query(
        "UPDATE categories SET name = COALESCE(?1, name), icon = COALESCE(?2, icon), sort_order = COALESCE(?3, sort_order), is_active = COALESCE(?4, is_active) WHERE id = ?5",
    )
    .bind(&data.name)
    .bind(&data.icon)
    .bind(data.sort_order)
    .bind(data.is_active)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Category {id}")));
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Category {id}")))
}

pub async fn delete(pool: &SqlitePool, id: &str) -> RepoResult<()> {
    // 仍被在售商品引用的分类不可删除
    let (in_use,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM products WHERE category_id = ? AND is_deleted = 0",
    )
    .bind(id)
    .fetch_one(pool)
    .await?;

    if in_use > 0 {
        return Err(RepoError::BusinessRule(format!(
            "Category is still referenced by {in_use} product(s)"
        )));
    }

    let result = sqlx::query("DELETE FROM categories WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Category {id}")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::test_pool;

    #[tokio::test]
    async fn create_and_list_sorted() {
        let pool = test_pool().await;
        create(
            &pool,
            CategoryCreate {
                name: "Drinks".into(),
                icon: None,
                sort_order: Some(2),
            },
        )
        .await
        .unwrap();
        create(
            &pool,
            CategoryCreate {
                name: "Mains".into(),
                icon: Some("🍜".into()),
                sort_order: Some(1),
            },
        )
        .await
        .unwrap();

        let all = find_all(&pool).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "Mains");
        assert!(all[0].is_active);
    }

    #[tokio::test]
    async fn update_partial_fields() {
        let pool = test_pool().await;
        let cat = create(
            &pool,
            CategoryCreate {
                name: "Drinks".into(),
                icon: None,
                sort_order: None,
            },
        )
        .await
        .unwrap();

        let updated = update(
            &pool,
            &cat.id,
            CategoryUpdate {
                name: Some("Beverages".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.name, "Beverages");
        assert_eq!(updated.sort_order, 0);
    }

    #[tokio::test]
    async fn delete_missing_is_not_found() {
        let pool = test_pool().await;
        assert!(matches!(
            delete(&pool, "nope").await,
            Err(RepoError::NotFound(_))
        ));
    }
}
