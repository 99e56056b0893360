//! Product Repository (soft delete)
//!
//! `sales_mode` 在 SQLite 中以逗号连接的 TEXT 存储，
//! 由 [`ProductRow`] 在出入库时拆装。

use super::{RepoError, RepoResult};
use shared::models::{Product, ProductCreate, ProductUpdate};
use sqlx::SqlitePool;

const COLS: &str = "id, name, price, cost_price, category_id, image, stock, min_stock, unit, sales_mode, is_on_shelf, supplier_id, barcode, description";

/// Raw row shape; `sales_mode` is the comma-joined TEXT column
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: String,
    name: String,
    price: f64,
    cost_price: Option<f64>,
    category_id: String,
    image: Option<String>,
    stock: i32,
    min_stock: Option<i32>,
    unit: String,
    sales_mode: Option<String>,
    is_on_shelf: bool,
    supplier_id: Option<String>,
    barcode: Option<String>,
    description: Option<String>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        let sales_mode = row
            .sales_mode
            .filter(|s| !s.is_empty())
            .map(|s| s.split(',').map(str::to_string).collect());
        Product {
            id: row.id,
            name: row.name,
            price: row.price,
            cost_price: row.cost_price,
            category_id: row.category_id,
            image: row.image,
            stock: row.stock,
            min_stock: row.min_stock,
            unit: row.unit,
            sales_mode,
            is_on_shelf: row.is_on_shelf,
            supplier_id: row.supplier_id,
            barcode: row.barcode,
            description: row.description,
        }
    }
}

fn join_sales_mode(modes: &Option<Vec<String>>) -> Option<String> {
    modes
        .as_ref()
        .filter(|m| !m.is_empty())
        .map(|m| m.join(","))
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Product>> {
    let rows = sqlx::query_as::<_, ProductRow>(&format!(
        "SELECT {COLS} FROM products WHERE is_deleted = 0 ORDER BY name"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(Product::from).collect())
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<Product>> {
    let row = sqlx::query_as::<_, ProductRow>(&format!(
        "SELECT {COLS} FROM products WHERE id = ? AND is_deleted = 0"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(Product::from))
}

pub async fn create(pool: &SqlitePool, data: ProductCreate) -> RepoResult<Product> {
    if data.price < 0.0 {
        return Err(RepoError::Validation("price must be >= 0".into()));
    }
    if data.stock < 0 {
        return Err(RepoError::Validation("stock must be >= 0".into()));
    }
    if super::category::find_by_id(pool, &data.category_id).await?.is_none() {
        return Err(RepoError::NotFound(format!(
            "Category {}",
            data.category_id
        )));
    }

    let id = shared::util::new_id();
    let now = chrono::Utc::now().to_rfc3339();

    sqlx::query(
        "INSERT INTO products (id, name, price, cost_price, category_id, image, stock, min_stock, unit, sales_mode, is_on_shelf, supplier_id, barcode, description, is_deleted, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, 0, ?15)",
    )
    .bind(&id)
    .bind(&data.name)
    .bind(data.price)
    .bind(data.cost_price)
    .bind(&data.category_id)
    .bind(&data.image)
    .bind(data.stock)
    .bind(data.min_stock)
    .bind(&data.unit)
    .bind(join_sales_mode(&data.sales_mode))
    .bind(data.is_on_shelf)
    .bind(&data.supplier_id)
    .bind(&data.barcode)
    .bind(&data.description)
    .bind(&now)
    .execute(pool)
    .await?;

    find_by_id(pool, &id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create product".into()))
}

pub async fn update(pool: &SqlitePool, id: &str, data: ProductUpdate) -> RepoResult<Product> {
    if let Some(price) = data.price
        && price < 0.0
    {
        return Err(RepoError::Validation("price must be >= 0".into()));
    }
    if let Some(category_id) = &data.category_id
        && super::category::find_by_id(pool, category_id).await?.is_none()
    {
        return Err(RepoError::NotFound(format!("Category {category_id}")));
    }

    let result = sqlx::query(
        "UPDATE products SET name = COALESCE(?1, name), price = COALESCE(?2, price), cost_price = COALESCE(?3, cost_price), category_id = COALESCE(?4, category_id), image = COALESCE(?5, image), min_stock = COALESCE(?6, min_stock), unit = COALESCE(?7, unit), sales_mode = COALESCE(?8, sales_mode), is_on_shelf = COALESCE(?9, is_on_shelf), supplier_id = COALESCE(?10, supplier_id), barcode = COALESCE(?11, barcode), description = COALESCE(?12, description) WHERE id = ?13 AND is_deleted = 0",
    )
    .bind(&data.name)
    .bind(data.price)
    .bind(data.cost_price)
    .bind(&data.category_id)
    .bind(&data.image)
    .bind(data.min_stock)
    .bind(&data.unit)
    .bind(join_sales_mode(&data.sales_mode))
    .bind(data.is_on_shelf)
    .bind(&data.supplier_id)
    .bind(&data.barcode)
    .bind(&data.description)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id}")));
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product {id}")))
}

/// 库存不高于预警线的商品 (GET /api/inventory/low-stock)
pub async fn find_low_stock(pool: &SqlitePool) -> RepoResult<Vec<Product>> {
    let rows = sqlx::query_as::<_, ProductRow>(&format!(
        "SELECT {COLS} FROM products WHERE is_deleted = 0 AND min_stock IS NOT NULL AND stock <= min_stock ORDER BY stock"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(Product::from).collect())
}

/// 软删除：库存流水与订单快照仍引用商品，行永不物理删除
pub async fn delete(pool: &SqlitePool, id: &str) -> RepoResult<()> {
    let result = sqlx::query("UPDATE products SET is_deleted = 1 WHERE id = ? AND is_deleted = 0")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id}")));
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::db::repository::{category, test_support::test_pool};
    use shared::models::CategoryCreate;

    pub(crate) async fn seed_category(pool: &SqlitePool) -> String {
        category::create(
            pool,
            CategoryCreate {
                name: "Mains".into(),
                icon: None,
                sort_order: None,
            },
        )
        .await
        .unwrap()
        .id
    }

    pub(crate) fn sample(category_id: &str) -> ProductCreate {
        ProductCreate {
            name: "Fried Rice".into(),
            price: 12.5,
            category_id: category_id.to_string(),
            stock: 50,
            unit: "份".into(),
            image: None,
            cost_price: Some(4.0),
            min_stock: Some(10),
            sales_mode: Some(vec!["dine-in".into(), "takeout".into()]),
            is_on_shelf: true,
            supplier_id: None,
            barcode: None,
            description: None,
        }
    }

    #[tokio::test]
    async fn sales_mode_round_trips_through_text_column() {
        let pool = test_pool().await;
        let cat = seed_category(&pool).await;
        let p = create(&pool, sample(&cat)).await.unwrap();
        assert_eq!(
            p.sales_mode,
            Some(vec!["dine-in".to_string(), "takeout".to_string()])
        );

        let found = find_by_id(&pool, &p.id).await.unwrap().unwrap();
        assert_eq!(found.sales_mode, p.sales_mode);
    }

    #[tokio::test]
    async fn create_rejects_unknown_category() {
        let pool = test_pool().await;
        assert!(matches!(
            create(&pool, sample("missing")).await,
            Err(RepoError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn negative_price_rejected() {
        let pool = test_pool().await;
        let cat = seed_category(&pool).await;
        let mut data = sample(&cat);
        data.price = -1.0;
        assert!(matches!(
            create(&pool, data).await,
            Err(RepoError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn soft_delete_hides_product() {
        let pool = test_pool().await;
        let cat = seed_category(&pool).await;
        let p = create(&pool, sample(&cat)).await.unwrap();
        delete(&pool, &p.id).await.unwrap();
        assert!(find_by_id(&pool, &p.id).await.unwrap().is_none());
    }
}
