//! System User Repository (后台操作员账号)

use super::{RepoError, RepoResult};
use shared::models::{SystemUser, UserRole};
use sqlx::SqlitePool;

const COLS: &str = "id, username, password_hash, name, phone, role, avatar, is_active, last_login";

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> RepoResult<Option<SystemUser>> {
    let row = sqlx::query_as::<_, SystemUser>(&format!(
        "SELECT {COLS} FROM system_users WHERE username = ?"
    ))
    .bind(username)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<SystemUser>> {
    let row = sqlx::query_as::<_, SystemUser>(&format!(
        "SELECT {COLS} FROM system_users WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn create(
    pool: &SqlitePool,
    username: &str,
    password_hash: &str,
    name: &str,
    phone: Option<&str>,
    role: UserRole,
) -> RepoResult<SystemUser> {
    if find_by_username(pool, username).await?.is_some() {
        return Err(RepoError::Duplicate(format!(
            "Username already taken: {username}"
        )));
    }

    let id = shared::util::new_id();
    let now = chrono::Utc::now().to_rfc3339();

    sqlx::query(
        "INSERT INTO system_users (id, username, password_hash, name, phone, role, is_active, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7)",
    )
    .bind(&id)
    .bind(username)
    .bind(password_hash)
    .bind(name)
    .bind(phone)
    .bind(role)
    .bind(&now)
    .execute(pool)
    .await?;

    find_by_id(pool, &id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}

pub async fn update_password(pool: &SqlitePool, id: &str, password_hash: &str) -> RepoResult<()> {
    let result = sqlx::query("UPDATE system_users SET password_hash = ?1 WHERE id = ?2")
        .bind(password_hash)
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {id}")));
    }
    Ok(())
}

pub async fn touch_last_login(pool: &SqlitePool, id: &str) -> RepoResult<()> {
    let now = chrono::Utc::now().to_rfc3339();
    sqlx::query("UPDATE system_users SET last_login = ?1 WHERE id = ?2")
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::test_support::test_pool;

    #[tokio::test]
    async fn create_then_find_by_username() {
        let pool = test_pool().await;
        let u = create(&pool, "cashier1", "hash", "Cashier One", None, UserRole::Cashier)
            .await
            .unwrap();
        assert!(u.is_active);
        assert_eq!(u.role, UserRole::Cashier);

        let found = find_by_username(&pool, "cashier1").await.unwrap().unwrap();
        assert_eq!(found.id, u.id);
    }

    #[tokio::test]
    async fn duplicate_username_rejected() {
        let pool = test_pool().await;
        create(&pool, "dup", "hash", "First", None, UserRole::Staff)
            .await
            .unwrap();
        assert!(matches!(
            create(&pool, "dup", "hash", "Second", None, UserRole::Staff).await,
            Err(RepoError::Duplicate(_))
        ));
    }

    #[tokio::test]
    async fn password_update_rewrites_hash() {
        let pool = test_pool().await;
        let u = create(&pool, "u1", "old-hash", "U1", None, UserRole::Staff)
            .await
            .unwrap();
        update_password(&pool, &u.id, "new-hash").await.unwrap();
        let found = find_by_id(&pool, &u.id).await.unwrap().unwrap();
        assert_eq!(found.password_hash, "new-hash");
    }
}
