//! Member Repository (会员，soft delete)

use super::{RepoError, RepoResult};
use shared::models::{Member, MemberCreate, MemberUpdate};
use sqlx::SqlitePool;

const COLS: &str =
    "id, name, phone, member_type, balance, points, level, join_date, avatar, birthday, gender";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Member>> {
    let rows = sqlx::query_as::<_, Member>(&format!(
        "SELECT {COLS} FROM members WHERE is_deleted = 0 ORDER BY join_date DESC"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> RepoResult<Option<Member>> {
    let row = sqlx::query_as::<_, Member>(&format!(
        "SELECT {COLS} FROM members WHERE id = ? AND is_deleted = 0"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: MemberCreate) -> RepoResult<Member> {
    if data.balance < 0.0 {
        return Err(RepoError::Validation("balance must be >= 0".into()));
    }

    let id = shared::util::new_id();
    let now = chrono::Utc::now().to_rfc3339();

    let result = sqlx::query(
        "INSERT INTO members (id, name, phone, member_type, balance, points, level, join_date, avatar, birthday, gender, is_deleted, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, 0, ?12)",
    )
    .bind(&id)
    .bind(&data.name)
    .bind(&data.phone)
    .bind(data.member_type)
    .bind(data.balance)
    .bind(data.points)
    .bind(data.level)
    .bind(&data.join_date)
    .bind(&data.avatar)
    .bind(&data.birthday)
    .bind(&data.gender)
    .bind(&now)
    .execute(pool)
    .await;

    match result {
        Ok(_) => {}
        Err(e) => {
            return Err(match RepoError::from(e) {
                RepoError::Duplicate(_) => {
                    RepoError::Duplicate(format!("Phone already registered: {}", data.phone))
                }
                other => other,
            });
        }
    }

    find_by_id(pool, &id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create member".into()))
}

pub async fn update(pool: &SqlitePool, id: &str, data: MemberUpdate) -> RepoResult<Member> {
    let result = sqlx::query(
        "UPDATE members SET name = COALESCE(?1, name), phone = COALESCE(?2, phone), member_type = COALESCE(?3, member_type), level = COALESCE(?4, level), avatar = COALESCE(?5, avatar), birthday = COALESCE(?6, birthday), gender = COALESCE(?7, gender) WHERE id = ?8 AND is_deleted = 0",
    )
    .bind(&data.name)
    .bind(&data.phone)
    .bind(data.member_type)
    .bind(data.level)
    .bind(&data.avatar)
    .bind(&data.birthday)
    .bind(&data.gender)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Member {id}")));
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Member {id}")))
}

pub async fn delete(pool: &SqlitePool, id: &str) -> RepoResult<()> {
    let result = sqlx::query("UPDATE members SET is_deleted = 1 WHERE id = ? AND is_deleted = 0")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Member {id}")));
    }
    Ok(())
}

/// 余额充值 (POST /api/users/{id}/balance)
pub async fn add_balance(pool: &SqlitePool, id: &str, amount: f64) -> RepoResult<Member> {
    if amount <= 0.0 {
        return Err(RepoError::Validation("amount must be positive".into()));
    }

    let result = sqlx::query(
        "UPDATE members SET balance = balance + ?1 WHERE id = ?2 AND is_deleted = 0",
    )
    .bind(amount)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Member {id}")));
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Member {id}")))
}

/// 积分发放 (POST /api/users/{id}/points)
pub async fn add_points(pool: &SqlitePool, id: &str, points: i32) -> RepoResult<Member> {
    if points <= 0 {
        return Err(RepoError::Validation("points must be positive".into()));
    }

    let result = sqlx::query(
        "UPDATE members SET points = points + ?1 WHERE id = ?2 AND is_deleted = 0",
    )
    .bind(points)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Member {id}")));
    }

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Member {id}")))
}
