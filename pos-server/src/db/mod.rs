//! Database Module
//!
//! Handles SQLite connection pool, migrations and the default admin seed

pub mod repository;

use crate::auth::hash_password;
use crate::utils::AppError;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::str::FromStr;

/// Embedded migrations (also used by integration tests)
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Database service — owns a SQLite connection pool
#[derive(Clone, Debug)]
pub struct DbService {
    pub pool: SqlitePool,
}

impl DbService {
    /// Create a new database service with WAL mode and run migrations
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        // Build connection options: WAL, foreign keys, normal sync
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{db_path}"))
            .map_err(|e| AppError::database(format!("Invalid database path: {e}")))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .pragma("foreign_keys", "ON")
            .optimize_on_close(true, None);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        // busy_timeout: 写冲突时等待 5s 而非立即失败
        sqlx::query("PRAGMA busy_timeout = 5000;")
            .execute(&pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to set busy_timeout: {e}")))?;

        tracing::info!("Database connection established (SQLite WAL, busy_timeout=5000ms)");

        MIGRATOR
            .run(&pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to apply migrations: {e}")))?;
        tracing::info!("Database migrations applied");

        Ok(Self { pool })
    }

    /// 播种默认管理员账号 (admin / admin123)，已存在时跳过
    pub async fn seed_default_admin(&self) -> Result<(), AppError> {
        let existing: Option<(String,)> =
            sqlx::query_as("SELECT id FROM system_users WHERE username = 'admin'")
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| AppError::database(e.to_string()))?;

        if existing.is_some() {
            return Ok(());
        }

        let hash = hash_password("admin123")
            .map_err(|e| AppError::internal(format!("Failed to hash admin password: {e}")))?;
        let now = chrono::Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT OR IGNORE INTO system_users (id, username, password_hash, name, role, is_active, created_at) VALUES (?1, 'admin', ?2, 'Administrator', 'admin', 1, ?3)",
        )
        .bind(shared::util::new_id())
        .bind(hash)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(e.to_string()))?;

        tracing::info!("Seeded default admin account");
        Ok(())
    }
}
