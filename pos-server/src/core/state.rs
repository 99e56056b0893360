use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::{JwtService, RevokedTokens};
use crate::core::Config;
use crate::db::DbService;
use crate::utils::AppResult;

/// 服务器状态 - 持有所有服务的单例引用
///
/// ServerState 是后台服务的核心数据结构，持有所有服务的共享引用。
/// 使用 Arc 实现浅拷贝，所有权成本极低。
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | db | SQLite 连接池 |
/// | jwt_service | JWT 认证服务 |
/// | revoked_tokens | 已注销令牌集合 (logout) |
/// | http | 出站 HTTP 客户端 (AI 代理) |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 数据库服务
    pub db: DbService,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
    /// 已注销的令牌 (进程内黑名单)
    pub revoked_tokens: Arc<RevokedTokens>,
    /// 出站 HTTP 客户端 (AI 代理用)
    pub http: reqwest::Client,
}

impl ServerState {
    /// 初始化服务器状态：打开数据库、跑迁移、播种默认管理员
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        let db = DbService::new(&config.database_path).await?;
        db.seed_default_admin().await?;

        let jwt_service = Arc::new(JwtService::new(config.jwt.clone()));
        let revoked_tokens = Arc::new(RevokedTokens::new());

        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| crate::AppError::internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            config: config.clone(),
            db,
            jwt_service,
            revoked_tokens,
            http,
        })
    }

    /// 获取数据库连接池
    pub fn pool(&self) -> &SqlitePool {
        &self.db.pool
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }
}
