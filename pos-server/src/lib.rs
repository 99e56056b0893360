//! POS Back-Office Server - 餐厅后台管理服务
//!
//! # 架构概述
//!
//! - **认证** (`auth`): JWT + Argon2 认证体系
//! - **数据库** (`db`): 嵌入式 SQLite (sqlx, WAL)
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! pos-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证、权限
//! ├── api/           # HTTP 路由和处理器
//! ├── db/            # 数据库层 (仓储)
//! └── utils/         # 错误、日志
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult, ErrorBody};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
