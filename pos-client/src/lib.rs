//! POS 后台客户端
//!
//! 面向桌面端/集成测试的类型化 API 客户端：
//! - [`PosClient`]：按资源分组的 HTTP API 封装
//! - [`TokenStore`]：令牌存取与 401 广播
//! - [`Store`]：带乐观更新的本地数据镜像
//!
//! ```no_run
//! use pos_client::{ClientConfig, PosClient};
//!
//! # async fn run() -> Result<(), pos_client::ClientError> {
//! let client = PosClient::new(ClientConfig::new("http://localhost:8000"))?;
//! client.auth().login("admin", "admin123").await?;
//! let products = client.products().list().await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod store;
pub mod token;

pub use client::PosClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use store::{Action, Store, StoreState};
pub use token::{AuthEvent, TokenStore};
