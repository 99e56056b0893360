//! Authentication Module
//!
//! JWT + Argon2 认证体系：
//! - [`JwtService`] 签发/验证访问令牌与刷新令牌
//! - [`RevokedTokens`] 进程内注销黑名单 (logout)
//! - [`require_auth`] Axum 中间件
//! - [`permissions_for_role`] 角色 → 权限映射

pub mod extractor;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod permissions;

pub use extractor::CurrentUser;
pub use jwt::{Claims, JwtConfig, JwtError, JwtService, TOKEN_TYPE_ACCESS, TOKEN_TYPE_REFRESH};
pub use middleware::require_auth;
pub use password::{hash_password, verify_password};
pub use permissions::permissions_for_role;

use dashmap::DashSet;

/// 已注销令牌集合
///
/// JWT 本身无状态，logout 通过进程内黑名单使令牌立即失效。
/// 条目随进程重启消失，与令牌的自然过期时间一致即可。
#[derive(Debug, Default)]
pub struct RevokedTokens {
    tokens: DashSet<String>,
}

impl RevokedTokens {
    pub fn new() -> Self {
        Self {
            tokens: DashSet::new(),
        }
    }

    /// 注销一个令牌，返回是否为首次注销
    pub fn revoke(&self, token: &str) -> bool {
        self.tokens.insert(token.to_string())
    }

    pub fn is_revoked(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }
}
