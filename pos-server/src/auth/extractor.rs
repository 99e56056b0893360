//! CurrentUser extractor
//!
//! `require_auth` 中间件验证令牌后把 [`CurrentUser`] 注入请求扩展，
//! handler 通过参数直接提取。

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use shared::models::UserRole;

use crate::AppError;
use crate::auth::Claims;

/// 当前登录用户 (来自已验证的访问令牌)
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub username: String,
    pub name: String,
    pub role: UserRole,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            username: claims.username,
            name: claims.name,
            role: claims.role,
        }
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}
