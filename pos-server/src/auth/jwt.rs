//! JWT 令牌服务
//!
//! 处理 JWT 令牌的生成、验证和解析。访问令牌与刷新令牌共用一个密钥，
//! 通过 `token_type` 声明区分。

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use shared::models::UserRole;
use thiserror::Error;

pub const TOKEN_TYPE_ACCESS: &str = "access";
pub const TOKEN_TYPE_REFRESH: &str = "refresh";

/// JWT 配置
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// JWT 密钥 (应至少 32 字节)
    pub secret: String,
    /// 访问令牌过期时间 (分钟)
    pub access_expiration_minutes: i64,
    /// 刷新令牌过期时间 (天)
    pub refresh_expiration_days: i64,
    /// 令牌签发者
    pub issuer: String,
    /// 令牌受众
    pub audience: String,
}

impl JwtConfig {
    /// 从环境变量加载，JWT_SECRET 未设置时生成随机密钥
    /// (重启后旧令牌失效，开发环境可接受)
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| {
                tracing::warn!("JWT_SECRET not set, generating a random secret");
                generate_printable_secret()
            });

        Self {
            secret,
            access_expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1440), // 默认 24 小时
            refresh_expiration_days: std::env::var("JWT_REFRESH_EXPIRATION_DAYS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(7),
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "pos-server".to_string()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "pos-dashboard".to_string()),
        }
    }
}

/// 存储在令牌中的 JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 用户 ID (Subject)
    pub sub: String,
    /// 用户名
    pub username: String,
    /// 显示名
    pub name: String,
    /// 角色
    pub role: UserRole,
    /// 令牌类型: access | refresh
    pub token_type: String,
    /// 过期时间戳
    pub exp: i64,
    /// 签发时间戳
    pub iat: i64,
    /// 签发者
    pub iss: String,
    /// 受众
    pub aud: String,
}

/// JWT 错误
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    ExpiredToken,

    #[error("Wrong token type: expected {expected}, got {got}")]
    WrongTokenType { expected: String, got: String },

    #[error("Token generation failed: {0}")]
    GenerationFailed(String),
}

/// 生成可打印的随机密钥 (用于未配置 JWT_SECRET 的开发环境)
fn generate_printable_secret() -> String {
    use rand::Rng;
    let allowed: &[u8] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*-_=+";
    let mut rng = rand::thread_rng();
    (0..64)
        .map(|_| allowed[rng.gen_range(0..allowed.len())] as char)
        .collect()
}

/// JWT 令牌服务
#[derive(Debug, Clone)]
pub struct JwtService {
    config: JwtConfig,
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        Self { config }
    }

    /// 从 `Authorization: Bearer <token>` 头提取令牌
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ").map(str::trim)
    }

    /// 签发访问令牌
    pub fn generate_access_token(
        &self,
        user_id: &str,
        username: &str,
        name: &str,
        role: UserRole,
    ) -> Result<String, JwtError> {
        let ttl = Duration::minutes(self.config.access_expiration_minutes);
        self.generate(user_id, username, name, role, TOKEN_TYPE_ACCESS, ttl)
    }

    /// 签发刷新令牌
    pub fn generate_refresh_token(
        &self,
        user_id: &str,
        username: &str,
        name: &str,
        role: UserRole,
    ) -> Result<String, JwtError> {
        let ttl = Duration::days(self.config.refresh_expiration_days);
        self.generate(user_id, username, name, role, TOKEN_TYPE_REFRESH, ttl)
    }

    fn generate(
        &self,
        user_id: &str,
        username: &str,
        name: &str,
        role: UserRole,
        token_type: &str,
        ttl: Duration,
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            username: username.to_string(),
            name: name.to_string(),
            role,
            token_type: token_type.to_string(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.secret.as_bytes()),
        )
        .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// 验证令牌并返回 Claims (不检查 token_type)
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_audience(&[&self.config.audience]);

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
            _ => JwtError::InvalidToken(e.to_string()),
        })?;

        Ok(data.claims)
    }

    /// 验证访问令牌
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.validate_typed(token, TOKEN_TYPE_ACCESS)
    }

    /// 验证刷新令牌
    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.validate_typed(token, TOKEN_TYPE_REFRESH)
    }

    fn validate_typed(&self, token: &str, expected: &str) -> Result<Claims, JwtError> {
        let claims = self.validate_token(token)?;
        if claims.token_type != expected {
            return Err(JwtError::WrongTokenType {
                expected: expected.to_string(),
                got: claims.token_type,
            });
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> JwtService {
        JwtService::new(JwtConfig {
            secret: "test-secret-at-least-32-bytes-long!!".to_string(),
            access_expiration_minutes: 60,
            refresh_expiration_days: 7,
            issuer: "pos-server".to_string(),
            audience: "pos-dashboard".to_string(),
        })
    }

    #[test]
    fn access_token_round_trip() {
        let svc = test_service();
        let token = svc
            .generate_access_token("u1", "admin", "Admin", UserRole::Admin)
            .unwrap();

        let claims = svc.validate_access_token(&token).unwrap();
        assert_eq!(claims.sub, "u1");
        assert_eq!(claims.username, "admin");
        assert_eq!(claims.role, UserRole::Admin);
        assert_eq!(claims.token_type, TOKEN_TYPE_ACCESS);
    }

    #[test]
    fn refresh_token_rejected_as_access() {
        let svc = test_service();
        let token = svc
            .generate_refresh_token("u1", "admin", "Admin", UserRole::Admin)
            .unwrap();

        assert!(svc.validate_access_token(&token).is_err());
        assert!(svc.validate_refresh_token(&token).is_ok());
    }

    #[test]
    fn tampered_token_rejected() {
        let svc = test_service();
        let mut token = svc
            .generate_access_token("u1", "admin", "Admin", UserRole::Admin)
            .unwrap();
        token.push('x');

        assert!(matches!(
            svc.validate_token(&token),
            Err(JwtError::InvalidToken(_))
        ));
    }

    #[test]
    fn extract_from_header_strips_bearer() {
        assert_eq!(JwtService::extract_from_header("Bearer abc"), Some("abc"));
        assert_eq!(JwtService::extract_from_header("Basic abc"), None);
    }
}
