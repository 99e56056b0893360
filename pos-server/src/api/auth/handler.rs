//! Auth API Handlers

use axum::{
    Json,
    extract::State,
    http::HeaderMap,
};
use shared::client::{
    AuthUser, ChangePasswordRequest, LoginRequest, LoginResponse, MessageResponse,
    RefreshRequest, RefreshResponse, RegisterRequest, RegisterResponse,
};
use shared::models::UserRole;
use validator::Validate;

use crate::auth::{CurrentUser, JwtError, JwtService, hash_password, permissions_for_role, verify_password};
use crate::core::ServerState;
use crate::db::repository::system_user;
use crate::utils::{AppError, AppResult};

/// POST /api/auth/login - 账号密码登录
pub async fn login(
    State(state): State<ServerState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let user = system_user::find_by_username(state.pool(), &payload.username)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let valid = verify_password(&payload.password, &user.password_hash)
        .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;
    if !valid {
        tracing::warn!(target: "security", username = %payload.username, "Login failed");
        return Err(AppError::Unauthorized);
    }
    if !user.is_active {
        return Err(AppError::forbidden("Account is disabled"));
    }

    system_user::touch_last_login(state.pool(), &user.id).await?;

    let access_token = state
        .jwt_service
        .generate_access_token(&user.id, &user.username, &user.name, user.role)
        .map_err(|e| AppError::internal(e.to_string()))?;
    let refresh_token = state
        .jwt_service
        .generate_refresh_token(&user.id, &user.username, &user.name, user.role)
        .map_err(|e| AppError::internal(e.to_string()))?;

    tracing::info!(target: "security", username = %user.username, "Login succeeded");

    Ok(Json(LoginResponse {
        access_token,
        refresh_token,
        token_type: "bearer".to_string(),
        user: AuthUser {
            id: user.id,
            username: user.username,
            name: user.name,
            role: user.role,
            permissions: permissions_for_role(user.role),
            avatar: user.avatar,
        },
    }))
}

/// POST /api/auth/logout - 注销当前访问令牌
pub async fn logout(
    State(state): State<ServerState>,
    headers: HeaderMap,
) -> AppResult<Json<MessageResponse>> {
    let token = headers
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(JwtService::extract_from_header)
        .ok_or(AppError::Unauthorized)?;

    state.revoked_tokens.revoke(token);
    Ok(Json(MessageResponse {
        message: "Logged out".to_string(),
    }))
}

/// POST /api/auth/refresh - 用刷新令牌换新访问令牌
pub async fn refresh(
    State(state): State<ServerState>,
    Json(payload): Json<RefreshRequest>,
) -> AppResult<Json<RefreshResponse>> {
    if state.revoked_tokens.is_revoked(&payload.refresh_token) {
        return Err(AppError::InvalidToken);
    }

    let claims = state
        .jwt_service
        .validate_refresh_token(&payload.refresh_token)
        .map_err(|e| match e {
            JwtError::ExpiredToken => AppError::TokenExpired,
            _ => AppError::InvalidToken,
        })?;

    let access_token = state
        .jwt_service
        .generate_access_token(&claims.sub, &claims.username, &claims.name, claims.role)
        .map_err(|e| AppError::internal(e.to_string()))?;

    Ok(Json(RefreshResponse { access_token }))
}

/// GET /api/auth/me - 当前用户信息
pub async fn me(
    State(state): State<ServerState>,
    current: CurrentUser,
) -> AppResult<Json<AuthUser>> {
    let user = system_user::find_by_id(state.pool(), &current.id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {}", current.id)))?;

    Ok(Json(AuthUser {
        id: user.id,
        username: user.username,
        name: user.name,
        role: user.role,
        permissions: permissions_for_role(user.role),
        avatar: user.avatar,
    }))
}

/// POST /api/auth/register - 创建后台账号
pub async fn register(
    State(state): State<ServerState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<Json<RegisterResponse>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let hash = hash_password(&payload.password)
        .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

    let user = system_user::create(
        state.pool(),
        payload.username.trim(),
        &hash,
        &payload.name,
        payload.phone.as_deref(),
        payload.role.unwrap_or(UserRole::Staff),
    )
    .await?;

    Ok(Json(RegisterResponse {
        id: user.id,
        username: user.username,
    }))
}

/// POST /api/auth/change-password - 修改自己的密码
pub async fn change_password(
    State(state): State<ServerState>,
    current: CurrentUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let user = system_user::find_by_id(state.pool(), &current.id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {}", current.id)))?;

    let valid = verify_password(&payload.old_password, &user.password_hash)
        .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;
    if !valid {
        return Err(AppError::invalid("Old password is incorrect"));
    }

    let hash = hash_password(&payload.new_password)
        .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;
    system_user::update_password(state.pool(), &user.id, &hash).await?;

    Ok(Json(MessageResponse {
        message: "Password changed".to_string(),
    }))
}
