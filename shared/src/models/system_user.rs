//! System User Model (back-office operators, not store members)

use serde::{Deserialize, Serialize};

/// Operator role, in ascending order of privilege
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Staff,
    Cashier,
    Manager,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Staff => "staff",
            UserRole::Cashier => "cashier",
            UserRole::Manager => "manager",
            UserRole::Admin => "admin",
        }
    }
}

/// Back-office login account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct SystemUser {
    pub id: String,
    pub username: String,
    /// Argon2 hash, never serialized to the wire
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub name: String,
    pub phone: Option<String>,
    pub role: UserRole,
    pub avatar: Option<String>,
    pub is_active: bool,
    pub last_login: Option<String>,
}
