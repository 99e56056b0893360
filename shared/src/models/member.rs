//! Member Model (store customers, 会员)

use serde::{Deserialize, Serialize};

/// Membership tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MemberType {
    Member,
    Normal,
}

/// Store member entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    pub name: String,
    pub phone: String,
    #[serde(rename = "type")]
    pub member_type: MemberType,
    pub balance: f64,
    pub points: i32,
    pub level: i32,
    pub join_date: String,
    pub avatar: Option<String>,
    pub birthday: Option<String>,
    pub gender: Option<String>,
}

/// Create member payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberCreate {
    pub name: String,
    pub phone: String,
    #[serde(rename = "type")]
    pub member_type: MemberType,
    #[serde(default)]
    pub balance: f64,
    #[serde(default)]
    pub points: i32,
    #[serde(default)]
    pub level: i32,
    pub join_date: String,
    pub avatar: Option<String>,
    pub birthday: Option<String>,
    pub gender: Option<String>,
}

/// Update member payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    #[serde(rename = "type")]
    pub member_type: Option<MemberType>,
    pub level: Option<i32>,
    pub avatar: Option<String>,
    pub birthday: Option<String>,
    pub gender: Option<String>,
}
