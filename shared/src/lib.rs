//! Shared types for the POS back-office suite
//!
//! Entities, payloads, and API DTOs used by both `pos-server` and
//! `pos-client`. DB row types use
//! `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are UUID v4 strings; timestamps are epoch milliseconds.

pub mod client;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
