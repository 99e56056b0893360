//! Data models
//!
//! Shared between pos-server and pos-client (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! Wire format is camelCase fields with SCREAMING_SNAKE_CASE enum values,
//! matching the existing dashboard contract.

pub mod category;
pub mod dining_table;
pub mod member;
pub mod order;
pub mod product;
pub mod reservation;
pub mod stock_log;
pub mod supplier;
pub mod system_user;

// Re-exports
pub use category::*;
pub use dining_table::*;
pub use member::*;
pub use order::*;
pub use product::*;
pub use reservation::*;
pub use stock_log::*;
pub use supplier::*;
pub use system_user::*;
