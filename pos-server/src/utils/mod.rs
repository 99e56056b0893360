//! Utility Module

pub mod error;
pub mod logger;
pub mod result;

pub use error::{AppError, ErrorBody};
pub use result::AppResult;
