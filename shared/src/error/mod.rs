//! Unified error handling
//!
//! - [`ErrorCode`] - numeric error codes shared with the console UI
//! - [`AppError`] - structured application error
//! - [`AppResult`] - application-level result alias

pub mod codes;
pub mod types;

pub use codes::ErrorCode;
pub use types::{AppError, AppResult};
