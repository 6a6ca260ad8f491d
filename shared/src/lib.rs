//! Shared types for the ledger engine
//!
//! Domain vocabulary consumed by both the engine crate and the console UI:
//! status enums with their transition tables, report shapes for charting,
//! and the unified error code / `AppError` machinery.

pub mod error;
pub mod models;

// Re-exports
pub use error::{AppError, AppResult, ErrorCode};
pub use serde::{Deserialize, Serialize};
