//! Ledger engine for the agency back-office console
//!
//! The billing and reporting core behind the admin UI: invoice lifecycle and
//! derived-amount math, order intake with the order→invoice bridge, expense
//! tracking, windowed financial aggregation, and report/invoice export. All
//! persistence goes through repository adapters over an embedded document
//! store; the UI layer talks to the services in-process, there is no wire
//! protocol here.

pub mod billing;
pub mod core;
pub mod db;
pub mod expenses;
pub mod money;
pub mod orders;
pub mod reports;
pub mod utils;

// Re-exports
pub use crate::core::{AppState, Config, Policy};
pub use shared::{AppError, AppResult, ErrorCode};
