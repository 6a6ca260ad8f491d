//! Orders Domain
//!
//! Order intake, the status sequence, and the one-way bridge that turns a
//! completed order into an invoice.

pub mod bridge;
pub mod service;

// Re-exports
pub use service::{OrderCompletion, OrderService};
