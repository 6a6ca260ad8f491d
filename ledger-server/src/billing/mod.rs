//! Billing Domain
//!
//! Invoice numbering and the policy-gated invoice service. The lifecycle
//! table itself lives in `shared::models::InvoiceStatus` so the console UI
//! can mirror it; enforcement happens in the invoice repository.

pub mod number;
pub mod service;

// Re-exports
pub use number::InvoiceNumberGenerator;
pub use service::BillingService;
