//! Document models for the ledger store
//!
//! Stored shape notes: monetary values are plain `f64` numbers (the store has
//! no fixed-point type; arithmetic happens in `rust_decimal` inside the money
//! module), dates are i64 Unix millis, ids are SurrealDB record ids.

pub mod expense;
pub mod invoice;
pub mod order;
pub mod serde_helpers;

// Re-exports
pub use expense::{Expense, ExpenseCreate, ExpenseId, ExpenseUpdate};
pub use invoice::{Invoice, InvoiceCreate, InvoiceId, InvoiceUpdate, LineItem, LineItemInput};
pub use order::{Order, OrderCreate, OrderId, OrderUpdate, ProductDetails};
