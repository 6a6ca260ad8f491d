//! Repository Module
//!
//! Persistence adapters over the document store. Each adapter normalizes the
//! stored shape on read (missing fields defaulted, millis converted to
//! `DateTime<Utc>` by the model serde) and enforces the write contracts of
//! its entity before anything is persisted.

pub mod counter;
pub mod expense;
pub mod invoice;
pub mod order;

// Re-exports
pub use counter::InvoiceCounterRepository;
pub use expense::ExpenseRepository;
pub use invoice::InvoiceRepository;
pub use order::OrderRepository;

use shared::{AppError, ErrorCode};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Required field missing: {0}")]
    MissingField(String),

    #[error("Immutable field: {0}")]
    Immutable(String),

    #[error("Transition {from} -> {to} is not allowed")]
    Transition { from: String, to: String },

    #[error("Stale write: expected version {expected}, found {actual}")]
    Conflict { expected: u64, actual: u64 },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    /// Domain error raised inside an adapter (money recomputation etc.);
    /// passed through unchanged
    #[error("{0}")]
    Domain(AppError),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<AppError> for RepoError {
    fn from(err: AppError) -> Self {
        RepoError::Domain(err)
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::with_message(ErrorCode::NotFound, msg),
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::AlreadyExists, msg),
            RepoError::MissingField(field) => AppError::required_field(field),
            RepoError::Immutable(field) => AppError::immutable_field(field),
            RepoError::Transition { from, to } => AppError::invalid_transition(from, to),
            RepoError::Conflict { expected, actual } => AppError::version_conflict(expected, actual),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => AppError::database(msg),
            RepoError::Domain(err) => err,
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

/// Accept both `"table:key"` and bare `"key"` id spellings
pub(crate) fn record_key<'a>(table: &str, id: &'a str) -> &'a str {
    id.strip_prefix(table)
        .and_then(|rest| rest.strip_prefix(':'))
        .unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_key_strips_matching_prefix_only() {
        assert_eq!(record_key("invoice", "invoice:abc"), "abc");
        assert_eq!(record_key("invoice", "abc"), "abc");
        assert_eq!(record_key("invoice", "order:abc"), "order:abc");
    }
}
