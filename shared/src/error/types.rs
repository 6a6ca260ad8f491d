//! Error types and result alias

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application-level Result type
pub type AppResult<T> = Result<T, AppError>;

/// Structured application error
///
/// The primary error type crossing the engine/UI boundary:
/// - a standardized code via [`ErrorCode`]
/// - a human-readable message
/// - optional structured details for debugging (entity ids, field names)
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (field-level errors, context, etc.)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    // ==================== Convenience constructors ====================

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        let r = resource.into();
        Self::with_message(ErrorCode::NotFound, format!("{} not found", r))
            .with_detail("resource", r)
    }

    /// Create a missing required field error
    pub fn required_field(field: impl Into<String>) -> Self {
        let f = field.into();
        Self::with_message(ErrorCode::RequiredField, format!("{} is required", f))
            .with_detail("field", f)
    }

    /// Create a permission denied error
    pub fn permission_denied(action: impl Into<String>) -> Self {
        let a = action.into();
        Self::with_message(ErrorCode::PermissionDenied, format!("not allowed to {}", a))
            .with_detail("action", a)
    }

    /// Create an invalid line item error
    pub fn invalid_line_item(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidLineItem, msg)
    }

    /// Create an invalid tax error
    pub fn invalid_tax(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidTax, msg)
    }

    /// Create an invalid status transition error
    pub fn invalid_transition(from: impl Into<String>, to: impl Into<String>) -> Self {
        let (from, to) = (from.into(), to.into());
        Self::with_message(
            ErrorCode::InvalidStatusTransition,
            format!("transition {} -> {} is not allowed", from, to),
        )
        .with_detail("from", from)
        .with_detail("to", to)
    }

    /// Create an immutable field violation error
    pub fn immutable_field(field: impl Into<String>) -> Self {
        let f = field.into();
        Self::with_message(
            ErrorCode::ImmutableField,
            format!("{} is immutable once the invoice leaves draft", f),
        )
        .with_detail("field", f)
    }

    /// Create a stale-write conflict error
    pub fn version_conflict(expected: u64, actual: u64) -> Self {
        Self::new(ErrorCode::VersionConflict)
            .with_detail("expected_version", expected)
            .with_detail("actual_version", actual)
    }

    /// Create a store unavailable error
    pub fn store_unavailable(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::StoreUnavailable, msg)
    }

    /// Create a database error
    pub fn database(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::DatabaseError, msg)
    }

    /// Create an order→invoice pipeline failure error
    pub fn pipeline_failure(order_id: impl Into<String>, cause: impl Into<String>) -> Self {
        let id = order_id.into();
        Self::with_message(
            ErrorCode::InvoicePipelineFailure,
            format!("order {} completed but invoice creation failed", id),
        )
        .with_detail("order_id", id)
        .with_detail("cause", cause.into())
    }
}
