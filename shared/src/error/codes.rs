//! Unified error codes for the ledger engine
//!
//! Error codes are shared between the engine and the console UI and are
//! organized by category:
//! - 0xxx: General errors
//! - 2xxx: Permission errors
//! - 4xxx: Billing errors
//! - 5xxx: Order errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Codes are represented as `u16` values for efficient serialization and
/// cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Required field missing
    RequiredField = 7,

    // ==================== 2xxx: Permission ====================
    /// Caller's policy does not grant this operation
    PermissionDenied = 2001,

    // ==================== 4xxx: Billing ====================
    /// Line item has a non-positive quantity or an invalid unit rate
    InvalidLineItem = 4001,
    /// Tax amount is negative or not a finite number
    InvalidTax = 4002,
    /// Status transition not present in the lifecycle table
    InvalidStatusTransition = 4003,
    /// Attempted write to a field frozen by the lifecycle
    ImmutableField = 4004,
    /// Stale write rejected by the version check
    VersionConflict = 4005,

    // ==================== 5xxx: Orders ====================
    /// Charged price differs from the catalog price without a reason
    PriceChangeReasonRequired = 5001,
    /// Order completed but invoice creation failed; reconciliation needed
    InvoicePipelineFailure = 5002,

    // ==================== 9xxx: System ====================
    /// The document store rejected the operation
    DatabaseError = 9001,
    /// The document store could not be reached
    StoreUnavailable = 9002,
    /// Internal error
    Internal = 9003,
}

impl ErrorCode {
    /// Default human-readable message for this code
    pub fn message(&self) -> &'static str {
        match self {
            ErrorCode::Unknown => "Unknown error",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::RequiredField => "Required field missing",
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::InvalidLineItem => "Invalid line item",
            ErrorCode::InvalidTax => "Invalid tax amount",
            ErrorCode::InvalidStatusTransition => "Status transition not allowed",
            ErrorCode::ImmutableField => "Field is immutable in the current status",
            ErrorCode::VersionConflict => "Record was modified by another session",
            ErrorCode::PriceChangeReasonRequired => "Price change requires a reason",
            ErrorCode::InvoicePipelineFailure => "Order completed but invoice creation failed",
            ErrorCode::DatabaseError => "Store operation failed",
            ErrorCode::StoreUnavailable => "Store unavailable",
            ErrorCode::Internal => "Internal error",
        }
    }

    /// Whether the error is caused by the caller's input rather than the system
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            ErrorCode::DatabaseError | ErrorCode::StoreUnavailable | ErrorCode::Internal
        )
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> u16 {
        code as u16
    }
}

impl TryFrom<u16> for ErrorCode {
    type Error = String;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            7 => Ok(ErrorCode::RequiredField),
            2001 => Ok(ErrorCode::PermissionDenied),
            4001 => Ok(ErrorCode::InvalidLineItem),
            4002 => Ok(ErrorCode::InvalidTax),
            4003 => Ok(ErrorCode::InvalidStatusTransition),
            4004 => Ok(ErrorCode::ImmutableField),
            4005 => Ok(ErrorCode::VersionConflict),
            5001 => Ok(ErrorCode::PriceChangeReasonRequired),
            5002 => Ok(ErrorCode::InvoicePipelineFailure),
            9001 => Ok(ErrorCode::DatabaseError),
            9002 => Ok(ErrorCode::StoreUnavailable),
            9003 => Ok(ErrorCode::Internal),
            other => Err(format!("unknown error code: {}", other)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", *self as u16)
    }
}
