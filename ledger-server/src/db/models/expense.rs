//! Expense Model

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::models::ExpenseCategory;
use surrealdb::RecordId;
use validator::Validate;

pub type ExpenseId = RecordId;

/// Expense document
///
/// Expenses have no lifecycle; they count into reports unconditionally.
/// Documents without a category (or with a retired one) surface as `Other`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<ExpenseId>,

    #[serde(default)]
    pub category: ExpenseCategory,
    pub amount: f64,
    #[serde(with = "serde_helpers::datetime_millis")]
    pub date: DateTime<Utc>,
    pub description: String,

    #[serde(with = "serde_helpers::datetime_millis")]
    pub created_at: DateTime<Utc>,
}

/// Create expense payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ExpenseCreate {
    #[serde(default)]
    pub category: ExpenseCategory,
    pub amount: f64,
    pub date: Option<DateTime<Utc>>,
    #[validate(length(min = 1, max = 300))]
    pub description: String,
}

/// Update expense payload
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ExpenseUpdate {
    pub category: Option<ExpenseCategory>,
    pub amount: Option<f64>,
    pub date: Option<DateTime<Utc>>,
    #[validate(length(min = 1, max = 300))]
    pub description: Option<String>,
}
