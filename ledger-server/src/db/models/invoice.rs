//! Invoice Model

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::models::InvoiceStatus;
use surrealdb::RecordId;
use validator::Validate;

pub type InvoiceId = RecordId;

/// One billable row on an invoice
///
/// `amount` is derived (quantity × unit_rate, rounded) and rewritten by the
/// money module on every edit; the stored value is never authoritative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub quantity: i32,
    pub unit_rate: f64,
    #[serde(default)]
    pub amount: f64,
}

/// Invoice document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<InvoiceId>,

    /// Display identifier (`PREFIX-YYYYMM-NNN`); the record id stays the
    /// primary key. Frozen once the invoice leaves draft.
    pub invoice_number: String,

    pub client_name: String,
    pub client_email: String,
    #[serde(default)]
    pub client_phone: Option<String>,
    #[serde(default)]
    pub client_address: Option<String>,

    /// Insertion order is display order. Upstream documents may predate the
    /// items feature; readers always get a real vector.
    #[serde(default, deserialize_with = "serde_helpers::null_to_empty")]
    pub items: Vec<LineItem>,

    /// Derived: sum of item amounts
    #[serde(default)]
    pub subtotal: f64,
    /// User-set, non-negative
    #[serde(default)]
    pub tax_amount: f64,
    /// Derived: subtotal + tax_amount, recomputed before every persist
    #[serde(default)]
    pub total_amount: f64,

    pub status: InvoiceStatus,

    #[serde(with = "serde_helpers::datetime_millis")]
    pub due_date: DateTime<Utc>,
    /// Frozen once the invoice leaves draft
    #[serde(with = "serde_helpers::datetime_millis")]
    pub created_at: DateTime<Utc>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_datetime_millis"
    )]
    pub sent_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_datetime_millis"
    )]
    pub paid_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub payment_terms: String,
    #[serde(default)]
    pub notes: Option<String>,

    /// Provenance when created by the order bridge
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub source_order_id: Option<RecordId>,

    /// Optimistic concurrency: bumped on every write, checked on update
    #[serde(default)]
    pub version: u64,
}

/// Line item payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LineItemInput {
    #[validate(length(min = 1, max = 300))]
    pub description: String,
    pub quantity: i32,
    pub unit_rate: f64,
}

/// Create invoice payload
///
/// Either `items` (amounts derived by the money module) or `amount` (a direct
/// total for invoices without line items, used by the order bridge) must be
/// provided.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct InvoiceCreate {
    #[validate(length(max = 120))]
    pub client_name: String,
    #[validate(email)]
    pub client_email: String,
    #[validate(length(max = 40))]
    pub client_phone: Option<String>,
    #[validate(length(max = 300))]
    pub client_address: Option<String>,
    #[serde(default)]
    #[validate(nested)]
    pub items: Vec<LineItemInput>,
    #[serde(default)]
    pub tax_amount: f64,
    /// Direct total for invoices without line items
    pub amount: Option<f64>,
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    #[validate(length(max = 200))]
    pub payment_terms: String,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
    /// Initial status; defaults to draft. Only draft or sent are accepted.
    pub status: Option<InvoiceStatus>,
    /// Set when created by the order bridge
    #[serde(default)]
    pub source_order_id: Option<String>,
}

/// Update invoice payload
///
/// `None` fields are left unchanged. `expected_version` must match the stored
/// version or the write is rejected as stale.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct InvoiceUpdate {
    #[validate(length(min = 1, max = 120))]
    pub client_name: Option<String>,
    #[validate(email)]
    pub client_email: Option<String>,
    #[validate(length(max = 40))]
    pub client_phone: Option<String>,
    #[validate(length(max = 300))]
    pub client_address: Option<String>,
    #[validate(nested)]
    pub items: Option<Vec<LineItemInput>>,
    pub tax_amount: Option<f64>,
    pub due_date: Option<DateTime<Utc>>,
    #[validate(length(max = 200))]
    pub payment_terms: Option<String>,
    #[validate(length(max = 1000))]
    pub notes: Option<String>,
    /// Rejected unless the invoice is still a draft
    pub invoice_number: Option<String>,
    /// Rejected unless the invoice is still a draft
    pub created_at: Option<DateTime<Utc>>,
    /// Status change by direct edit; must follow the lifecycle table
    pub status: Option<InvoiceStatus>,
    pub expected_version: u64,
}

impl InvoiceUpdate {
    /// Whether this update touches anything that changes derived amounts
    pub fn touches_money(&self) -> bool {
        self.items.is_some() || self.tax_amount.is_some()
    }
}
