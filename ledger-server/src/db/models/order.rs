//! Order Model

use super::serde_helpers;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::models::OrderStatus;
use surrealdb::RecordId;
use validator::Validate;

pub type OrderId = RecordId;

/// Product snapshot taken at order creation
///
/// Required whenever the charged unit price differs from the catalog price;
/// `price_change_reason` is then mandatory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ProductDetails {
    pub product_id: String,
    #[validate(length(min = 1, max = 200))]
    pub product_name: String,
    /// Catalog price per unit at the time of ordering
    pub original_price: f64,
    pub quantity: i32,
    /// Charged price per unit
    pub unit_price: f64,
    #[serde(default)]
    #[validate(length(max = 300))]
    pub price_change_reason: Option<String>,
}

/// Order document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<OrderId>,

    pub customer_name: String,
    pub customer_email: String,

    /// Authoritative amount, set manually or derived from the product
    /// snapshot once at creation
    pub amount: f64,

    pub status: OrderStatus,

    #[serde(with = "serde_helpers::datetime_millis")]
    pub date: DateTime<Utc>,

    #[serde(default)]
    pub product_details: Option<ProductDetails>,

    /// Outbox marker: completion recorded but the invoice is still missing
    #[serde(default)]
    pub invoice_pending: bool,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub invoice_id: Option<RecordId>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_datetime_millis"
    )]
    pub completed_at: Option<DateTime<Utc>>,

    #[serde(with = "serde_helpers::datetime_millis")]
    pub created_at: DateTime<Utc>,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderCreate {
    #[validate(length(max = 120))]
    pub customer_name: String,
    #[validate(email)]
    pub customer_email: String,
    /// Manual amount; derived from the product snapshot when absent
    pub amount: Option<f64>,
    pub date: Option<DateTime<Utc>>,
    #[validate(nested)]
    pub product_details: Option<ProductDetails>,
}

/// Update order payload (pending orders only)
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct OrderUpdate {
    #[validate(length(min = 1, max = 120))]
    pub customer_name: Option<String>,
    #[validate(email)]
    pub customer_email: Option<String>,
    pub amount: Option<f64>,
    pub date: Option<DateTime<Utc>>,
    #[validate(nested)]
    pub product_details: Option<ProductDetails>,
}
