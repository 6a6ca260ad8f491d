//! Order → Invoice Bridge
//!
//! One-way derivation: a completed order becomes an invoice carrying the
//! order amount directly. The generated invoice has no line items, only a
//! description sourced from the order's product snapshot, so the amount is
//! NOT recomputed from a synthetic item list.

use crate::db::models::{InvoiceCreate, Order};
use chrono::{DateTime, Duration, Utc};
use shared::models::InvoiceStatus;

/// Map a completed order to an invoice create payload
///
/// The invoice is dated at the completion moment, due `due_days` later, and
/// starts as sent: the underlying work is already delivered, so the invoice
/// is an immediately outstanding receivable rather than an editable draft.
pub fn invoice_request_from(
    order: &Order,
    completed_at: DateTime<Utc>,
    due_days: i64,
) -> InvoiceCreate {
    let description = match &order.product_details {
        Some(product) => format!("{} x{}", product.product_name, product.quantity),
        None => format!("Order for {}", order.customer_name),
    };

    InvoiceCreate {
        client_name: order.customer_name.clone(),
        client_email: order.customer_email.clone(),
        client_phone: None,
        client_address: None,
        items: Vec::new(),
        tax_amount: 0.0,
        amount: Some(order.amount),
        due_date: Some(completed_at + Duration::days(due_days)),
        payment_terms: format!("Net {}", due_days),
        notes: Some(description),
        status: Some(InvoiceStatus::Sent),
        source_order_id: order.id.as_ref().map(|id| id.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::ProductDetails;
    use shared::models::OrderStatus;

    fn completed_order(amount: f64) -> Order {
        let now = Utc::now();
        Order {
            id: None,
            customer_name: "Acme Studio".to_string(),
            customer_email: "billing@acme.example".to_string(),
            amount,
            status: OrderStatus::Completed,
            date: now,
            product_details: None,
            invoice_pending: true,
            invoice_id: None,
            completed_at: Some(now),
            created_at: now,
        }
    }

    #[test]
    fn maps_amount_directly_without_items() {
        let order = completed_order(1000.0);
        let request = invoice_request_from(&order, Utc::now(), 15);
        assert!(request.items.is_empty());
        assert_eq!(request.amount, Some(1000.0));
        assert_eq!(request.tax_amount, 0.0);
        assert_eq!(request.status, Some(InvoiceStatus::Sent));
    }

    #[test]
    fn due_date_is_completion_plus_due_days() {
        let completed_at = Utc::now();
        let request = invoice_request_from(&completed_order(500.0), completed_at, 15);
        assert_eq!(request.due_date, Some(completed_at + Duration::days(15)));
        assert_eq!(request.payment_terms, "Net 15");
    }

    #[test]
    fn description_prefers_product_snapshot() {
        let mut order = completed_order(240.0);
        order.product_details = Some(ProductDetails {
            product_id: "product:landing".to_string(),
            product_name: "Landing page".to_string(),
            original_price: 120.0,
            quantity: 2,
            unit_price: 120.0,
            price_change_reason: None,
        });
        let request = invoice_request_from(&order, Utc::now(), 15);
        assert_eq!(request.notes.as_deref(), Some("Landing page x2"));
    }
}
