//! Order Repository
//!
//! Orders are last-write-wins (no version field); the invoice lifecycle is
//! where lost updates actually cost money, and that is guarded in the
//! invoice adapter. Completing an order writes the status change and the
//! `invoice_pending` outbox marker in a single mutation, so a crash before
//! invoice creation is always detectable by the reconcile sweep.

use super::{BaseRepository, RepoError, RepoResult, record_key};
use crate::db::models::{Order, OrderCreate, OrderUpdate, ProductDetails};
use crate::money;
use chrono::{DateTime, Utc};
use shared::models::OrderStatus;
use shared::{AppError, ErrorCode};
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "order";

#[derive(Clone)]
pub struct OrderRepository {
    base: BaseRepository,
}

impl OrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create a new order
    ///
    /// The amount is authoritative from here on: taken from the payload, or
    /// derived once from the product snapshot.
    pub async fn create(&self, data: OrderCreate) -> RepoResult<Order> {
        if data.customer_name.trim().is_empty() {
            return Err(RepoError::MissingField("customer_name".to_string()));
        }
        if data.customer_email.trim().is_empty() {
            return Err(RepoError::MissingField("customer_email".to_string()));
        }

        let amount = match (data.amount, &data.product_details) {
            (Some(amount), _) => {
                if !amount.is_finite() || amount <= 0.0 {
                    return Err(RepoError::Validation(format!(
                        "order amount must be positive, got {}",
                        amount
                    )));
                }
                amount
            }
            (None, Some(product)) => {
                money::to_f64(money::line_amount(product.quantity, product.unit_price)?)
            }
            (None, None) => return Err(RepoError::MissingField("amount".to_string())),
        };

        validate_price_change(amount, data.product_details.as_ref())?;

        let now = Utc::now();
        let order = Order {
            id: None,
            customer_name: data.customer_name,
            customer_email: data.customer_email,
            amount,
            status: OrderStatus::Pending,
            date: data.date.unwrap_or(now),
            product_details: data.product_details,
            invoice_pending: false,
            invoice_id: None,
            completed_at: None,
            created_at: now,
        };

        let created: Option<Order> = self.base.db().create(TABLE).content(order).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create order".to_string()))
    }

    /// All orders, unordered (callers sort)
    pub async fn find_all(&self) -> RepoResult<Vec<Order>> {
        let orders: Vec<Order> = self.base.db().select(TABLE).await?;
        Ok(orders)
    }

    /// Find order by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Order>> {
        let order: Option<Order> = self.base.db().select((TABLE, record_key(TABLE, id))).await?;
        Ok(order)
    }

    /// Orders dated in [start, end)
    pub async fn find_in_window(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RepoResult<Vec<Order>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM order WHERE date >= $start AND date < $end")
            .bind(("start", start.timestamp_millis()))
            .bind(("end", end.timestamp_millis()))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders)
    }

    /// Completed orders whose invoice never materialized
    pub async fn find_pending_invoices(&self) -> RepoResult<Vec<Order>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM order WHERE status = $status AND invoice_pending = true")
            .bind(("status", OrderStatus::Completed))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        Ok(orders)
    }

    /// Update a pending order
    pub async fn update(&self, id: &str, data: OrderUpdate) -> RepoResult<Order> {
        let key = record_key(TABLE, id);
        let existing = self
            .find_by_id(key)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))?;

        if existing.status != OrderStatus::Pending {
            return Err(RepoError::Validation(format!(
                "only pending orders can be edited, order is {}",
                existing.status
            )));
        }

        let mut updated = existing.clone();
        if let Some(v) = data.customer_name {
            updated.customer_name = v;
        }
        if let Some(v) = data.customer_email {
            updated.customer_email = v;
        }
        if let Some(amount) = data.amount {
            if !amount.is_finite() || amount <= 0.0 {
                return Err(RepoError::Validation(format!(
                    "order amount must be positive, got {}",
                    amount
                )));
            }
            updated.amount = amount;
        }
        if let Some(v) = data.date {
            updated.date = v;
        }
        if let Some(v) = data.product_details {
            updated.product_details = Some(v);
        }

        validate_price_change(updated.amount, updated.product_details.as_ref())?;

        updated.id = None;
        let persisted: Option<Order> = self.base.db().update((TABLE, key)).content(updated).await?;
        persisted.ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    /// Move an order along its status sequence
    ///
    /// Completion also raises the `invoice_pending` outbox marker in the same
    /// mutation; the caller is expected to create the invoice next and clear
    /// the marker via [`Self::attach_invoice`].
    pub async fn transition(
        &self,
        id: &str,
        next: OrderStatus,
        now: DateTime<Utc>,
    ) -> RepoResult<Order> {
        let key = record_key(TABLE, id);
        let existing = self
            .find_by_id(key)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))?;

        if !existing.status.can_transition_to(next) {
            return Err(RepoError::Transition {
                from: existing.status.to_string(),
                to: next.to_string(),
            });
        }

        let statement = if next == OrderStatus::Completed {
            "UPDATE $id SET status = $status, completed_at = $now, invoice_pending = true RETURN AFTER"
        } else {
            "UPDATE $id SET status = $status RETURN AFTER"
        };

        let mut result = self
            .base
            .db()
            .query(statement)
            .bind(("id", RecordId::from_table_key(TABLE, key)))
            .bind(("status", next))
            .bind(("now", now.timestamp_millis()))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        orders
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::Database("Order transition returned no record".to_string()))
    }

    /// Record the bridged invoice and clear the outbox marker
    pub async fn attach_invoice(&self, id: &str, invoice_id: &RecordId) -> RepoResult<Order> {
        let key = record_key(TABLE, id);
        let mut result = self
            .base
            .db()
            .query("UPDATE $id SET invoice_pending = false, invoice_id = $invoice RETURN AFTER")
            .bind(("id", RecordId::from_table_key(TABLE, key)))
            .bind(("invoice", invoice_id.to_string()))
            .await?;
        let orders: Vec<Order> = result.take(0)?;
        orders
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Order {} not found", id)))
    }

    /// Hard delete (explicit staff action only)
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let deleted: Option<Order> = self.base.db().delete((TABLE, record_key(TABLE, id))).await?;
        Ok(deleted.is_some())
    }
}

/// A charged amount that differs from the catalog snapshot needs a reason
fn validate_price_change(amount: f64, details: Option<&ProductDetails>) -> RepoResult<()> {
    let Some(product) = details else {
        return Ok(());
    };
    let catalog_amount = money::to_f64(money::line_amount(
        product.quantity,
        product.original_price,
    )?);
    if money::money_eq(amount, catalog_amount) {
        return Ok(());
    }
    let has_reason = product
        .price_change_reason
        .as_deref()
        .is_some_and(|reason| !reason.trim().is_empty());
    if !has_reason {
        return Err(RepoError::Domain(
            AppError::new(ErrorCode::PriceChangeReasonRequired)
                .with_detail("amount", amount)
                .with_detail("catalog_amount", catalog_amount),
        ));
    }
    Ok(())
}
