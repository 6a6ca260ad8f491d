//! Invoice Repository
//!
//! Write contracts enforced here, before anything is persisted:
//! - required fields on create (client name/email, computed total, number)
//! - `invoice_number` and `created_at` frozen once the invoice leaves draft
//! - status changes must follow the lifecycle table
//! - derived amounts re-run through the money module on every edit
//! - stale writes rejected by the version check

use super::{BaseRepository, RepoError, RepoResult, record_key};
use crate::db::models::{Invoice, InvoiceUpdate, LineItem};
use crate::money;
use chrono::{DateTime, Utc};
use shared::models::InvoiceStatus;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const TABLE: &str = "invoice";

#[derive(Clone)]
pub struct InvoiceRepository {
    base: BaseRepository,
}

impl InvoiceRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Create a new invoice document
    ///
    /// The caller builds the document (derived amounts already recomputed);
    /// the adapter still refuses writes missing the required fields.
    pub async fn create(&self, invoice: Invoice) -> RepoResult<Invoice> {
        if invoice.client_name.trim().is_empty() {
            return Err(RepoError::MissingField("client_name".to_string()));
        }
        if invoice.client_email.trim().is_empty() {
            return Err(RepoError::MissingField("client_email".to_string()));
        }
        if invoice.total_amount <= 0.0 {
            return Err(RepoError::MissingField("total_amount".to_string()));
        }
        if invoice.invoice_number.trim().is_empty() {
            return Err(RepoError::MissingField("invoice_number".to_string()));
        }

        // Numbers come from the period counter; a collision here means the
        // counter was bypassed
        if self.find_by_number(&invoice.invoice_number).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Invoice number '{}' already exists",
                invoice.invoice_number
            )));
        }

        let created: Option<Invoice> = self.base.db().create(TABLE).content(invoice).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create invoice".to_string()))
    }

    /// All invoices, unordered (callers sort)
    pub async fn find_all(&self) -> RepoResult<Vec<Invoice>> {
        let invoices: Vec<Invoice> = self.base.db().select(TABLE).await?;
        Ok(invoices)
    }

    /// Find invoice by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Invoice>> {
        let invoice: Option<Invoice> = self.base.db().select((TABLE, record_key(TABLE, id))).await?;
        Ok(invoice)
    }

    /// Find invoice by display number
    pub async fn find_by_number(&self, number: &str) -> RepoResult<Option<Invoice>> {
        let number = number.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM invoice WHERE invoice_number = $number LIMIT 1")
            .bind(("number", number))
            .await?;
        let invoices: Vec<Invoice> = result.take(0)?;
        Ok(invoices.into_iter().next())
    }

    /// Invoices created in [start, end)
    pub async fn find_in_window(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RepoResult<Vec<Invoice>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM invoice WHERE created_at >= $start AND created_at < $end")
            .bind(("start", start.timestamp_millis()))
            .bind(("end", end.timestamp_millis()))
            .await?;
        let invoices: Vec<Invoice> = result.take(0)?;
        Ok(invoices)
    }

    /// Sent invoices whose due date has passed (overdue sweep input)
    pub async fn find_due_before(&self, now: DateTime<Utc>) -> RepoResult<Vec<Invoice>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM invoice WHERE status = $status AND due_date < $now")
            .bind(("status", InvoiceStatus::Sent))
            .bind(("now", now.timestamp_millis()))
            .await?;
        let invoices: Vec<Invoice> = result.take(0)?;
        Ok(invoices)
    }

    /// Update an invoice
    ///
    /// `data.expected_version` must match the stored version; the guard is
    /// repeated inside the write statement so a concurrent editor loses
    /// cleanly instead of silently overwriting.
    pub async fn update(&self, id: &str, data: InvoiceUpdate) -> RepoResult<Invoice> {
        let key = record_key(TABLE, id);
        let existing = self
            .find_by_id(key)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Invoice {} not found", id)))?;

        if existing.version != data.expected_version {
            return Err(RepoError::Conflict {
                expected: data.expected_version,
                actual: existing.version,
            });
        }

        if !existing.status.is_editable() {
            if let Some(ref number) = data.invoice_number
                && number != &existing.invoice_number
            {
                return Err(RepoError::Immutable("invoice_number".to_string()));
            }
            if let Some(created_at) = data.created_at
                && created_at != existing.created_at
            {
                return Err(RepoError::Immutable("created_at".to_string()));
            }
        }

        let touches_money = data.touches_money();
        let mut updated = existing.clone();

        if let Some(v) = data.client_name {
            updated.client_name = v;
        }
        if let Some(v) = data.client_email {
            updated.client_email = v;
        }
        if let Some(v) = data.client_phone {
            updated.client_phone = Some(v);
        }
        if let Some(v) = data.client_address {
            updated.client_address = Some(v);
        }
        if let Some(items) = data.items {
            updated.items = items
                .into_iter()
                .map(|item| LineItem {
                    description: item.description,
                    quantity: item.quantity,
                    unit_rate: item.unit_rate,
                    amount: 0.0,
                })
                .collect();
        }
        if let Some(v) = data.tax_amount {
            updated.tax_amount = v;
        }
        if let Some(v) = data.due_date {
            updated.due_date = v;
        }
        if let Some(v) = data.payment_terms {
            updated.payment_terms = v;
        }
        if let Some(v) = data.notes {
            updated.notes = Some(v);
        }
        if let Some(v) = data.invoice_number {
            updated.invoice_number = v;
        }
        if let Some(v) = data.created_at {
            updated.created_at = v;
        }

        if touches_money {
            if updated.items.is_empty() {
                // direct-amount invoice (order bridge): subtotal is fixed,
                // only the tax component can move
                let total = money::total(money::to_decimal(updated.subtotal), updated.tax_amount)?;
                updated.tax_amount = money::to_f64(money::to_decimal(updated.tax_amount));
                updated.total_amount = money::to_f64(total);
            } else {
                let totals = money::recalculate(&mut updated.items, updated.tax_amount)?;
                updated.subtotal = totals.subtotal;
                updated.tax_amount = totals.tax_amount;
                updated.total_amount = totals.total_amount;
            }
        }

        if let Some(next) = data.status
            && next != existing.status
        {
            if !existing.status.can_transition_to(next) {
                return Err(RepoError::Transition {
                    from: existing.status.to_string(),
                    to: next.to_string(),
                });
            }
            apply_status(&mut updated, next, Utc::now());
        }

        updated.version = existing.version + 1;
        self.persist(key, updated, existing.version).await
    }

    /// Move an invoice along the lifecycle table
    ///
    /// Rejections are idempotent: nothing is read-modified before the guard,
    /// so a repeated bad transition yields the same error with no side
    /// effect.
    pub async fn transition(
        &self,
        id: &str,
        next: InvoiceStatus,
        now: DateTime<Utc>,
    ) -> RepoResult<Invoice> {
        let key = record_key(TABLE, id);
        let existing = self
            .find_by_id(key)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Invoice {} not found", id)))?;

        if !existing.status.can_transition_to(next) {
            return Err(RepoError::Transition {
                from: existing.status.to_string(),
                to: next.to_string(),
            });
        }

        let mut updated = existing.clone();
        apply_status(&mut updated, next, now);
        updated.version = existing.version + 1;
        self.persist(key, updated, existing.version).await
    }

    /// Hard delete (explicit staff action only)
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let deleted: Option<Invoice> = self.base.db().delete((TABLE, record_key(TABLE, id))).await?;
        Ok(deleted.is_some())
    }

    /// Write the full document, guarded by the stored version
    async fn persist(&self, key: &str, mut updated: Invoice, expected: u64) -> RepoResult<Invoice> {
        // the record id is the statement target, not part of the content
        updated.id = None;
        let id = RecordId::from_table_key(TABLE, key);
        let mut result = self
            .base
            .db()
            .query("UPDATE $id CONTENT $data WHERE version = $expected RETURN AFTER")
            .bind(("id", id))
            .bind(("data", updated))
            .bind(("expected", expected))
            .await?;
        let rows: Vec<Invoice> = result.take(0)?;
        match rows.into_iter().next() {
            Some(invoice) => Ok(invoice),
            None => {
                // lost the race between read and write; report what is there now
                let actual = self
                    .find_by_id(key)
                    .await?
                    .map(|current| current.version)
                    .unwrap_or(0);
                Err(RepoError::Conflict { expected, actual })
            }
        }
    }
}

/// Apply a status change and its timestamps
///
/// Entering Paid records `paid_at` and touches nothing else; totals are
/// frozen as computed at edit time.
fn apply_status(invoice: &mut Invoice, next: InvoiceStatus, now: DateTime<Utc>) {
    invoice.status = next;
    match next {
        InvoiceStatus::Sent => {
            if invoice.sent_at.is_none() {
                invoice.sent_at = Some(now);
            }
        }
        InvoiceStatus::Paid => {
            if invoice.paid_at.is_none() {
                invoice.paid_at = Some(now);
            }
        }
        _ => {}
    }
}
