//! Billing Service
//!
//! Policy-gated invoice operations. Validation, money recomputation and the
//! lifecycle guard all run before anything is persisted; persistence errors
//! propagate unchanged for the UI layer to present.

use super::number::InvoiceNumberGenerator;
use crate::core::policy::Policy;
use crate::db::models::{Invoice, InvoiceCreate, InvoiceUpdate, LineItem};
use crate::db::repository::InvoiceRepository;
use crate::money;
use crate::reports::export;
use chrono::{DateTime, Utc};
use shared::models::InvoiceStatus;
use shared::{AppError, AppResult};
use surrealdb::RecordId;
use validator::Validate;

#[derive(Clone)]
pub struct BillingService {
    invoices: InvoiceRepository,
    numbers: InvoiceNumberGenerator,
    policy: Policy,
    currency_symbol: String,
}

impl BillingService {
    pub fn new(
        invoices: InvoiceRepository,
        numbers: InvoiceNumberGenerator,
        policy: Policy,
        currency_symbol: impl Into<String>,
    ) -> Self {
        Self {
            invoices,
            numbers,
            policy,
            currency_symbol: currency_symbol.into(),
        }
    }

    /// Create an invoice (draft unless the payload says sent)
    pub async fn create_invoice(&self, data: InvoiceCreate) -> AppResult<Invoice> {
        self.policy.require_manage_billing()?;
        let invoice = prepare_invoice(data, &self.numbers, Utc::now()).await?;
        let created = self.invoices.create(invoice).await?;
        tracing::info!(
            invoice_number = %created.invoice_number,
            total = created.total_amount,
            "Invoice created"
        );
        Ok(created)
    }

    /// Edit an invoice; derived amounts are recomputed by the adapter
    pub async fn update_invoice(&self, id: &str, data: InvoiceUpdate) -> AppResult<Invoice> {
        self.policy.require_manage_billing()?;
        data.validate()
            .map_err(|e| AppError::validation(e.to_string()))?;
        Ok(self.invoices.update(id, data).await?)
    }

    /// Hard delete, an explicit staff action
    pub async fn delete_invoice(&self, id: &str) -> AppResult<()> {
        self.policy.require_manage_billing()?;
        if !self.invoices.delete(id).await? {
            return Err(AppError::not_found("Invoice"));
        }
        tracing::info!(invoice_id = %id, "Invoice deleted");
        Ok(())
    }

    pub async fn list_invoices(&self) -> AppResult<Vec<Invoice>> {
        Ok(self.invoices.find_all().await?)
    }

    pub async fn get_invoice(&self, id: &str) -> AppResult<Invoice> {
        self.invoices
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Invoice"))
    }

    /// Send an invoice: freeze it, generate the document, hand back the bytes
    pub async fn send_invoice(&self, id: &str) -> AppResult<(Invoice, Vec<u8>)> {
        self.policy.require_manage_billing()?;
        let invoice = self
            .invoices
            .transition(id, InvoiceStatus::Sent, Utc::now())
            .await?;
        let document = export::invoice_document(&invoice, &self.currency_symbol).map_err(|e| {
            tracing::error!(
                invoice_id = %id,
                invoice_number = %invoice.invoice_number,
                error = %e,
                "Invoice sent but document generation failed"
            );
            e
        })?;
        tracing::info!(invoice_number = %invoice.invoice_number, "Invoice sent");
        Ok((invoice, document))
    }

    /// Render the document for an already-issued invoice
    pub async fn invoice_document(&self, id: &str) -> AppResult<Vec<u8>> {
        let invoice = self.get_invoice(id).await?;
        export::invoice_document(&invoice, &self.currency_symbol)
    }

    pub async fn mark_paid(&self, id: &str) -> AppResult<Invoice> {
        self.policy.require_manage_billing()?;
        Ok(self
            .invoices
            .transition(id, InvoiceStatus::Paid, Utc::now())
            .await?)
    }

    pub async fn mark_overdue(&self, id: &str) -> AppResult<Invoice> {
        self.policy.require_manage_billing()?;
        Ok(self
            .invoices
            .transition(id, InvoiceStatus::Overdue, Utc::now())
            .await?)
    }

    pub async fn cancel_invoice(&self, id: &str) -> AppResult<Invoice> {
        self.policy.require_manage_billing()?;
        Ok(self
            .invoices
            .transition(id, InvoiceStatus::Cancelled, Utc::now())
            .await?)
    }

    /// Time-triggered Sent→Overdue pass; explicitly invoked, no scheduler
    pub async fn sweep_overdue(&self) -> AppResult<Vec<Invoice>> {
        self.policy.require_manage_billing()?;
        let now = Utc::now();
        let due = self.invoices.find_due_before(now).await?;
        let mut moved = Vec::new();
        for invoice in due {
            let Some(id) = invoice.id.as_ref().map(|id| id.key().to_string()) else {
                continue;
            };
            match self
                .invoices
                .transition(&id, InvoiceStatus::Overdue, now)
                .await
            {
                Ok(updated) => moved.push(updated),
                Err(e) => tracing::warn!(
                    invoice_id = %id,
                    error = %e,
                    "Overdue sweep skipped an invoice"
                ),
            }
        }
        tracing::info!(count = moved.len(), "Overdue sweep finished");
        Ok(moved)
    }
}

/// Build a storable invoice document from a create payload
///
/// Shared with the order bridge, which supplies a direct amount instead of
/// line items and starts the invoice as sent.
pub(crate) async fn prepare_invoice(
    data: InvoiceCreate,
    numbers: &InvoiceNumberGenerator,
    now: DateTime<Utc>,
) -> AppResult<Invoice> {
    // Required-field checks come before format validation so an absent field
    // surfaces as RequiredField, not as a format complaint
    if data.client_name.trim().is_empty() {
        return Err(AppError::required_field("client_name"));
    }
    if data.client_email.trim().is_empty() {
        return Err(AppError::required_field("client_email"));
    }
    let due_date = data
        .due_date
        .ok_or_else(|| AppError::required_field("due_date"))?;
    data.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let status = match data.status.unwrap_or_default() {
        InvoiceStatus::Draft => InvoiceStatus::Draft,
        InvoiceStatus::Sent => InvoiceStatus::Sent,
        other => {
            return Err(AppError::validation(format!(
                "new invoices must start as DRAFT or SENT, got {}",
                other
            )));
        }
    };

    let mut items: Vec<LineItem> = data
        .items
        .into_iter()
        .map(|item| LineItem {
            description: item.description,
            quantity: item.quantity,
            unit_rate: item.unit_rate,
            amount: 0.0,
        })
        .collect();

    let totals = if items.is_empty() {
        let amount = data
            .amount
            .ok_or_else(|| AppError::required_field("total_amount"))?;
        if !amount.is_finite() || amount <= 0.0 {
            return Err(AppError::validation(format!(
                "invoice amount must be positive, got {}",
                amount
            )));
        }
        let subtotal = money::to_decimal(amount);
        let total = money::total(subtotal, data.tax_amount)?;
        money::Totals {
            subtotal: money::to_f64(subtotal),
            tax_amount: money::to_f64(money::to_decimal(data.tax_amount)),
            total_amount: money::to_f64(total),
        }
    } else {
        if data.amount.is_some() {
            return Err(AppError::validation(
                "provide either line items or a direct amount, not both",
            ));
        }
        money::recalculate(&mut items, data.tax_amount)?
    };

    let invoice_number = numbers.next().await?;
    let source_order_id = data
        .source_order_id
        .and_then(|raw| raw.parse::<RecordId>().ok());

    Ok(Invoice {
        id: None,
        invoice_number,
        client_name: data.client_name,
        client_email: data.client_email,
        client_phone: data.client_phone,
        client_address: data.client_address,
        items,
        subtotal: totals.subtotal,
        tax_amount: totals.tax_amount,
        total_amount: totals.total_amount,
        status,
        due_date,
        created_at: now,
        sent_at: (status == InvoiceStatus::Sent).then_some(now),
        paid_at: None,
        payment_terms: data.payment_terms,
        notes: data.notes,
        source_order_id,
        version: 1,
    })
}
