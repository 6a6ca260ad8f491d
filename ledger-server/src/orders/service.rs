//! Order Service
//!
//! Policy-gated order operations. Completion runs the invoice bridge
//! synchronously: the status change (with its outbox marker) and the invoice
//! write are two independent store round-trips, so a failure in the second
//! step never rolls back the first. The failure is logged, surfaced on the
//! completion result, and repaired by the reconcile sweep.

use super::bridge;
use crate::billing::number::InvoiceNumberGenerator;
use crate::billing::service::prepare_invoice;
use crate::core::policy::Policy;
use crate::db::models::{Invoice, Order, OrderCreate, OrderUpdate};
use crate::db::repository::{InvoiceRepository, OrderRepository};
use chrono::Utc;
use shared::models::OrderStatus;
use shared::{AppError, AppResult};
use validator::Validate;

/// Outcome of completing an order
///
/// `pipeline_failure` is set when the order completed but the invoice did
/// not materialize; the order keeps its outbox marker for reconciliation.
#[derive(Debug)]
pub struct OrderCompletion {
    pub order: Order,
    pub invoice: Option<Invoice>,
    pub pipeline_failure: Option<AppError>,
}

#[derive(Clone)]
pub struct OrderService {
    orders: OrderRepository,
    invoices: InvoiceRepository,
    numbers: InvoiceNumberGenerator,
    policy: Policy,
    due_days: i64,
}

impl OrderService {
    pub fn new(
        orders: OrderRepository,
        invoices: InvoiceRepository,
        numbers: InvoiceNumberGenerator,
        policy: Policy,
        due_days: i64,
    ) -> Self {
        Self {
            orders,
            invoices,
            numbers,
            policy,
            due_days,
        }
    }

    pub async fn create_order(&self, data: OrderCreate) -> AppResult<Order> {
        self.policy.require_manage_orders()?;
        data.validate()
            .map_err(|e| AppError::validation(e.to_string()))?;
        let created = self.orders.create(data).await?;
        tracing::info!(
            customer = %created.customer_name,
            amount = created.amount,
            "Order created"
        );
        Ok(created)
    }

    pub async fn update_order(&self, id: &str, data: OrderUpdate) -> AppResult<Order> {
        self.policy.require_manage_orders()?;
        data.validate()
            .map_err(|e| AppError::validation(e.to_string()))?;
        Ok(self.orders.update(id, data).await?)
    }

    pub async fn list_orders(&self) -> AppResult<Vec<Order>> {
        Ok(self.orders.find_all().await?)
    }

    pub async fn get_order(&self, id: &str) -> AppResult<Order> {
        self.orders
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Order"))
    }

    pub async fn delete_order(&self, id: &str) -> AppResult<()> {
        self.policy.require_manage_orders()?;
        if !self.orders.delete(id).await? {
            return Err(AppError::not_found("Order"));
        }
        Ok(())
    }

    pub async fn start_processing(&self, id: &str) -> AppResult<Order> {
        self.policy.require_manage_orders()?;
        Ok(self
            .orders
            .transition(id, OrderStatus::Processing, Utc::now())
            .await?)
    }

    pub async fn cancel_order(&self, id: &str) -> AppResult<Order> {
        self.policy.require_manage_orders()?;
        Ok(self
            .orders
            .transition(id, OrderStatus::Cancelled, Utc::now())
            .await?)
    }

    /// Complete an order and bridge it to an invoice
    pub async fn complete_order(&self, id: &str) -> AppResult<OrderCompletion> {
        self.policy.require_manage_orders()?;
        let order = self
            .orders
            .transition(id, OrderStatus::Completed, Utc::now())
            .await?;

        match self.bridge_invoice(&order).await {
            Ok(invoice) => {
                let order = match invoice.id.as_ref() {
                    Some(invoice_id) => self.orders.attach_invoice(id, invoice_id).await?,
                    None => order,
                };
                tracing::info!(
                    order_id = %id,
                    invoice_number = %invoice.invoice_number,
                    "Order completed and invoiced"
                );
                Ok(OrderCompletion {
                    order,
                    invoice: Some(invoice),
                    pipeline_failure: None,
                })
            }
            Err(e) => {
                tracing::error!(
                    order_id = %id,
                    error = %e,
                    "Order completed but invoice creation failed; left for reconciliation"
                );
                let failure = AppError::pipeline_failure(id, e.message.clone());
                Ok(OrderCompletion {
                    order,
                    invoice: None,
                    pipeline_failure: Some(failure),
                })
            }
        }
    }

    /// Create the missing invoices for completed orders whose bridge failed
    pub async fn reconcile_pending_invoices(&self) -> AppResult<Vec<Invoice>> {
        self.policy.require_manage_orders()?;
        let pending = self.orders.find_pending_invoices().await?;
        let mut created = Vec::new();
        for order in pending {
            let Some(order_id) = order.id.as_ref().map(|id| id.key().to_string()) else {
                continue;
            };
            match self.bridge_invoice(&order).await {
                Ok(invoice) => {
                    if let Some(invoice_id) = invoice.id.as_ref() {
                        self.orders.attach_invoice(&order_id, invoice_id).await?;
                    }
                    tracing::info!(
                        order_id = %order_id,
                        invoice_number = %invoice.invoice_number,
                        "Reconciled missing invoice"
                    );
                    created.push(invoice);
                }
                Err(e) => {
                    tracing::error!(
                        order_id = %order_id,
                        error = %e,
                        "Reconciliation could not create invoice"
                    );
                }
            }
        }
        tracing::info!(count = created.len(), "Invoice reconciliation sweep finished");
        Ok(created)
    }

    async fn bridge_invoice(&self, order: &Order) -> AppResult<Invoice> {
        let completed_at = order.completed_at.unwrap_or_else(Utc::now);
        let request = bridge::invoice_request_from(order, completed_at, self.due_days);
        let invoice = prepare_invoice(request, &self.numbers, completed_at).await?;
        Ok(self.invoices.create(invoice).await?)
    }
}
