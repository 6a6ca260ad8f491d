//! Application state
//!
//! The composition root the UI layer holds: configuration, the store handle
//! and the repository bundle. Services are constructed per session with the
//! caller's policy.

use super::config::Config;
use super::policy::Policy;
use crate::billing::{BillingService, InvoiceNumberGenerator};
use crate::db::DbService;
use crate::db::repository::{ExpenseRepository, InvoiceRepository, OrderRepository};
use crate::expenses::ExpenseService;
use crate::orders::OrderService;
use crate::reports::ReportService;
use shared::AppResult;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub db: DbService,
    pub invoices: InvoiceRepository,
    pub orders: OrderRepository,
    pub expenses: ExpenseRepository,
}

impl AppState {
    /// Open the store at the configured path and wire the repositories
    pub async fn init(config: Config) -> AppResult<Self> {
        let db = DbService::open(&config.store_path()).await?;
        Ok(Self::wire(config, db))
    }

    /// In-memory store (tests, ephemeral sessions)
    pub async fn init_in_memory(config: Config) -> AppResult<Self> {
        let db = DbService::memory().await?;
        Ok(Self::wire(config, db))
    }

    fn wire(config: Config, db: DbService) -> Self {
        let handle = db.handle();
        Self {
            invoices: InvoiceRepository::new(handle.clone()),
            orders: OrderRepository::new(handle.clone()),
            expenses: ExpenseRepository::new(handle),
            config,
            db,
        }
    }

    fn number_generator(&self) -> InvoiceNumberGenerator {
        InvoiceNumberGenerator::new(
            self.db.handle(),
            self.config.invoice_prefix.clone(),
            self.config.timezone,
        )
    }

    /// Billing operations under the caller's policy
    pub fn billing_service(&self, policy: Policy) -> BillingService {
        BillingService::new(
            self.invoices.clone(),
            self.number_generator(),
            policy,
            self.config.currency_symbol.clone(),
        )
    }

    /// Order operations under the caller's policy
    pub fn order_service(&self, policy: Policy) -> OrderService {
        OrderService::new(
            self.orders.clone(),
            self.invoices.clone(),
            self.number_generator(),
            policy,
            self.config.invoice_due_days,
        )
    }

    /// Expense operations under the caller's policy
    pub fn expense_service(&self, policy: Policy) -> ExpenseService {
        ExpenseService::new(self.expenses.clone(), policy)
    }

    /// Reporting under the caller's policy
    pub fn report_service(&self, policy: Policy) -> ReportService {
        ReportService::new(
            self.orders.clone(),
            self.expenses.clone(),
            self.invoices.clone(),
            policy,
            self.config.timezone,
            self.config.currency_symbol.clone(),
        )
    }
}
