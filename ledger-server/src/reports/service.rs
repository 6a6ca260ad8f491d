//! Report Service
//!
//! Fetches the three entity kinds for a window and hands the slices to the
//! pure aggregation/export functions. Reports are recomputed on every call
//! and never cached beyond the request.

use super::aggregator;
use super::export::{self, DocumentMeta};
use crate::core::policy::Policy;
use crate::db::repository::{ExpenseRepository, InvoiceRepository, OrderRepository};
use chrono::Utc;
use shared::AppResult;
use shared::models::{ActivityEntry, Report, ReportWindow};

#[derive(Clone)]
pub struct ReportService {
    orders: OrderRepository,
    expenses: ExpenseRepository,
    invoices: InvoiceRepository,
    policy: Policy,
    tz: chrono_tz::Tz,
    currency_symbol: String,
}

impl ReportService {
    pub fn new(
        orders: OrderRepository,
        expenses: ExpenseRepository,
        invoices: InvoiceRepository,
        policy: Policy,
        tz: chrono_tz::Tz,
        currency_symbol: impl Into<String>,
    ) -> Self {
        Self {
            orders,
            expenses,
            invoices,
            policy,
            tz,
            currency_symbol: currency_symbol.into(),
        }
    }

    /// Aggregate the window into a report with the top `top_n` activity rows
    pub async fn aggregate(&self, window: ReportWindow, top_n: usize) -> AppResult<Report> {
        self.policy.require_view_reports()?;
        let orders = self.orders.find_in_window(window.start, window.end).await?;
        let expenses = self
            .expenses
            .find_in_window(window.start, window.end)
            .await?;
        let invoices = self
            .invoices
            .find_in_window(window.start, window.end)
            .await?;
        Ok(aggregator::build_report(
            window, &orders, &expenses, &invoices, self.tz, top_n,
        ))
    }

    /// Every ledger entry in the window, newest first (export input)
    pub async fn ledger_rows(&self, window: ReportWindow) -> AppResult<Vec<ActivityEntry>> {
        self.policy.require_view_reports()?;
        let orders = self.orders.find_in_window(window.start, window.end).await?;
        let expenses = self
            .expenses
            .find_in_window(window.start, window.end)
            .await?;
        let invoices = self
            .invoices
            .find_in_window(window.start, window.end)
            .await?;
        Ok(aggregator::activity_entries(&orders, &expenses, &invoices))
    }

    /// Serialize rows to the tabular export
    pub fn spreadsheet(&self, rows: &[ActivityEntry]) -> AppResult<Vec<u8>> {
        self.policy.require_view_reports()?;
        export::spreadsheet(rows)
    }

    /// Serialize a report and its rows to the paginated document export
    pub fn document(
        &self,
        report: &Report,
        rows: &[ActivityEntry],
        title: impl Into<String>,
        filter_label: impl Into<String>,
    ) -> AppResult<Vec<u8>> {
        self.policy.require_view_reports()?;
        let meta = DocumentMeta {
            title: title.into(),
            filter_label: filter_label.into(),
            generated_at: Utc::now(),
            currency_symbol: self.currency_symbol.clone(),
        };
        export::document(report, rows, &meta)
    }
}
