//! Financial report shapes
//!
//! Ephemeral aggregation output consumed by the dashboard charts and the
//! exporters. Recomputed on every request; never persisted.

use crate::models::ExpenseCategory;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Time range scoping revenue/expense/order queries for reporting
///
/// Inclusive lower bound, exclusive upper bound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReportWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ReportWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        at >= self.start && at < self.end
    }
}

/// Kind tag for a merged ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityKind {
    Order,
    Expense,
    Invoice,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Order => "Order",
            ActivityKind::Expense => "Expense",
            ActivityKind::Invoice => "Invoice",
        }
    }
}

/// One merged ledger entry: an order, expense, or invoice flattened to the
/// fixed export columns (Type, Date, Category, Description, Amount)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub kind: ActivityKind,
    pub date: DateTime<Utc>,
    pub category: String,
    pub description: String,
    pub amount: f64,
}

/// Dense calendar-month series
///
/// All vectors have the same length as `labels`; months with no activity are
/// present with value 0 so chart components receive equal-length arrays.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonthlySeries {
    /// Month labels, `YYYY-MM`, oldest first
    pub labels: Vec<String>,
    pub revenue: Vec<f64>,
    pub expenses: Vec<f64>,
    pub orders: Vec<i64>,
}

/// Expense total for one category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryTotal {
    pub category: ExpenseCategory,
    /// Display label ("Office Supplies", ...)
    pub label: String,
    pub amount: f64,
}

/// Aggregated financial report over a window
///
/// Revenue counts paid invoices only; the value of completed orders that may
/// not have been invoiced yet is reported separately as `pipeline_revenue`
/// and is never summed into `total_revenue`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub window: ReportWindow,
    /// Sum of paid-invoice totals in the window
    pub total_revenue: f64,
    /// Sum of completed-order amounts in the window (provisional metric)
    pub pipeline_revenue: f64,
    /// Count of orders dated in the window, any status
    pub total_orders: i64,
    /// Sum of expense amounts in the window, unconditional
    pub total_expenses: f64,
    /// total_revenue - total_expenses
    pub net_profit: f64,
    pub monthly: MonthlySeries,
    /// One entry per category in [`ExpenseCategory::ALL`] order
    pub expense_categories: Vec<CategoryTotal>,
    /// Most recent N entries across orders, expenses and invoices
    pub recent_activity: Vec<ActivityEntry>,
}
