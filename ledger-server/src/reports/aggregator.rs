//! Financial Aggregation
//!
//! Turns raw order/expense/invoice records into the report the dashboard
//! charts and exporters consume. Revenue counts paid invoices only; the
//! value of completed orders is reported separately as pipeline revenue and
//! never summed into revenue, so an invoiced order is not counted twice.
//!
//! All monetary sums accumulate in `Decimal` and round once at the edge. A
//! window with no matching records produces an all-zero report with a dense
//! monthly series of the correct length, not an error.

use crate::db::models::{Expense, Invoice, Order};
use crate::money;
use chrono::{DateTime, Datelike, Duration, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;
use shared::models::{
    ActivityEntry, ActivityKind, CategoryTotal, ExpenseCategory, InvoiceStatus, MonthlySeries,
    OrderStatus, Report, ReportWindow,
};
use std::collections::HashMap;

/// Build the full report from records already fetched for the window
pub fn build_report(
    window: ReportWindow,
    orders: &[Order],
    expenses: &[Expense],
    invoices: &[Invoice],
    tz: Tz,
    top_n: usize,
) -> Report {
    let revenue: Decimal = invoices
        .iter()
        .filter(|invoice| invoice.status == InvoiceStatus::Paid)
        .map(|invoice| money::to_decimal(invoice.total_amount))
        .sum();

    let pipeline_revenue: Decimal = orders
        .iter()
        .filter(|order| order.status == OrderStatus::Completed)
        .map(|order| money::to_decimal(order.amount))
        .sum();

    let expense_total: Decimal = expenses
        .iter()
        .map(|expense| money::to_decimal(expense.amount))
        .sum();

    let mut recent_activity = activity_entries(orders, expenses, invoices);
    recent_activity.truncate(top_n);

    Report {
        window,
        total_revenue: money::to_f64(revenue),
        pipeline_revenue: money::to_f64(pipeline_revenue),
        total_orders: orders.len() as i64,
        total_expenses: money::to_f64(expense_total),
        net_profit: money::to_f64(revenue - expense_total),
        monthly: monthly_series(window, orders, expenses, invoices, tz),
        expense_categories: category_breakdown(expenses),
        recent_activity,
    }
}

/// Dense list of (year, month) buckets covered by the window
///
/// The upper bound is exclusive, so a window ending exactly on a month
/// boundary does not include that month.
pub fn month_buckets(window: ReportWindow, tz: Tz) -> Vec<(i32, u32)> {
    if window.end <= window.start {
        return Vec::new();
    }
    let start = window.start.with_timezone(&tz);
    let last = (window.end - Duration::milliseconds(1)).with_timezone(&tz);

    let mut buckets = Vec::new();
    let (mut year, mut month) = (start.year(), start.month());
    let (last_year, last_month) = (last.year(), last.month());
    loop {
        buckets.push((year, month));
        if (year, month) == (last_year, last_month) {
            break;
        }
        month += 1;
        if month > 12 {
            month = 1;
            year += 1;
        }
    }
    buckets
}

fn month_of(at: DateTime<Utc>, tz: Tz) -> (i32, u32) {
    let local = at.with_timezone(&tz);
    (local.year(), local.month())
}

fn monthly_series(
    window: ReportWindow,
    orders: &[Order],
    expenses: &[Expense],
    invoices: &[Invoice],
    tz: Tz,
) -> MonthlySeries {
    let buckets = month_buckets(window, tz);
    let index: HashMap<(i32, u32), usize> = buckets
        .iter()
        .enumerate()
        .map(|(i, &bucket)| (bucket, i))
        .collect();

    let mut revenue = vec![Decimal::ZERO; buckets.len()];
    let mut expense_sums = vec![Decimal::ZERO; buckets.len()];
    let mut order_counts = vec![0i64; buckets.len()];

    for invoice in invoices {
        if invoice.status != InvoiceStatus::Paid {
            continue;
        }
        if let Some(&i) = index.get(&month_of(invoice.created_at, tz)) {
            revenue[i] += money::to_decimal(invoice.total_amount);
        }
    }
    for expense in expenses {
        if let Some(&i) = index.get(&month_of(expense.date, tz)) {
            expense_sums[i] += money::to_decimal(expense.amount);
        }
    }
    for order in orders {
        if let Some(&i) = index.get(&month_of(order.date, tz)) {
            order_counts[i] += 1;
        }
    }

    MonthlySeries {
        labels: buckets
            .iter()
            .map(|(year, month)| format!("{:04}-{:02}", year, month))
            .collect(),
        revenue: revenue.into_iter().map(money::to_f64).collect(),
        expenses: expense_sums.into_iter().map(money::to_f64).collect(),
        orders: order_counts,
    }
}

/// Expense totals over the fixed category set, in display order
///
/// Every category appears, zero or not, so chart colors stay stable across
/// windows. Unknown or missing categories already folded into Other at read
/// time.
fn category_breakdown(expenses: &[Expense]) -> Vec<CategoryTotal> {
    let mut totals: HashMap<ExpenseCategory, Decimal> = HashMap::new();
    for expense in expenses {
        *totals.entry(expense.category).or_default() += money::to_decimal(expense.amount);
    }
    ExpenseCategory::ALL
        .iter()
        .map(|&category| CategoryTotal {
            category,
            label: category.label().to_string(),
            amount: money::to_f64(totals.get(&category).copied().unwrap_or_default()),
        })
        .collect()
}

/// Merge all three entity kinds into ledger entries, newest first
pub fn activity_entries(
    orders: &[Order],
    expenses: &[Expense],
    invoices: &[Invoice],
) -> Vec<ActivityEntry> {
    let mut entries = Vec::with_capacity(orders.len() + expenses.len() + invoices.len());

    for order in orders {
        let description = match &order.product_details {
            Some(product) => format!("{} x{}", product.product_name, product.quantity),
            None => format!("Order for {}", order.customer_name),
        };
        entries.push(ActivityEntry {
            kind: ActivityKind::Order,
            date: order.date,
            category: "Sales".to_string(),
            description,
            amount: order.amount,
        });
    }
    for expense in expenses {
        entries.push(ActivityEntry {
            kind: ActivityKind::Expense,
            date: expense.date,
            category: expense.category.label().to_string(),
            description: expense.description.clone(),
            amount: expense.amount,
        });
    }
    for invoice in invoices {
        entries.push(ActivityEntry {
            kind: ActivityKind::Invoice,
            date: invoice.created_at,
            category: "Billing".to_string(),
            description: format!("Invoice {} for {}", invoice.invoice_number, invoice.client_name),
            amount: invoice.total_amount,
        });
    }

    entries.sort_by(|a, b| b.date.cmp(&a.date));
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    fn window(start: DateTime<Utc>, end: DateTime<Utc>) -> ReportWindow {
        ReportWindow::new(start, end)
    }

    fn expense(amount: f64, at: DateTime<Utc>, category: ExpenseCategory) -> Expense {
        Expense {
            id: None,
            category,
            amount,
            date: at,
            description: "misc".to_string(),
            created_at: at,
        }
    }

    #[test]
    fn month_buckets_are_dense_across_year_boundary() {
        let w = window(utc(2025, 11, 10), utc(2026, 2, 5));
        assert_eq!(
            month_buckets(w, chrono_tz::UTC),
            vec![(2025, 11), (2025, 12), (2026, 1), (2026, 2)]
        );
    }

    #[test]
    fn month_buckets_exclusive_upper_bound() {
        // Window ending exactly at a month boundary excludes that month
        let w = window(
            Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap(),
        );
        assert_eq!(month_buckets(w, chrono_tz::UTC), vec![(2026, 1), (2026, 2)]);
    }

    #[test]
    fn empty_window_is_all_zero_with_dense_series() {
        let w = window(utc(2026, 1, 1), utc(2026, 4, 1));
        let report = build_report(w, &[], &[], &[], chrono_tz::UTC, 5);
        assert_eq!(report.total_revenue, 0.0);
        assert_eq!(report.pipeline_revenue, 0.0);
        assert_eq!(report.total_orders, 0);
        assert_eq!(report.total_expenses, 0.0);
        assert_eq!(report.net_profit, 0.0);
        assert_eq!(report.monthly.labels.len(), 3);
        assert_eq!(report.monthly.revenue, vec![0.0; 3]);
        assert_eq!(report.monthly.expenses, vec![0.0; 3]);
        assert_eq!(report.monthly.orders, vec![0; 3]);
        assert!(report.recent_activity.is_empty());
    }

    #[test]
    fn category_breakdown_covers_fixed_set() {
        let at = utc(2026, 1, 10);
        let expenses = vec![
            expense(50.0, at, ExpenseCategory::Travel),
            expense(25.5, at, ExpenseCategory::Travel),
            expense(10.0, at, ExpenseCategory::Other),
        ];
        let breakdown = category_breakdown(&expenses);
        assert_eq!(breakdown.len(), ExpenseCategory::ALL.len());
        let travel = breakdown
            .iter()
            .find(|t| t.category == ExpenseCategory::Travel)
            .unwrap();
        assert_eq!(travel.amount, 75.5);
        let software = breakdown
            .iter()
            .find(|t| t.category == ExpenseCategory::Software)
            .unwrap();
        assert_eq!(software.amount, 0.0);
    }

    #[test]
    fn activity_entries_sorted_newest_first() {
        let expenses = vec![
            expense(10.0, utc(2026, 1, 5), ExpenseCategory::Other),
            expense(20.0, utc(2026, 3, 5), ExpenseCategory::Other),
            expense(30.0, utc(2026, 2, 5), ExpenseCategory::Other),
        ];
        let entries = activity_entries(&[], &expenses, &[]);
        let amounts: Vec<f64> = entries.iter().map(|e| e.amount).collect();
        assert_eq!(amounts, vec![20.0, 30.0, 10.0]);
    }
}
