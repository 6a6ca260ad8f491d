//! Aggregation and export integration tests

use anyhow::Result;
use chrono::{Duration, Months, Utc};
use ledger_server::db::models::{ExpenseCreate, InvoiceCreate, LineItemInput, OrderCreate};
use ledger_server::reports::export;
use ledger_server::utils::time::window_from_dates;
use ledger_server::{AppState, Config, ErrorCode, Policy};
use shared::models::{ActivityKind, ExpenseCategory, ReportWindow};

async fn test_state() -> Result<AppState> {
    Ok(AppState::init_in_memory(Config::default()).await?)
}

/// Window from two months back through today, in the business timezone
fn recent_window(state: &AppState) -> ReportWindow {
    let today = Utc::now().date_naive();
    let start = today.checked_sub_months(Months::new(2)).unwrap();
    window_from_dates(start, today, state.config.timezone).unwrap()
}

async fn seed(state: &AppState) -> Result<()> {
    let policy = Policy::allow_all();
    let billing = state.billing_service(policy);
    let orders = state.order_service(policy);
    let expenses = state.expense_service(policy);

    // Paid invoice: 2500 + 200 tax
    let invoice = billing
        .create_invoice(InvoiceCreate {
            client_name: "Acme Studio".to_string(),
            client_email: "billing@acme.example".to_string(),
            client_phone: None,
            client_address: None,
            items: vec![
                LineItemInput {
                    description: "Design sprint".to_string(),
                    quantity: 2,
                    unit_rate: 500.0,
                },
                LineItemInput {
                    description: "Retainer".to_string(),
                    quantity: 1,
                    unit_rate: 1500.0,
                },
            ],
            tax_amount: 200.0,
            amount: None,
            due_date: Some(Utc::now() + Duration::days(30)),
            payment_terms: "Net 30".to_string(),
            notes: None,
            status: None,
            source_order_id: None,
        })
        .await?;
    let invoice_id = invoice.id.as_ref().unwrap().key().to_string();
    billing.send_invoice(&invoice_id).await?;
    billing.mark_paid(&invoice_id).await?;

    // Completed order: 1000, bridged invoice stays Sent (not revenue yet)
    let order = orders
        .create_order(OrderCreate {
            customer_name: "Orbit Media".to_string(),
            customer_email: "accounts@orbit.example".to_string(),
            amount: Some(1000.0),
            date: None,
            product_details: None,
        })
        .await?;
    let order_id = order.id.as_ref().unwrap().key().to_string();
    orders.start_processing(&order_id).await?;
    orders.complete_order(&order_id).await?;

    // One categorized expense
    expenses
        .record_expense(ExpenseCreate {
            category: ExpenseCategory::Travel,
            amount: 50.0,
            date: None,
            description: "Client visit".to_string(),
        })
        .await?;

    // One legacy expense with a category outside the fixed set
    state
        .db
        .handle()
        .query(
            "CREATE expense CONTENT {
                category: 'LUNCH',
                amount: 10.0,
                date: $now,
                description: 'Team lunch',
                created_at: $now
            }",
        )
        .bind(("now", Utc::now().timestamp_millis()))
        .await?
        .check()?;

    Ok(())
}

#[tokio::test]
async fn revenue_counts_paid_invoices_only() -> Result<()> {
    let state = test_state().await?;
    seed(&state).await?;
    let reports = state.report_service(Policy::allow_all());
    let report = reports.aggregate(recent_window(&state), 10).await?;

    // 2700 paid; the 1000 completed order is pipeline, never revenue
    assert_eq!(report.total_revenue, 2700.0);
    assert_eq!(report.pipeline_revenue, 1000.0);
    assert_eq!(report.total_orders, 1);
    assert_eq!(report.total_expenses, 60.0);
    assert_eq!(report.net_profit, 2640.0);
    Ok(())
}

#[tokio::test]
async fn monthly_series_is_dense_and_equal_length() -> Result<()> {
    let state = test_state().await?;
    seed(&state).await?;
    let reports = state.report_service(Policy::allow_all());
    let report = reports.aggregate(recent_window(&state), 10).await?;

    let months = report.monthly.labels.len();
    assert!(months >= 2, "window spans at least two calendar months");
    assert_eq!(report.monthly.revenue.len(), months);
    assert_eq!(report.monthly.expenses.len(), months);
    assert_eq!(report.monthly.orders.len(), months);

    // all activity was seeded today, so it lands in the last bucket and the
    // earlier months stay present with zeros
    assert_eq!(report.monthly.revenue[months - 1], 2700.0);
    assert_eq!(report.monthly.revenue[0], 0.0);
    assert_eq!(report.monthly.orders.iter().sum::<i64>(), 1);
    Ok(())
}

#[tokio::test]
async fn unknown_expense_category_lands_in_other() -> Result<()> {
    let state = test_state().await?;
    seed(&state).await?;
    let reports = state.report_service(Policy::allow_all());
    let report = reports.aggregate(recent_window(&state), 10).await?;

    assert_eq!(report.expense_categories.len(), ExpenseCategory::ALL.len());
    let by_category = |category: ExpenseCategory| {
        report
            .expense_categories
            .iter()
            .find(|t| t.category == category)
            .map(|t| t.amount)
            .unwrap()
    };
    assert_eq!(by_category(ExpenseCategory::Travel), 50.0);
    assert_eq!(by_category(ExpenseCategory::Other), 10.0);
    assert_eq!(by_category(ExpenseCategory::Marketing), 0.0);
    Ok(())
}

#[tokio::test]
async fn top_n_activity_is_truncated_and_newest_first() -> Result<()> {
    let state = test_state().await?;
    seed(&state).await?;
    let reports = state.report_service(Policy::allow_all());

    let report = reports.aggregate(recent_window(&state), 2).await?;
    assert_eq!(report.recent_activity.len(), 2);

    // 1 order + 2 expenses + 2 invoices (manual + bridged)
    let rows = reports.ledger_rows(recent_window(&state)).await?;
    assert_eq!(rows.len(), 5);
    for pair in rows.windows(2) {
        assert!(pair[0].date >= pair[1].date);
    }
    assert!(rows.iter().any(|r| r.kind == ActivityKind::Order));
    assert!(rows.iter().any(|r| r.kind == ActivityKind::Invoice));
    Ok(())
}

#[tokio::test]
async fn empty_window_reports_all_zeros_with_dense_series() -> Result<()> {
    let state = test_state().await?;
    seed(&state).await?;
    let reports = state.report_service(Policy::allow_all());

    let start = ledger_server::utils::time::parse_date("2020-01-01").unwrap();
    let end = ledger_server::utils::time::parse_date("2020-02-29").unwrap();
    let window = window_from_dates(start, end, state.config.timezone)?;

    let report = reports.aggregate(window, 5).await?;
    assert_eq!(report.total_revenue, 0.0);
    assert_eq!(report.total_orders, 0);
    assert_eq!(report.total_expenses, 0.0);
    assert_eq!(report.monthly.labels, vec!["2020-01", "2020-02"]);
    assert_eq!(report.monthly.revenue, vec![0.0, 0.0]);
    assert!(report.recent_activity.is_empty());
    Ok(())
}

#[tokio::test]
async fn spreadsheet_export_has_fixed_header_and_one_line_per_row() -> Result<()> {
    let state = test_state().await?;
    seed(&state).await?;
    let reports = state.report_service(Policy::allow_all());

    let rows = reports.ledger_rows(recent_window(&state)).await?;
    let bytes = reports.spreadsheet(&rows)?;
    let text = String::from_utf8(bytes)?;
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "Type,Date,Category,Description,Amount");
    assert_eq!(lines.len(), rows.len() + 1);
    assert!(text.contains("Expense"));
    assert!(text.contains("2700.00"));
    Ok(())
}

#[tokio::test]
async fn document_export_survives_empty_row_set() -> Result<()> {
    let state = test_state().await?;
    let reports = state.report_service(Policy::allow_all());

    let start = ledger_server::utils::time::parse_date("2020-01-01").unwrap();
    let end = ledger_server::utils::time::parse_date("2020-01-31").unwrap();
    let window = window_from_dates(start, end, state.config.timezone)?;
    let report = reports.aggregate(window, 5).await?;

    let bytes = reports.document(&report, &[], "Finance report", "Jan 2020")?;
    assert!(bytes.starts_with(b"%PDF"));
    Ok(())
}

#[tokio::test]
async fn document_export_renders_rows() -> Result<()> {
    let state = test_state().await?;
    seed(&state).await?;
    let reports = state.report_service(Policy::allow_all());

    let window = recent_window(&state);
    let report = reports.aggregate(window, 10).await?;
    let rows = reports.ledger_rows(window).await?;
    let bytes = reports.document(&report, &rows, "Finance report", "Last 2 months")?;
    assert!(bytes.starts_with(b"%PDF"));
    assert!(bytes.len() > 1000);
    Ok(())
}

#[tokio::test]
async fn reporting_requires_the_capability() -> Result<()> {
    let state = test_state().await?;
    let no_reports = Policy {
        view_reports: false,
        ..Policy::allow_all()
    };
    let reports = state.report_service(no_reports);
    let err = reports
        .aggregate(recent_window(&state), 5)
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::PermissionDenied);
    Ok(())
}

#[tokio::test]
async fn filename_helpers_follow_the_export_contract() {
    let date = ledger_server::utils::time::parse_date("2026-08-07").unwrap();
    assert_eq!(
        export::report_spreadsheet_filename("finance", date),
        "finance-report-2026-08-07.csv"
    );
    assert_eq!(
        export::invoice_document_filename("INV-202608-007"),
        "Invoice-INV-202608-007.pdf"
    );
}
