//! Order lifecycle and order→invoice bridge integration tests

use anyhow::Result;
use chrono::{Duration, Utc};
use ledger_server::db::models::{OrderCreate, ProductDetails};
use ledger_server::{AppState, Config, ErrorCode, Policy};
use shared::models::{InvoiceStatus, OrderStatus};

async fn test_state() -> Result<AppState> {
    Ok(AppState::init_in_memory(Config::default()).await?)
}

fn order_request(amount: f64) -> OrderCreate {
    OrderCreate {
        customer_name: "Orbit Media".to_string(),
        customer_email: "accounts@orbit.example".to_string(),
        amount: Some(amount),
        date: None,
        product_details: None,
    }
}

#[tokio::test]
async fn completed_order_spawns_sent_invoice() -> Result<()> {
    let state = test_state().await?;
    let orders = state.order_service(Policy::allow_all());

    let order = orders.create_order(order_request(1000.0)).await?;
    assert_eq!(order.status, OrderStatus::Pending);
    let id = order.id.as_ref().unwrap().key().to_string();

    orders.start_processing(&id).await?;
    let completion = orders.complete_order(&id).await?;
    assert!(completion.pipeline_failure.is_none());

    let invoice = completion.invoice.expect("bridge must create an invoice");
    // amount maps directly; no synthetic line items
    assert_eq!(invoice.total_amount, 1000.0);
    assert!(invoice.items.is_empty());
    assert_eq!(invoice.status, InvoiceStatus::Sent);
    assert_eq!(invoice.client_name, "Orbit Media");

    let completed_at = completion.order.completed_at.expect("completion stamp");
    assert_eq!(invoice.due_date, completed_at + Duration::days(15));

    // outbox marker cleared, provenance recorded both ways
    assert!(!completion.order.invoice_pending);
    assert!(completion.order.invoice_id.is_some());
    assert!(invoice.source_order_id.is_some());
    Ok(())
}

#[tokio::test]
async fn order_flow_is_stepwise_and_cancellation_is_terminal() -> Result<()> {
    let state = test_state().await?;
    let orders = state.order_service(Policy::allow_all());

    let order = orders.create_order(order_request(300.0)).await?;
    let id = order.id.as_ref().unwrap().key().to_string();

    // pending cannot jump straight to completed
    let err = orders.complete_order(&id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidStatusTransition);

    orders.start_processing(&id).await?;
    let cancelled = orders.cancel_order(&id).await?;
    assert_eq!(cancelled.status, OrderStatus::Cancelled);

    // cancelled is terminal
    let err = orders.start_processing(&id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidStatusTransition);
    Ok(())
}

#[tokio::test]
async fn completed_orders_cannot_be_cancelled() -> Result<()> {
    let state = test_state().await?;
    let orders = state.order_service(Policy::allow_all());

    let order = orders.create_order(order_request(250.0)).await?;
    let id = order.id.as_ref().unwrap().key().to_string();
    orders.start_processing(&id).await?;
    orders.complete_order(&id).await?;

    let err = orders.cancel_order(&id).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidStatusTransition);
    Ok(())
}

#[tokio::test]
async fn price_change_requires_a_reason() -> Result<()> {
    let state = test_state().await?;
    let orders = state.order_service(Policy::allow_all());

    let discounted = ProductDetails {
        product_id: "product:brand-kit".to_string(),
        product_name: "Brand kit".to_string(),
        original_price: 100.0,
        quantity: 2,
        unit_price: 80.0,
        price_change_reason: None,
    };

    // charged 160 against a 200 catalog amount, no reason: rejected
    let mut request = order_request(160.0);
    request.product_details = Some(discounted.clone());
    let err = orders.create_order(request).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::PriceChangeReasonRequired);

    // same change with a reason: accepted
    let mut request = order_request(160.0);
    request.product_details = Some(ProductDetails {
        price_change_reason: Some("Returning client discount".to_string()),
        ..discounted
    });
    let order = orders.create_order(request).await?;
    assert_eq!(order.amount, 160.0);

    // catalog-priced order needs no reason
    let mut request = order_request(200.0);
    request.product_details = Some(ProductDetails {
        product_id: "product:brand-kit".to_string(),
        product_name: "Brand kit".to_string(),
        original_price: 100.0,
        quantity: 2,
        unit_price: 100.0,
        price_change_reason: None,
    });
    orders.create_order(request).await?;
    Ok(())
}

#[tokio::test]
async fn amount_derives_from_product_snapshot_when_absent() -> Result<()> {
    let state = test_state().await?;
    let orders = state.order_service(Policy::allow_all());

    let mut request = order_request(0.0);
    request.amount = None;
    request.product_details = Some(ProductDetails {
        product_id: "product:seo-audit".to_string(),
        product_name: "SEO audit".to_string(),
        original_price: 350.0,
        quantity: 2,
        unit_price: 350.0,
        price_change_reason: None,
    });
    let order = orders.create_order(request).await?;
    assert_eq!(order.amount, 700.0);
    Ok(())
}

#[tokio::test]
async fn create_rejects_missing_customer_fields() -> Result<()> {
    let state = test_state().await?;
    let orders = state.order_service(Policy::allow_all());

    let mut request = order_request(100.0);
    request.customer_name = "  ".to_string();
    let err = orders.create_order(request).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::RequiredField);

    let mut request = order_request(100.0);
    request.amount = None;
    let err = orders.create_order(request).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::RequiredField);
    Ok(())
}

#[tokio::test]
async fn reconcile_creates_missing_invoices() -> Result<()> {
    let state = test_state().await?;
    let orders = state.order_service(Policy::allow_all());

    let order = orders.create_order(order_request(450.0)).await?;
    let id = order.id.as_ref().unwrap().key().to_string();
    orders.start_processing(&id).await?;

    // Simulate the crash window: the status change (with its outbox marker)
    // landed but the invoice write never happened
    state
        .orders
        .transition(&id, OrderStatus::Completed, Utc::now())
        .await?;

    let stranded = state.orders.find_pending_invoices().await?;
    assert_eq!(stranded.len(), 1);

    let created = orders.reconcile_pending_invoices().await?;
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].total_amount, 450.0);
    assert_eq!(created[0].status, InvoiceStatus::Sent);

    // marker cleared; a second sweep finds nothing
    assert!(state.orders.find_pending_invoices().await?.is_empty());
    assert!(orders.reconcile_pending_invoices().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn pending_order_edits_only() -> Result<()> {
    let state = test_state().await?;
    let orders = state.order_service(Policy::allow_all());

    let order = orders.create_order(order_request(120.0)).await?;
    let id = order.id.as_ref().unwrap().key().to_string();
    orders.start_processing(&id).await?;

    let err = orders
        .update_order(
            &id,
            ledger_server::db::models::OrderUpdate {
                amount: Some(150.0),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code, ErrorCode::ValidationFailed);
    Ok(())
}
