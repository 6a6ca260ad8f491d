use super::*;
use shared::ErrorCode;

fn item(quantity: i32, unit_rate: f64) -> LineItem {
    LineItem {
        description: "work".to_string(),
        quantity,
        unit_rate,
        amount: 0.0,
    }
}

#[test]
fn test_to_decimal_precision() {
    // Classic floating point problem: 0.1 + 0.2 != 0.3
    let a = 0.1_f64;
    let b = 0.2_f64;
    let sum_f64 = a + b;

    // f64 fails
    assert_ne!(sum_f64, 0.3);

    // Decimal succeeds
    let sum_dec = to_decimal(a) + to_decimal(b);
    assert_eq!(to_f64(sum_dec), 0.3);
}

#[test]
fn test_accumulation_precision() {
    // Sum 0.01 one thousand times
    let mut total = Decimal::ZERO;
    for _ in 0..1000 {
        total += to_decimal(0.01);
    }
    assert_eq!(to_f64(total), 10.0);
}

#[test]
fn test_line_amount_basic() {
    assert_eq!(to_f64(line_amount(3, 10.99).unwrap()), 32.97);
    assert_eq!(to_f64(line_amount(1, 0.0).unwrap()), 0.0);
}

#[test]
fn test_line_amount_rejects_bad_quantity() {
    for quantity in [0, -1, 10_000] {
        let err = line_amount(quantity, 10.0).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidLineItem);
    }
}

#[test]
fn test_line_amount_rejects_bad_rate() {
    for rate in [-0.01, f64::NAN, f64::INFINITY, 2_000_000.0] {
        let err = line_amount(1, rate).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidLineItem);
    }
}

#[test]
fn test_subtotal_empty_is_zero() {
    assert_eq!(subtotal(&[]).unwrap(), Decimal::ZERO);
}

#[test]
fn test_subtotal_matches_sum_of_line_amounts() {
    let items = vec![item(2, 500.0), item(1, 1500.0), item(3, 33.33)];
    let expected: Decimal = items
        .iter()
        .map(|i| line_amount(i.quantity, i.unit_rate).unwrap())
        .sum();
    assert_eq!(subtotal(&items).unwrap(), expected);
}

#[test]
fn test_total_rejects_negative_tax() {
    let err = total(Decimal::from(100), -1.0).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidTax);
    let err = total(Decimal::from(100), f64::NAN).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidTax);
}

#[test]
fn test_recalculate_scenario() {
    // items = [{qty:2, rate:500},{qty:1, rate:1500}], tax=200
    let mut items = vec![item(2, 500.0), item(1, 1500.0)];
    let totals = recalculate(&mut items, 200.0).unwrap();

    assert_eq!(items[0].amount, 1000.0);
    assert_eq!(items[1].amount, 1500.0);
    assert_eq!(totals.subtotal, 2500.0);
    assert_eq!(totals.tax_amount, 200.0);
    assert_eq!(totals.total_amount, 2700.0);
}

#[test]
fn test_recalculate_overwrites_stale_amounts() {
    // A tampered stored amount is never trusted
    let mut items = vec![LineItem {
        description: "consulting".to_string(),
        quantity: 2,
        unit_rate: 50.0,
        amount: 999.99,
    }];
    let totals = recalculate(&mut items, 0.0).unwrap();
    assert_eq!(items[0].amount, 100.0);
    assert_eq!(totals.total_amount, 100.0);
}

#[test]
fn test_recalculate_empty_items_with_tax() {
    let totals = recalculate(&mut [], 10.0).unwrap();
    assert_eq!(totals.subtotal, 0.0);
    assert_eq!(totals.total_amount, 10.0);
}

#[test]
fn test_fractional_rate_rounding() {
    // 3 × 0.335 = 1.005 rounds half-up to 1.01
    assert_eq!(to_f64(line_amount(3, 0.335).unwrap()), 1.01);
}

#[test]
fn test_money_eq_tolerance() {
    assert!(money_eq(10.0, 10.0));
    assert!(money_eq(10.0, 10.004));
    assert!(!money_eq(10.0, 10.02));
}
