#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;

fn make_expense(amount: Decimal) -> Expense {
    Expense::new("Food", "Lunch", amount, Bill::No, "2024-01-15")
}

// ── Bill ──────────────────────────────────────────────────────

#[test]
fn test_bill_parse() {
    assert_eq!(Bill::parse("Yes"), Bill::Yes);
    assert_eq!(Bill::parse("y"), Bill::Yes);
    assert_eq!(Bill::parse(" TRUE "), Bill::Yes);
    assert_eq!(Bill::parse("No"), Bill::No);
    assert_eq!(Bill::parse(""), Bill::No);
    assert_eq!(Bill::parse("maybe"), Bill::No);
}

#[test]
fn test_bill_toggle_and_display() {
    assert_eq!(Bill::No.toggle(), Bill::Yes);
    assert_eq!(Bill::Yes.toggle(), Bill::No);
    assert_eq!(Bill::Yes.to_string(), "Yes");
    assert_eq!(Bill::default(), Bill::No);
}

#[test]
fn test_bill_loads_leniently() {
    let bills: Vec<Bill> = serde_json::from_str(r#"["Yes", "yes", "No", "unknown"]"#).unwrap();
    assert_eq!(bills, vec![Bill::Yes, Bill::Yes, Bill::No, Bill::No]);
}

// ── parse_amount ──────────────────────────────────────────────

#[test]
fn test_parse_amount_basic() {
    assert_eq!(parse_amount("200"), dec!(200));
    assert_eq!(parse_amount("12.50"), dec!(12.50));
    assert_eq!(parse_amount("  7 "), dec!(7));
}

#[test]
fn test_parse_amount_strips_symbols() {
    assert_eq!(parse_amount("$1,234.56"), dec!(1234.56));
    assert_eq!(parse_amount("₹500"), dec!(500));
}

#[test]
fn test_parse_amount_scientific() {
    assert_eq!(parse_amount("1e3"), dec!(1000));
}

#[test]
fn test_parse_amount_malformed_is_zero() {
    assert_eq!(parse_amount(""), Decimal::ZERO);
    assert_eq!(parse_amount("abc"), Decimal::ZERO);
    assert_eq!(parse_amount("12abc"), Decimal::ZERO);
    assert_eq!(parse_amount("NaN"), Decimal::ZERO);
}

#[test]
fn test_parse_amount_negative_is_zero() {
    assert_eq!(parse_amount("-5"), Decimal::ZERO);
    assert_eq!(parse_amount("-0.01"), Decimal::ZERO);
}

// ── ExpensePatch ──────────────────────────────────────────────

#[test]
fn test_empty_patch_changes_nothing() {
    let mut expense = make_expense(dec!(10)).with_image("data:image/jpeg;base64,AAAA");
    let before = expense.clone();
    let patch = ExpensePatch::default();
    assert!(patch.is_empty());
    patch.apply(&mut expense);
    assert_eq!(expense, before);
}

#[test]
fn test_patch_overrides_only_present_fields() {
    let mut expense = make_expense(dec!(10)).with_image("data:image/jpeg;base64,AAAA");
    let patch = ExpensePatch {
        amount: Some(dec!(25)),
        bill: Some(Bill::Yes),
        ..Default::default()
    };
    assert!(!patch.is_empty());
    patch.apply(&mut expense);
    assert_eq!(expense.amount, dec!(25));
    assert_eq!(expense.bill, Bill::Yes);
    assert_eq!(expense.kind, "Food");
    assert_eq!(expense.description, "Lunch");
    assert_eq!(expense.date, "2024-01-15");
    assert_eq!(expense.image.as_deref(), Some("data:image/jpeg;base64,AAAA"));
}

// ── JSON format ───────────────────────────────────────────────

#[test]
fn test_json_field_names() {
    let expense = make_expense(dec!(200));
    let value: serde_json::Value = serde_json::to_value(&expense).unwrap();
    assert_eq!(value["type"], "Food");
    assert_eq!(value["description"], "Lunch");
    assert_eq!(value["amount"], serde_json::json!(200));
    assert_eq!(value["bill"], "No");
    assert_eq!(value["date"], "2024-01-15");
    assert!(value["image"].is_null());
}

#[test]
fn test_json_amount_keeps_fraction() {
    let json = serde_json::to_string(&make_expense(dec!(12.50))).unwrap();
    assert!(json.contains("\"amount\":12.5"));
}

#[test]
fn test_json_roundtrip() {
    let expense = make_expense(dec!(99.99)).with_image("data:image/png;base64,iVBO");
    let json = serde_json::to_string(&expense).unwrap();
    let back: Expense = serde_json::from_str(&json).unwrap();
    assert_eq!(back, expense);
}

#[test]
fn test_json_high_precision_amount_roundtrips_exactly() {
    let expense = make_expense(dec!(0.1234567890123456789));
    let json = serde_json::to_string(&expense).unwrap();
    let back: Expense = serde_json::from_str(&json).unwrap();
    assert_eq!(back.amount, dec!(0.1234567890123456789));
}

#[test]
fn test_json_lenient_amounts() {
    let json = r#"[
        {"type":"Food","description":"a","amount":"42.5","bill":"No","date":"2024-01-01","image":null},
        {"type":"Food","description":"b","amount":null,"bill":"No","date":"2024-01-01","image":null},
        {"type":"Food","description":"c","amount":"oops","bill":"No","date":"2024-01-01"},
        {"type":"Food","description":"d","amount":-3,"bill":"Yes","date":"2024-01-01","image":null}
    ]"#;
    let expenses: Vec<Expense> = serde_json::from_str(json).unwrap();
    assert_eq!(expenses[0].amount, dec!(42.5));
    assert_eq!(expenses[1].amount, Decimal::ZERO);
    assert_eq!(expenses[2].amount, Decimal::ZERO);
    assert_eq!(expenses[2].image, None);
    assert_eq!(expenses[3].amount, Decimal::ZERO);
    assert_eq!(expenses[3].bill, Bill::Yes);
}

// ── Dates ─────────────────────────────────────────────────────

#[test]
fn test_parse_date() {
    assert_eq!(parse_date("2024-03-01").as_deref(), Some("2024-03-01"));
    assert_eq!(parse_date(" 2024-3-1 ").as_deref(), Some("2024-03-01"));
    assert_eq!(parse_date("2024-02-30"), None);
    assert_eq!(parse_date("01/03/2024"), None);
    assert_eq!(parse_date(""), None);
}

#[test]
fn test_today_is_a_valid_date() {
    let today = today();
    assert_eq!(parse_date(&today), Some(today));
}
