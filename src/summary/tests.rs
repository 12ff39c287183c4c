#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::models::{Bill, Expense};

fn expenses(amounts: &[Decimal]) -> Vec<Expense> {
    amounts
        .iter()
        .map(|a| Expense::new("Food", "test", *a, Bill::No, "2024-01-01"))
        .collect()
}

// ── Totals ────────────────────────────────────────────────────

#[test]
fn test_empty_ledger_zero_budget() {
    let s = Summary::compute(&[], Decimal::ZERO);
    assert_eq!(s.total, Decimal::ZERO);
    assert_eq!(s.remaining, Decimal::ZERO);
    assert_eq!(s.percentage, Decimal::ZERO);
    assert_eq!(s.tier, Tier::Critical);
    assert_eq!(s.label(), "0%");
}

#[test]
fn test_remaining_is_exact() {
    let list = expenses(&[dec!(0.1), dec!(0.2), dec!(19.99)]);
    let s = Summary::compute(&list, dec!(100.3));
    assert_eq!(s.total, dec!(20.29));
    assert_eq!(s.remaining, dec!(80.01));
    assert_eq!(s.remaining, s.budget - s.total);
}

#[test]
fn test_remaining_matches_budget_minus_total_for_many_inputs() {
    let budgets = [dec!(0), dec!(1), dec!(99.99), dec!(1000), dec!(123456.78)];
    let sets: [&[Decimal]; 4] = [
        &[],
        &[dec!(5)],
        &[dec!(0.01), dec!(0.02), dec!(0.03)],
        &[dec!(500), dec!(700.25), dec!(1)],
    ];
    for budget in budgets {
        for set in sets {
            let list = expenses(set);
            let s = Summary::compute(&list, budget);
            let sum: Decimal = set.iter().copied().sum();
            assert_eq!(s.remaining, budget - sum);
            if budget > Decimal::ZERO {
                assert!(s.percentage >= Decimal::ZERO && s.percentage <= dec!(100));
            } else {
                assert_eq!(s.percentage, Decimal::ZERO);
            }
            if s.remaining < Decimal::ZERO {
                assert_eq!(s.tier, Tier::OverBudget);
            }
        }
    }
}

// ── Scenarios ─────────────────────────────────────────────────

#[test]
fn test_half_spent_is_warning() {
    let list = expenses(&[dec!(200), dec!(300)]);
    let s = Summary::compute(&list, dec!(1000));
    assert_eq!(s.total, dec!(500));
    assert_eq!(s.remaining, dec!(500));
    assert_eq!(s.percentage, dec!(50));
    assert_eq!(s.tier, Tier::Warning);
    assert_eq!(s.label(), "50%");
}

#[test]
fn test_over_budget() {
    let list = expenses(&[dec!(150)]);
    let s = Summary::compute(&list, dec!(100));
    assert_eq!(s.remaining, dec!(-50));
    assert_eq!(s.percentage, Decimal::ZERO);
    assert_eq!(s.tier, Tier::OverBudget);
    assert!(s.is_over_budget());
    assert_eq!(s.label(), OVER_BUDGET_LABEL);
}

#[test]
fn test_over_budget_with_zero_budget() {
    let list = expenses(&[dec!(1)]);
    let s = Summary::compute(&list, Decimal::ZERO);
    assert_eq!(s.remaining, dec!(-1));
    assert_eq!(s.percentage, Decimal::ZERO);
    assert_eq!(s.tier, Tier::OverBudget);
}

#[test]
fn test_over_budget_by_a_cent() {
    let list = expenses(&[dec!(100.01)]);
    let s = Summary::compute(&list, dec!(100));
    assert_eq!(s.tier, Tier::OverBudget);
}

// ── Tier boundaries ───────────────────────────────────────────

#[test]
fn test_tier_boundaries() {
    let cases = [
        (dec!(0), Tier::Healthy),      // 100%
        (dec!(49.99), Tier::Healthy),  // 50.01%
        (dec!(50), Tier::Warning),     // 50%
        (dec!(79.99), Tier::Warning),  // 20.01%
        (dec!(80), Tier::Critical),    // 20%
        (dec!(100), Tier::Critical),   // 0%, nothing left but not over
    ];
    for (spent, tier) in cases {
        let s = Summary::compute(&expenses(&[spent]), dec!(100));
        assert_eq!(s.tier, tier, "spent {spent}");
    }
}

#[test]
fn test_full_budget_remaining() {
    let s = Summary::compute(&[], dec!(250));
    assert_eq!(s.percentage, dec!(100));
    assert_eq!(s.tier, Tier::Healthy);
    assert_eq!(s.label(), "100%");
    assert!((s.ratio() - 1.0).abs() < f64::EPSILON);
}

// ── Label ─────────────────────────────────────────────────────

#[test]
fn test_label_rounds_half_away_from_zero() {
    // 199 of 200 left = 99.5%
    let s = Summary::compute(&expenses(&[dec!(1)]), dec!(200));
    assert_eq!(s.percentage, dec!(99.5));
    assert_eq!(s.label(), "100%");

    let s = Summary::compute(&expenses(&[dec!(1)]), dec!(3));
    assert_eq!(s.label(), "67%");
}

#[test]
fn test_ratio_matches_percentage() {
    let s = Summary::compute(&expenses(&[dec!(75)]), dec!(100));
    assert!((s.ratio() - 0.25).abs() < 1e-9);
}

#[test]
fn test_tier_names() {
    assert_eq!(Tier::Healthy.to_string(), "healthy");
    assert_eq!(Tier::Warning.to_string(), "warning");
    assert_eq!(Tier::Critical.to_string(), "critical");
    assert_eq!(Tier::OverBudget.to_string(), "over-budget");
}

// ── Overflow ──────────────────────────────────────────────────

#[test]
fn test_total_saturates_instead_of_overflowing() {
    let huge = crate::models::parse_amount("79228162514264337593543950335");
    assert_eq!(huge, Decimal::MAX);
    let s = Summary::compute(&expenses(&[huge, huge]), dec!(1000));
    assert_eq!(s.total, Decimal::MAX);
    assert_eq!(s.remaining, Decimal::MIN + dec!(1000));
    assert_eq!(s.percentage, Decimal::ZERO);
    assert_eq!(s.tier, Tier::OverBudget);
    assert_eq!(s.label(), OVER_BUDGET_LABEL);
}

#[test]
fn test_huge_deficit_over_tiny_budget() {
    let budget = crate::models::parse_amount("0.0001");
    let amount = crate::models::parse_amount("10000000000000000000000000");
    let s = Summary::compute(&expenses(&[amount]), budget);
    assert_eq!(s.remaining, budget - amount);
    assert_eq!(s.percentage, Decimal::ZERO);
    assert_eq!(s.tier, Tier::OverBudget);
    assert!(s.ratio().abs() < f64::EPSILON);
}

#[test]
fn test_tiny_budget_fully_left() {
    let s = Summary::compute(&[], dec!(0.0001));
    assert_eq!(s.percentage, dec!(100));
    assert_eq!(s.tier, Tier::Healthy);
}
