//! Property-based tests for budget reconciliation.

use chrono::{DateTime, Duration, TimeZone, Utc};
use fintrack_shared::types::{BudgetId, ExpenseId, UserId};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::alerts::AlertKind;
use super::error::BudgetError;
use super::reconciler::BudgetReconciler;
use super::types::{Budget, BudgetPeriod};
use crate::expense::{Category, Expense};

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap()
}

fn end() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 31, 23, 59, 59).unwrap()
}

fn budget(category: Category, amount: Decimal, threshold: u8) -> Budget {
    Budget {
        id: BudgetId::new(),
        user_id: UserId::new(),
        category,
        amount,
        period: BudgetPeriod::Monthly,
        start_date: start(),
        end_date: end(),
        spent: Decimal::ZERO,
        alert_threshold: threshold,
        is_active: true,
        created_at: start(),
        updated_at: start(),
    }
}

fn expense(category: Category, amount: Decimal, date: DateTime<Utc>) -> Expense {
    Expense {
        id: ExpenseId::new(),
        user_id: UserId::new(),
        amount,
        category,
        description: "test".to_string(),
        date,
        is_recurring: false,
        recurring_period: None,
        receipt_url: None,
        tags: Vec::new(),
        created_at: date,
        updated_at: date,
    }
}

fn category_strategy() -> impl Strategy<Value = Category> {
    prop::sample::select(Category::ALL.to_vec())
}

/// Cents, a category, and a day offset from one week before the budget to one week after.
fn expense_strategy() -> impl Strategy<Value = (i64, Category, i64)> {
    (0i64..1_000_000, category_strategy(), -7i64..45)
}

fn build_expenses(raw: &[(i64, Category, i64)]) -> Vec<Expense> {
    raw.iter()
        .map(|&(cents, category, offset)| {
            expense(category, Decimal::new(cents, 2), start() + Duration::days(offset))
        })
        .collect()
}

proptest! {
    #[test]
    fn prop_remaining_plus_spent_is_amount(
        amount in 1i64..100_000_000,
        raw in prop::collection::vec(expense_strategy(), 0..40),
    ) {
        let b = budget(Category::FoodDining, Decimal::new(amount, 2), 80);
        let r = BudgetReconciler::reconcile(&b, &build_expenses(&raw)).unwrap();
        prop_assert_eq!(r.remaining_amount + r.actual_spent, r.budget_amount);
    }

    #[test]
    fn prop_percentage_used_is_clamped(
        amount in 1i64..10_000_000,
        raw in prop::collection::vec(expense_strategy(), 0..40),
    ) {
        let b = budget(Category::Travel, Decimal::new(amount, 2), 80);
        let r = BudgetReconciler::reconcile(&b, &build_expenses(&raw)).unwrap();
        prop_assert!(r.percentage_used >= Decimal::ZERO);
        prop_assert!(r.percentage_used <= Decimal::ONE_HUNDRED);
        prop_assert!(r.raw_percentage_used >= r.percentage_used);
        prop_assert_eq!(r.is_over_budget, r.actual_spent > r.budget_amount);
        prop_assert_eq!(
            r.needs_alert,
            r.raw_percentage_used >= Decimal::from(r.alert_threshold)
        );
    }

    #[test]
    fn prop_reconcile_is_order_independent(
        raw in prop::collection::vec(expense_strategy(), 0..40),
        seed in any::<u64>(),
    ) {
        let b = budget(Category::Shopping, dec!(2500), 75);
        let expenses = build_expenses(&raw);

        // deterministic rotation + reversal stands in for a shuffle
        let mut shuffled = expenses.clone();
        if !shuffled.is_empty() {
            let k = usize::try_from(seed % shuffled.len() as u64).unwrap();
            shuffled.rotate_left(k);
            shuffled.reverse();
        }

        let a = BudgetReconciler::reconcile(&b, &expenses).unwrap();
        let z = BudgetReconciler::reconcile(&b, &shuffled).unwrap();
        prop_assert_eq!(a, z);
    }

    #[test]
    fn prop_only_matching_expenses_count(
        raw in prop::collection::vec(expense_strategy(), 0..40),
    ) {
        let b = budget(Category::Healthcare, dec!(1000), 80);
        let expenses = build_expenses(&raw);
        let r = BudgetReconciler::reconcile(&b, &expenses).unwrap();

        let expected: Vec<&Expense> = expenses
            .iter()
            .filter(|e| e.category == b.category && e.date >= b.start_date && e.date <= b.end_date)
            .collect();
        prop_assert_eq!(r.expense_count, expected.len());
        prop_assert_eq!(r.actual_spent, expected.iter().map(|e| e.amount).sum::<Decimal>());
    }

    #[test]
    fn prop_summary_totals_match(
        amounts in prop::collection::vec(1i64..1_000_000, 1..10),
        raw in prop::collection::vec(expense_strategy(), 0..40),
    ) {
        let expenses = build_expenses(&raw);
        let budgets: Vec<Budget> = amounts
            .iter()
            .zip(Category::ALL.iter().cycle())
            .map(|(&a, &c)| budget(c, Decimal::new(a, 2), 80))
            .collect();

        let results = BudgetReconciler::reconcile_all(&budgets, &expenses).unwrap();
        prop_assert_eq!(results.len(), budgets.len());
        for (b, r) in budgets.iter().zip(&results) {
            prop_assert_eq!(b.id, r.budget_id);
        }

        let summary = BudgetReconciler::summarize(&results);
        prop_assert_eq!(summary.total_remaining + summary.total_spent, summary.total_budgeted);
        prop_assert_eq!(summary.budget_count, budgets.len());
        prop_assert_eq!(
            summary.over_budget_count,
            results.iter().filter(|r| r.is_over_budget).count()
        );

        let alerts = BudgetReconciler::derive_alerts(&results);
        prop_assert_eq!(alerts.len(), results.iter().filter(|r| r.is_over_budget || r.needs_alert).count());
    }
}

#[test]
fn test_boundaries_are_inclusive() {
    let b = budget(Category::Entertainment, dec!(100), 80);
    let expenses = vec![
        expense(Category::Entertainment, dec!(10), start()),
        expense(Category::Entertainment, dec!(20), end()),
        expense(Category::Entertainment, dec!(40), start() - Duration::seconds(1)),
        expense(Category::Entertainment, dec!(80), end() + Duration::seconds(1)),
        expense(Category::Other, dec!(160), start() + Duration::days(3)),
    ];

    let r = BudgetReconciler::reconcile(&b, &expenses).unwrap();
    assert_eq!(r.actual_spent, dec!(30));
    assert_eq!(r.expense_count, 2);
    assert_eq!(r.remaining_amount, dec!(70));
    assert_eq!(r.percentage_used, dec!(30));
    assert!(!r.needs_alert);
}

#[test]
fn test_over_budget_clamps_display_percentage() {
    let b = budget(Category::FoodDining, dec!(100), 80);
    let expenses = vec![
        expense(Category::FoodDining, dec!(100), start() + Duration::days(1)),
        expense(Category::FoodDining, dec!(50), start() + Duration::days(2)),
    ];

    let r = BudgetReconciler::reconcile(&b, &expenses).unwrap();
    assert_eq!(r.percentage_used, dec!(100));
    assert_eq!(r.raw_percentage_used, dec!(150));
    assert_eq!(r.remaining_amount, dec!(-50));
    assert!(r.is_over_budget);
    assert!(r.needs_alert);

    let alerts = BudgetReconciler::derive_alerts(&[r]);
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].kind, AlertKind::OverBudget { overage: dec!(50) });
}

#[test]
fn test_exactly_at_budget_is_not_over() {
    let b = budget(Category::Education, dec!(200), 100);
    let expenses = vec![expense(Category::Education, dec!(200), start())];

    let r = BudgetReconciler::reconcile(&b, &expenses).unwrap();
    assert!(!r.is_over_budget);
    assert!(r.needs_alert);

    let alerts = BudgetReconciler::derive_alerts(&[r]);
    assert_eq!(
        alerts[0].kind,
        AlertKind::ApproachingLimit {
            percentage_used: dec!(100)
        }
    );
}

#[test]
fn test_summary_percentage_not_clamped() {
    let budgets = vec![
        budget(Category::Travel, dec!(100), 80),
        budget(Category::Shopping, dec!(100), 80),
    ];
    let expenses = vec![
        expense(Category::Travel, dec!(350), start()),
        expense(Category::Shopping, dec!(50), start()),
    ];

    let results = BudgetReconciler::reconcile_all(&budgets, &expenses).unwrap();
    let summary = BudgetReconciler::summarize(&results);

    assert_eq!(summary.total_budgeted, dec!(200));
    assert_eq!(summary.total_spent, dec!(400));
    assert_eq!(summary.total_remaining, dec!(-200));
    assert_eq!(summary.overall_percentage_used, dec!(200));
    assert_eq!(summary.over_budget_count, 1);
    assert_eq!(summary.alerts_needed, 1);
}

#[test]
fn test_empty_summary_is_zero() {
    let summary = BudgetReconciler::summarize(&[]);
    assert_eq!(summary.total_budgeted, Decimal::ZERO);
    assert_eq!(summary.overall_percentage_used, Decimal::ZERO);
    assert_eq!(summary.budget_count, 0);
}

#[test]
fn test_invalid_budget_rejected() {
    let mut inverted = budget(Category::Other, dec!(100), 80);
    inverted.end_date = inverted.start_date;
    assert!(matches!(
        BudgetReconciler::reconcile(&inverted, &[]),
        Err(BudgetError::InvalidBudget { .. })
    ));

    let negative = budget(Category::Other, dec!(-1), 80);
    assert!(matches!(
        BudgetReconciler::reconcile(&negative, &[]),
        Err(BudgetError::InvalidBudget { .. })
    ));
}

#[test]
fn test_zero_amount_budget_reports_zero_percent() {
    let b = budget(Category::Other, Decimal::ZERO, 80);
    let expenses = vec![expense(Category::Other, dec!(5), start())];

    let r = BudgetReconciler::reconcile(&b, &expenses).unwrap();
    assert_eq!(r.raw_percentage_used, Decimal::ZERO);
    assert!(r.is_over_budget);
}
