//! Matching expenses to budgets and aggregating the results.

use rayon::prelude::*;
use rust_decimal::Decimal;

use super::alerts::Alert;
use super::error::BudgetError;
use super::types::{Budget, BudgetSummary, ReconciliationResult};
use crate::expense::{Expense, ExpenseFilter};

/// Computes spend-vs-cap metrics from budgets and expenses.
///
/// Stateless; every call takes all of its data as arguments and performs no I/O.
pub struct BudgetReconciler;

impl BudgetReconciler {
    /// Reconciles one budget against the owner's expenses.
    ///
    /// Only expenses with the budget's category dated within
    /// `[start_date, end_date]` count toward `actual_spent`.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::InvalidBudget` if the end date is not after the
    /// start date or the amount is negative.
    pub fn reconcile(
        budget: &Budget,
        expenses: &[Expense],
    ) -> Result<ReconciliationResult, BudgetError> {
        if budget.end_date <= budget.start_date {
            return Err(BudgetError::InvalidBudget {
                budget_id: budget.id,
                reason: "end date must be after start date",
            });
        }
        if budget.amount < Decimal::ZERO {
            return Err(BudgetError::InvalidBudget {
                budget_id: budget.id,
                reason: "amount must not be negative",
            });
        }

        let filter =
            ExpenseFilter::for_category_between(budget.category, budget.start_date, budget.end_date);

        let (actual_spent, expense_count) = expenses
            .iter()
            .filter(|e| filter.matches(e))
            .fold((Decimal::ZERO, 0_usize), |(sum, count), e| {
                (sum + e.amount, count + 1)
            });

        let raw_percentage_used = percentage_of(actual_spent, budget.amount);
        let percentage_used = raw_percentage_used.min(Decimal::ONE_HUNDRED);

        Ok(ReconciliationResult {
            budget_id: budget.id,
            category: budget.category,
            budget_amount: budget.amount,
            actual_spent,
            remaining_amount: budget.amount - actual_spent,
            percentage_used,
            raw_percentage_used,
            is_over_budget: actual_spent > budget.amount,
            alert_threshold: budget.alert_threshold,
            needs_alert: raw_percentage_used >= Decimal::from(budget.alert_threshold),
            expense_count,
        })
    }

    /// Reconciles many budgets in parallel.
    ///
    /// Results are returned in the same order as `budgets`.
    ///
    /// # Errors
    ///
    /// Returns the first `BudgetError::InvalidBudget` encountered.
    pub fn reconcile_all(
        budgets: &[Budget],
        expenses: &[Expense],
    ) -> Result<Vec<ReconciliationResult>, BudgetError> {
        budgets
            .par_iter()
            .map(|budget| Self::reconcile(budget, expenses))
            .collect()
    }

    /// Aggregates reconciled budgets into totals.
    ///
    /// `overall_percentage_used` is not capped at 100, unlike the per-budget
    /// `percentage_used`.
    #[must_use]
    pub fn summarize(results: &[ReconciliationResult]) -> BudgetSummary {
        let total_budgeted: Decimal = results.iter().map(|r| r.budget_amount).sum();
        let total_spent: Decimal = results.iter().map(|r| r.actual_spent).sum();

        BudgetSummary {
            total_budgeted,
            total_spent,
            total_remaining: total_budgeted - total_spent,
            overall_percentage_used: percentage_of(total_spent, total_budgeted),
            budget_count: results.len(),
            over_budget_count: results.iter().filter(|r| r.is_over_budget).count(),
            alerts_needed: results.iter().filter(|r| r.needs_alert).count(),
        }
    }

    /// Derives alerts in input order.
    ///
    /// Over-budget takes priority: a result yields at most one alert.
    #[must_use]
    pub fn derive_alerts(results: &[ReconciliationResult]) -> Vec<Alert> {
        results.iter().filter_map(Alert::for_result).collect()
    }
}

/// `part / whole * 100`, or zero when `whole` is not positive.
fn percentage_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    part / whole * Decimal::ONE_HUNDRED
}
