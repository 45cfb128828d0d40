//! Budget validation rules for creation and updates.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::error::BudgetError;
use super::types::{Budget, BudgetUpdate, DateRange, NewBudget};
use crate::expense::Category;

/// Budget service for business rules.
pub struct BudgetService;

impl BudgetService {
    /// Validates the fields a budget must satisfy to be stored.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::NonPositiveAmount` if the amount is not positive.
    /// Returns `BudgetError::InvalidDateRange` if the range is empty or inverted.
    /// Returns `BudgetError::InvalidThreshold` if the threshold exceeds 100.
    pub fn validate_budget(
        amount: Decimal,
        range: DateRange,
        alert_threshold: u8,
    ) -> Result<(), BudgetError> {
        if amount <= Decimal::ZERO {
            return Err(BudgetError::NonPositiveAmount);
        }

        if range.end <= range.start {
            return Err(BudgetError::InvalidDateRange);
        }

        if alert_threshold > 100 {
            return Err(BudgetError::InvalidThreshold(alert_threshold));
        }

        Ok(())
    }

    /// Validates a creation request.
    ///
    /// # Errors
    ///
    /// See [`BudgetService::validate_budget`].
    pub fn validate_new(input: &NewBudget) -> Result<(), BudgetError> {
        Self::validate_budget(input.amount, input.range(), input.threshold())
    }

    /// Rejects a new budget whose range overlaps an existing active budget of the same
    /// category.
    ///
    /// `existing` may contain any budgets of the owner; inactive ones and
    /// other categories are ignored.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::DuplicateActiveBudget` on overlap.
    pub fn ensure_no_overlap<'a>(
        category: Category,
        range: DateRange,
        existing: impl IntoIterator<Item = &'a Budget>,
    ) -> Result<(), BudgetError> {
        let clash = existing
            .into_iter()
            .any(|b| b.is_active && b.category == category && b.range().overlaps(&range));

        if clash {
            return Err(BudgetError::DuplicateActiveBudget(category));
        }
        Ok(())
    }

    /// Applies a partial update and re-validates the result.
    ///
    /// The budget is left unchanged on error.
    ///
    /// # Errors
    ///
    /// See [`BudgetService::validate_budget`].
    pub fn apply_update(
        budget: &mut Budget,
        update: BudgetUpdate,
        now: DateTime<Utc>,
    ) -> Result<(), BudgetError> {
        let mut updated = budget.clone();

        if let Some(category) = update.category {
            updated.category = category;
        }
        if let Some(amount) = update.amount {
            updated.amount = amount;
        }
        if let Some(period) = update.period {
            updated.period = period;
        }
        if let Some(start) = update.start_date {
            updated.start_date = start;
        }
        if let Some(end) = update.end_date {
            updated.end_date = end;
        }
        if let Some(threshold) = update.alert_threshold {
            updated.alert_threshold = threshold;
        }
        if let Some(is_active) = update.is_active {
            updated.is_active = is_active;
        }

        Self::validate_budget(updated.amount, updated.range(), updated.alert_threshold)?;

        updated.updated_at = now;
        *budget = updated;
        Ok(())
    }
}
