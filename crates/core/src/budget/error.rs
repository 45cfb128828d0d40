//! Budget error types.

use fintrack_shared::types::BudgetId;
use thiserror::Error;

use crate::expense::Category;

/// Budget-related errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BudgetError {
    /// Budget not found.
    #[error("Budget not found: {0}")]
    NotFound(BudgetId),

    /// Budget amount must be strictly positive.
    #[error("Budget amount must be greater than 0")]
    NonPositiveAmount,

    /// End date is not after start date.
    #[error("End date must be after start date")]
    InvalidDateRange,

    /// Alert threshold outside 0-100.
    #[error("Alert threshold cannot exceed 100%, got {0}")]
    InvalidThreshold(u8),

    /// An active budget for the category already covers part of the range.
    #[error("Active budget already exists for {0} in this time period")]
    DuplicateActiveBudget(Category),

    /// Stored budget that cannot be reconciled.
    #[error("Invalid budget {budget_id}: {reason}")]
    InvalidBudget {
        /// Offending budget.
        budget_id: BudgetId,
        /// What is wrong with it.
        reason: &'static str,
    },
}
