//! Expense error types.

use fintrack_shared::types::ExpenseId;
use thiserror::Error;

/// Expense-related errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExpenseError {
    /// Expense not found.
    #[error("Expense not found: {0}")]
    NotFound(ExpenseId),

    /// Amount must be strictly positive.
    #[error("Amount must be greater than 0")]
    NonPositiveAmount,

    /// Description is empty after trimming.
    #[error("Description is required")]
    MissingDescription,

    /// Description exceeds the length limit.
    #[error("Description cannot exceed {max} characters")]
    DescriptionTooLong {
        /// Maximum allowed characters.
        max: usize,
    },

    /// Recurring expense without a recurrence period.
    #[error("Recurring period is required for recurring expenses")]
    MissingRecurringPeriod,
}
