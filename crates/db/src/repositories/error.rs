//! Repository error type.

use fintrack_core::budget::BudgetError;
use fintrack_core::expense::ExpenseError;
use fintrack_shared::types::UserId;
use sea_orm::DbErr;
use uuid::Uuid;

/// Errors from repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// A stored row holds a value the domain does not recognize.
    #[error("Corrupt {table} row {id}: {reason}")]
    Corrupt {
        /// Table name.
        table: &'static str,
        /// Row ID.
        id: Uuid,
        /// What could not be read.
        reason: String,
    },

    /// Expense rule violation or missing expense.
    #[error(transparent)]
    Expense(#[from] ExpenseError),

    /// Budget rule violation or missing budget.
    #[error(transparent)]
    Budget(#[from] BudgetError),

    /// User not found.
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    /// Email already registered.
    #[error("User already exists with this email")]
    EmailTaken,
}

impl RepositoryError {
    pub(crate) fn corrupt(table: &'static str, id: Uuid, reason: impl ToString) -> Self {
        Self::Corrupt {
            table,
            id,
            reason: reason.to_string(),
        }
    }
}
