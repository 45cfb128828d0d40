//! Expense records, filtering, and spending analytics.

pub mod analytics;
pub mod error;
pub mod filter;
pub mod types;

pub use analytics::{AnalyticsPeriod, ExpenseAnalytics, SpendingSummary};
pub use error::ExpenseError;
pub use filter::{ExpenseFilter, ExpenseSort, SortField, SortOrder};
pub use types::{Category, Expense, ExpenseUpdate, NewExpense, RecurringPeriod};
