//! Budget tracking: validation, reconciliation against expenses, and alerts.

pub mod alerts;
pub mod error;
pub mod reconciler;
pub mod service;
pub mod types;

#[cfg(test)]
mod tests;

pub use alerts::{Alert, AlertKind, AlertSeverity};
pub use error::BudgetError;
pub use reconciler::BudgetReconciler;
pub use service::BudgetService;
pub use types::{
    Budget, BudgetPeriod, BudgetSummary, BudgetUpdate, DateRange, NewBudget, ReconciliationResult,
};
