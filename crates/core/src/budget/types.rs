//! Budget data types.

use chrono::{DateTime, Utc};
use fintrack_shared::types::{BudgetId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::expense::Category;

/// Default alert threshold, in percent of the budget amount.
pub const DEFAULT_ALERT_THRESHOLD: u8 = 80;

/// Budget period label.
///
/// Informational only: the date range is authoritative for matching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    /// One week.
    Weekly,
    /// One month.
    #[default]
    Monthly,
    /// Three months.
    Quarterly,
    /// One year.
    Yearly,
}

impl BudgetPeriod {
    /// Returns the stored value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
        }
    }
}

impl std::fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BudgetPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "quarterly" => Ok(Self::Quarterly),
            "yearly" => Ok(Self::Yearly),
            _ => Err(format!("Unknown budget period: {s}")),
        }
    }
}

/// Closed time interval `[start, end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// First instant (inclusive).
    pub start: DateTime<Utc>,
    /// Last instant (inclusive).
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// Creates a range; no ordering check is made here.
    #[must_use]
    pub const fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Returns true if `at` lies within the range, both ends included.
    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }

    /// Returns true if the two ranges share at least one instant.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && self.end >= other.start
    }
}

/// A spending cap for one category over one date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    /// Budget ID.
    pub id: BudgetId,
    /// Owner.
    pub user_id: UserId,
    /// Category the budget caps.
    pub category: Category,
    /// Budgeted amount.
    pub amount: Decimal,
    /// Period label.
    pub period: BudgetPeriod,
    /// Range start (inclusive).
    pub start_date: DateTime<Utc>,
    /// Range end (inclusive).
    pub end_date: DateTime<Utc>,
    /// Denormalized spend; reconciliation recomputes it from expenses.
    pub spent: Decimal,
    /// Utilization percent at which an alert is raised.
    pub alert_threshold: u8,
    /// Whether the budget is in use.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Budget {
    /// The budget's date range.
    #[must_use]
    pub const fn range(&self) -> DateRange {
        DateRange::new(self.start_date, self.end_date)
    }

    /// Returns true if the budget is active and `as_of` falls in its range.
    #[must_use]
    pub fn is_active_at(&self, as_of: DateTime<Utc>) -> bool {
        self.is_active && self.range().contains(as_of)
    }
}

/// Input for creating a budget.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBudget {
    /// Owner.
    pub user_id: UserId,
    /// Category the budget caps.
    pub category: Category,
    /// Budgeted amount.
    pub amount: Decimal,
    /// Period label.
    pub period: BudgetPeriod,
    /// Range start.
    pub start_date: DateTime<Utc>,
    /// Range end.
    pub end_date: DateTime<Utc>,
    /// Alert threshold; defaults to 80.
    pub alert_threshold: Option<u8>,
}

impl NewBudget {
    /// The requested date range.
    #[must_use]
    pub const fn range(&self) -> DateRange {
        DateRange::new(self.start_date, self.end_date)
    }

    /// Effective alert threshold.
    #[must_use]
    pub fn threshold(&self) -> u8 {
        self.alert_threshold.unwrap_or(DEFAULT_ALERT_THRESHOLD)
    }
}

/// Partial update of a budget; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct BudgetUpdate {
    /// New category.
    pub category: Option<Category>,
    /// New amount.
    pub amount: Option<Decimal>,
    /// New period label.
    pub period: Option<BudgetPeriod>,
    /// New range start.
    pub start_date: Option<DateTime<Utc>>,
    /// New range end.
    pub end_date: Option<DateTime<Utc>>,
    /// New alert threshold.
    pub alert_threshold: Option<u8>,
    /// New active flag.
    pub is_active: Option<bool>,
}

/// Spend-vs-cap metrics for one budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationResult {
    /// Budget the metrics describe.
    pub budget_id: BudgetId,
    /// Budget category.
    pub category: Category,
    /// Budgeted amount.
    pub budget_amount: Decimal,
    /// Sum of matching expense amounts.
    pub actual_spent: Decimal,
    /// `budget_amount - actual_spent`; negative when over budget.
    pub remaining_amount: Decimal,
    /// Utilization for display, capped at 100.
    pub percentage_used: Decimal,
    /// Utilization without the cap; drives `needs_alert`.
    pub raw_percentage_used: Decimal,
    /// `actual_spent > budget_amount`.
    pub is_over_budget: bool,
    /// Threshold the budget alerts at.
    pub alert_threshold: u8,
    /// `raw_percentage_used >= alert_threshold`.
    pub needs_alert: bool,
    /// Number of matching expenses.
    pub expense_count: usize,
}

/// Totals across a set of reconciled budgets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSummary {
    /// Sum of budget amounts.
    pub total_budgeted: Decimal,
    /// Sum of actual spend.
    pub total_spent: Decimal,
    /// `total_budgeted - total_spent`.
    pub total_remaining: Decimal,
    /// `total_spent / total_budgeted * 100`, not capped.
    pub overall_percentage_used: Decimal,
    /// Number of budgets summarized.
    pub budget_count: usize,
    /// Budgets whose spend exceeds the amount.
    pub over_budget_count: usize,
    /// Budgets at or past their alert threshold.
    pub alerts_needed: usize,
}
