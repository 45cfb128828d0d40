//! Budget alerts derived from reconciliation results.

use fintrack_shared::types::BudgetId;
use fintrack_shared::types::money::format_cents;
use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;
use serde::{Deserialize, Serialize};

use super::types::ReconciliationResult;
use crate::expense::Category;

/// Alert severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    /// Spend exceeded the budget.
    High,
    /// Spend crossed the alert threshold.
    Medium,
}

/// What triggered the alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AlertKind {
    /// `actual_spent > budget_amount`.
    OverBudget {
        /// Amount spent beyond the budget.
        overage: Decimal,
    },
    /// Threshold reached without exceeding the budget.
    ApproachingLimit {
        /// Unclamped utilization percent.
        #[serde(rename = "percentageUsed")]
        percentage_used: Decimal,
    },
}

/// A warning about one budget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    /// Trigger and its figure.
    #[serde(flatten)]
    pub kind: AlertKind,
    /// Severity.
    pub severity: AlertSeverity,
    /// Budget the alert is about.
    pub budget_id: BudgetId,
    /// Budget category.
    pub category: Category,
    /// Budgeted amount.
    pub budget_amount: Decimal,
    /// Actual spend.
    pub actual_spent: Decimal,
    /// Human-readable message.
    pub message: String,
}

impl Alert {
    /// Builds the alert a reconciliation result calls for, if any.
    #[must_use]
    pub fn for_result(result: &ReconciliationResult) -> Option<Self> {
        let (kind, severity, message) = if result.is_over_budget {
            let overage = result.actual_spent - result.budget_amount;
            let message = format!(
                "You've exceeded your {} budget by ${}",
                result.category,
                format_cents(overage)
            );
            (AlertKind::OverBudget { overage }, AlertSeverity::High, message)
        } else if result.needs_alert {
            let pct = result
                .raw_percentage_used
                .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
            let message = format!("You've used {pct:.1}% of your {} budget", result.category);
            (
                AlertKind::ApproachingLimit {
                    percentage_used: result.raw_percentage_used,
                },
                AlertSeverity::Medium,
                message,
            )
        } else {
            return None;
        };

        Some(Self {
            kind,
            severity,
            budget_id: result.budget_id,
            category: result.category,
            budget_amount: result.budget_amount,
            actual_spent: result.actual_spent,
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn result(spent: Decimal, amount: Decimal, threshold: u8) -> ReconciliationResult {
        let raw = spent / amount * Decimal::ONE_HUNDRED;
        ReconciliationResult {
            budget_id: BudgetId::new(),
            category: Category::Shopping,
            budget_amount: amount,
            actual_spent: spent,
            remaining_amount: amount - spent,
            percentage_used: raw.min(Decimal::ONE_HUNDRED),
            raw_percentage_used: raw,
            is_over_budget: spent > amount,
            alert_threshold: threshold,
            needs_alert: raw >= Decimal::from(threshold),
            expense_count: 1,
        }
    }

    #[test]
    fn test_over_budget_message() {
        let alert = Alert::for_result(&result(dec!(150), dec!(100), 80)).unwrap();
        assert_eq!(alert.kind, AlertKind::OverBudget { overage: dec!(50) });
        assert_eq!(alert.severity, AlertSeverity::High);
        assert_eq!(alert.message, "You've exceeded your Shopping budget by $50.00");
    }

    #[test]
    fn test_approaching_limit_message() {
        let alert = Alert::for_result(&result(dec!(85.55), dec!(100), 80)).unwrap();
        assert_eq!(
            alert.kind,
            AlertKind::ApproachingLimit {
                percentage_used: dec!(85.55)
            }
        );
        assert_eq!(alert.severity, AlertSeverity::Medium);
        assert_eq!(alert.message, "You've used 85.6% of your Shopping budget");
    }

    #[test]
    fn test_approaching_limit_keeps_full_precision() {
        let result = result(dec!(250), dec!(300), 80);
        let alert = Alert::for_result(&result).unwrap();

        assert_eq!(
            alert.kind,
            AlertKind::ApproachingLimit {
                percentage_used: result.raw_percentage_used
            }
        );
        assert_ne!(result.raw_percentage_used, dec!(83.33));
        assert_eq!(alert.message, "You've used 83.3% of your Shopping budget");
    }

    #[test]
    fn test_no_alert_below_threshold() {
        assert!(Alert::for_result(&result(dec!(79.99), dec!(100), 80)).is_none());
    }

    #[test]
    fn test_serializes_flat_with_type_tag() {
        let alert = Alert::for_result(&result(dec!(150), dec!(100), 80)).unwrap();
        let json = serde_json::to_value(&alert).unwrap();
        assert_eq!(json["type"], "over_budget");
        assert_eq!(json["severity"], "high");
        assert_eq!(json["overage"], "50");
        assert_eq!(json["category"], "Shopping");
        assert!(json.get("budgetId").is_some());
    }
}
