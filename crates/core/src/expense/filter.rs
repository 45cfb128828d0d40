//! Expense list filtering and ordering.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::{Category, Expense};

/// Criteria for selecting expenses. Bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseFilter {
    /// Only this category, if set.
    pub category: Option<Category>,
    /// Earliest expense date, if set.
    pub start_date: Option<DateTime<Utc>>,
    /// Latest expense date, if set.
    pub end_date: Option<DateTime<Utc>>,
}

impl ExpenseFilter {
    /// Filter for one category within `[start, end]`.
    #[must_use]
    pub const fn for_category_between(
        category: Category,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        Self {
            category: Some(category),
            start_date: Some(start),
            end_date: Some(end),
        }
    }

    /// Returns true if `expense` satisfies every set criterion.
    #[must_use]
    pub fn matches(&self, expense: &Expense) -> bool {
        self.category.is_none_or(|c| c == expense.category)
            && self.start_date.is_none_or(|start| expense.date >= start)
            && self.end_date.is_none_or(|end| expense.date <= end)
    }
}

/// Field to order expense lists by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    /// Expense date.
    #[default]
    Date,
    /// Amount spent.
    Amount,
    /// Record creation time.
    CreatedAt,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Smallest first.
    Asc,
    /// Largest first.
    #[default]
    Desc,
}

/// Ordering of an expense list; defaults to newest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseSort {
    /// Field to order by.
    pub field: SortField,
    /// Direction.
    pub order: SortOrder,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expense::types::Expense;
    use chrono::TimeZone;
    use fintrack_shared::types::{ExpenseId, UserId};
    use rust_decimal_macros::dec;

    fn expense(category: Category, day: u32) -> Expense {
        let date = Utc.with_ymd_and_hms(2026, 5, day, 0, 0, 0).unwrap();
        Expense {
            id: ExpenseId::new(),
            user_id: UserId::new(),
            amount: dec!(10),
            category,
            description: "test".to_string(),
            date,
            is_recurring: false,
            recurring_period: None,
            receipt_url: None,
            tags: vec![],
            created_at: date,
            updated_at: date,
        }
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        assert!(ExpenseFilter::default().matches(&expense(Category::Other, 1)));
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let filter = ExpenseFilter::for_category_between(
            Category::Travel,
            Utc.with_ymd_and_hms(2026, 5, 10, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2026, 5, 20, 0, 0, 0).unwrap(),
        );

        assert!(filter.matches(&expense(Category::Travel, 10)));
        assert!(filter.matches(&expense(Category::Travel, 20)));
        assert!(!filter.matches(&expense(Category::Travel, 9)));
        assert!(!filter.matches(&expense(Category::Travel, 21)));
        assert!(!filter.matches(&expense(Category::Shopping, 15)));
    }

    #[test]
    fn test_default_sort_is_newest_first() {
        let sort = ExpenseSort::default();
        assert_eq!(sort.field, SortField::Date);
        assert_eq!(sort.order, SortOrder::Desc);
    }
}
