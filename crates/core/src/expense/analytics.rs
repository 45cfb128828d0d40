//! Spending analytics over a trailing window.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::{Category, Expense};

const SECONDS_PER_DAY: i64 = 86_400;

/// Window the analytics summary covers, ending at `as_of`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyticsPeriod {
    /// The last seven days.
    Week,
    /// Since the first day of the current month.
    #[default]
    Month,
    /// Since January 1st of the current year.
    Year,
}

impl AnalyticsPeriod {
    /// Parses a query value; anything unrecognized falls back to `Month`.
    #[must_use]
    pub fn parse_or_default(value: Option<&str>) -> Self {
        match value {
            Some("week") => Self::Week,
            Some("year") => Self::Year,
            _ => Self::Month,
        }
    }

    /// First instant of the window ending at `as_of`.
    #[must_use]
    pub fn start(self, as_of: DateTime<Utc>) -> DateTime<Utc> {
        let first_of = |month: u32| {
            Utc.with_ymd_and_hms(as_of.year(), month, 1, 0, 0, 0)
                .single()
                .unwrap_or(as_of)
        };
        match self {
            Self::Week => as_of - Duration::days(7),
            Self::Month => first_of(as_of.month()),
            Self::Year => first_of(1),
        }
    }
}

/// Aggregated spending for one window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpendingSummary {
    /// Window kind.
    pub period: AnalyticsPeriod,
    /// Window start (inclusive).
    pub start_date: DateTime<Utc>,
    /// Window end (inclusive), the `as_of` instant.
    pub end_date: DateTime<Utc>,
    /// Sum of all amounts in the window.
    pub total_amount: Decimal,
    /// Total divided by the number of days elapsed (at least one).
    pub average_per_day: Decimal,
    /// Number of expenses in the window.
    pub transaction_count: usize,
    /// Totals per category; categories without spending are absent.
    pub category_breakdown: BTreeMap<Category, Decimal>,
    /// Totals per calendar day (UTC).
    pub daily_spending: BTreeMap<NaiveDate, Decimal>,
}

/// Pure spending aggregation.
pub struct ExpenseAnalytics;

impl ExpenseAnalytics {
    /// Summarizes the expenses dated within `[period.start(as_of), as_of]`.
    ///
    /// Expenses outside the window are ignored, so callers may pass a
    /// superset.
    #[must_use]
    pub fn summarize(
        expenses: &[Expense],
        period: AnalyticsPeriod,
        as_of: DateTime<Utc>,
    ) -> SpendingSummary {
        let start = period.start(as_of);
        let mut total = Decimal::ZERO;
        let mut count = 0;
        let mut by_category: BTreeMap<Category, Decimal> = BTreeMap::new();
        let mut by_day: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();

        for expense in expenses
            .iter()
            .filter(|e| e.date >= start && e.date <= as_of)
        {
            total += expense.amount;
            count += 1;
            *by_category.entry(expense.category).or_default() += expense.amount;
            *by_day.entry(expense.date.date_naive()).or_default() += expense.amount;
        }

        SpendingSummary {
            period,
            start_date: start,
            end_date: as_of,
            total_amount: total,
            average_per_day: total / Decimal::from(elapsed_days(start, as_of)),
            transaction_count: count,
            category_breakdown: by_category,
            daily_spending: by_day,
        }
    }
}

/// Whole days between `start` and `end`, rounded up, never below one.
fn elapsed_days(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let seconds = (end - start).num_seconds().max(0);
    ((seconds + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fintrack_shared::types::{ExpenseId, UserId};
    use rust_decimal_macros::dec;

    fn at(month: u32, day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, month, day, hour, 0, 0).unwrap()
    }

    fn expense(category: Category, amount: Decimal, date: DateTime<Utc>) -> Expense {
        Expense {
            id: ExpenseId::new(),
            user_id: UserId::new(),
            amount,
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
    fn test_period_starts() {
        let as_of = at(10, 14, 15);
        assert_eq!(AnalyticsPeriod::Week.start(as_of), at(10, 7, 15));
        assert_eq!(AnalyticsPeriod::Month.start(as_of), at(10, 1, 0));
        assert_eq!(AnalyticsPeriod::Year.start(as_of), at(1, 1, 0));
    }

    #[test]
    fn test_parse_period() {
        assert_eq!(AnalyticsPeriod::parse_or_default(Some("week")), AnalyticsPeriod::Week);
        assert_eq!(AnalyticsPeriod::parse_or_default(Some("year")), AnalyticsPeriod::Year);
        assert_eq!(AnalyticsPeriod::parse_or_default(Some("decade")), AnalyticsPeriod::Month);
        assert_eq!(AnalyticsPeriod::parse_or_default(None), AnalyticsPeriod::Month);
    }

    #[test]
    fn test_summarize_month() {
        let as_of = at(10, 14, 12);
        let expenses = vec![
            expense(Category::FoodDining, dec!(20.50), at(10, 2, 9)),
            expense(Category::FoodDining, dec!(9.50), at(10, 2, 19)),
            expense(Category::Travel, dec!(100), at(10, 10, 8)),
            // previous month, excluded
            expense(Category::Travel, dec!(999), at(9, 30, 23)),
            // after as_of, excluded
            expense(Category::Travel, dec!(999), at(10, 14, 13)),
        ];

        let summary = ExpenseAnalytics::summarize(&expenses, AnalyticsPeriod::Month, as_of);

        assert_eq!(summary.total_amount, dec!(130));
        assert_eq!(summary.transaction_count, 3);
        assert_eq!(summary.category_breakdown[&Category::FoodDining], dec!(30));
        assert_eq!(summary.category_breakdown[&Category::Travel], dec!(100));
        assert_eq!(summary.category_breakdown.len(), 2);
        assert_eq!(
            summary.daily_spending[&NaiveDate::from_ymd_opt(2026, 10, 2).unwrap()],
            dec!(30)
        );
        // Oct 1 00:00 to Oct 14 12:00 is 13.5 days, rounded up to 14
        assert_eq!(summary.average_per_day, dec!(130) / dec!(14));
    }

    #[test]
    fn test_average_uses_at_least_one_day() {
        let as_of = at(10, 1, 0);
        let expenses = vec![expense(Category::Other, dec!(50), as_of)];

        let summary = ExpenseAnalytics::summarize(&expenses, AnalyticsPeriod::Month, as_of);

        assert_eq!(summary.total_amount, dec!(50));
        assert_eq!(summary.average_per_day, dec!(50));
    }

    #[test]
    fn test_elapsed_days_round_up_partial_days() {
        assert_eq!(elapsed_days(at(10, 1, 0), at(10, 3, 0)), 2);
        assert_eq!(elapsed_days(at(10, 1, 0), at(10, 3, 1)), 3);
        assert_eq!(elapsed_days(at(10, 3, 0), at(10, 1, 0)), 1);
    }

    #[test]
    fn test_empty_window() {
        let summary = ExpenseAnalytics::summarize(&[], AnalyticsPeriod::Week, at(10, 14, 0));
        assert_eq!(summary.total_amount, Decimal::ZERO);
        assert_eq!(summary.average_per_day, Decimal::ZERO);
        assert_eq!(summary.transaction_count, 0);
        assert!(summary.daily_spending.is_empty());
    }
}
