//! Expense data types.

use chrono::{DateTime, Utc};
use fintrack_shared::types::{ExpenseId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::ExpenseError;

/// Maximum description length in characters.
pub const MAX_DESCRIPTION_LEN: usize = 200;

/// Spending category shared by expenses and budgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Restaurants and groceries.
    #[serde(rename = "Food & Dining")]
    FoodDining,
    /// Fuel, fares, and vehicle costs.
    #[serde(rename = "Transportation")]
    Transportation,
    /// Leisure and media.
    #[serde(rename = "Entertainment")]
    Entertainment,
    /// General purchases.
    #[serde(rename = "Shopping")]
    Shopping,
    /// Recurring household bills.
    #[serde(rename = "Bills & Utilities")]
    BillsUtilities,
    /// Medical costs.
    #[serde(rename = "Healthcare")]
    Healthcare,
    /// Tuition, books, and courses.
    #[serde(rename = "Education")]
    Education,
    /// Trips and lodging.
    #[serde(rename = "Travel")]
    Travel,
    /// Household and garden upkeep.
    #[serde(rename = "Home & Garden")]
    HomeGarden,
    /// Personal care and grooming.
    #[serde(rename = "Personal Care")]
    PersonalCare,
    /// Gifts and charity.
    #[serde(rename = "Gifts & Donations")]
    GiftsDonations,
    /// Money set aside as investment.
    #[serde(rename = "Investment")]
    Investment,
    /// Anything else.
    #[serde(rename = "Other")]
    Other,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Self; 13] = [
        Self::FoodDining,
        Self::Transportation,
        Self::Entertainment,
        Self::Shopping,
        Self::BillsUtilities,
        Self::Healthcare,
        Self::Education,
        Self::Travel,
        Self::HomeGarden,
        Self::PersonalCare,
        Self::GiftsDonations,
        Self::Investment,
        Self::Other,
    ];

    /// Returns the display label, which is also the stored value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FoodDining => "Food & Dining",
            Self::Transportation => "Transportation",
            Self::Entertainment => "Entertainment",
            Self::Shopping => "Shopping",
            Self::BillsUtilities => "Bills & Utilities",
            Self::Healthcare => "Healthcare",
            Self::Education => "Education",
            Self::Travel => "Travel",
            Self::HomeGarden => "Home & Garden",
            Self::PersonalCare => "Personal Care",
            Self::GiftsDonations => "Gifts & Donations",
            Self::Investment => "Investment",
            Self::Other => "Other",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("Unknown category: {s}"))
    }
}

/// How often a recurring expense repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurringPeriod {
    /// Every day.
    Daily,
    /// Every week.
    Weekly,
    /// Every month.
    Monthly,
    /// Every year.
    Yearly,
}

impl RecurringPeriod {
    /// Returns the stored value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

impl std::fmt::Display for RecurringPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RecurringPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            _ => Err(format!("Unknown recurring period: {s}")),
        }
    }
}

/// A recorded expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// Expense ID.
    pub id: ExpenseId,
    /// Owner.
    pub user_id: UserId,
    /// Amount spent.
    pub amount: Decimal,
    /// Spending category.
    pub category: Category,
    /// Free-text description.
    pub description: String,
    /// When the money was spent.
    pub date: DateTime<Utc>,
    /// Whether the expense repeats.
    pub is_recurring: bool,
    /// Recurrence, present iff `is_recurring`.
    pub recurring_period: Option<RecurringPeriod>,
    /// Optional link to a receipt image.
    pub receipt_url: Option<String>,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Input for recording a new expense.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    /// Owner.
    pub user_id: UserId,
    /// Amount spent.
    pub amount: Decimal,
    /// Spending category.
    pub category: Category,
    /// Free-text description.
    pub description: String,
    /// When the money was spent.
    pub date: DateTime<Utc>,
    /// Whether the expense repeats.
    pub is_recurring: bool,
    /// Recurrence period.
    pub recurring_period: Option<RecurringPeriod>,
    /// Optional link to a receipt image.
    pub receipt_url: Option<String>,
    /// Free-form tags.
    pub tags: Vec<String>,
}

impl NewExpense {
    /// Normalizes text fields and checks the creation rules.
    ///
    /// The recurring period is dropped for non-recurring expenses.
    ///
    /// # Errors
    ///
    /// Returns the first rule the input breaks.
    pub fn validated(mut self) -> Result<Self, ExpenseError> {
        self.description = self.description.trim().to_string();
        self.tags = normalize_tags(self.tags);
        if !self.is_recurring {
            self.recurring_period = None;
        }

        validate_amount(self.amount)?;
        validate_description(&self.description)?;
        if self.is_recurring && self.recurring_period.is_none() {
            return Err(ExpenseError::MissingRecurringPeriod);
        }
        Ok(self)
    }
}

/// Partial update of an expense; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct ExpenseUpdate {
    /// New amount.
    pub amount: Option<Decimal>,
    /// New category.
    pub category: Option<Category>,
    /// New description.
    pub description: Option<String>,
    /// New date.
    pub date: Option<DateTime<Utc>>,
    /// New recurring flag.
    pub is_recurring: Option<bool>,
    /// New recurrence period.
    pub recurring_period: Option<RecurringPeriod>,
    /// Replacement tag list.
    pub tags: Option<Vec<String>>,
}

impl ExpenseUpdate {
    /// Applies the update to `expense`, leaving it untouched on error.
    ///
    /// # Errors
    ///
    /// Returns the first rule the updated expense would break.
    pub fn apply(self, expense: &mut Expense, now: DateTime<Utc>) -> Result<(), ExpenseError> {
        let mut updated = expense.clone();

        if let Some(amount) = self.amount {
            validate_amount(amount)?;
            updated.amount = amount;
        }
        if let Some(category) = self.category {
            updated.category = category;
        }
        if let Some(description) = self.description {
            let description = description.trim().to_string();
            validate_description(&description)?;
            updated.description = description;
        }
        if let Some(date) = self.date {
            updated.date = date;
        }
        if let Some(is_recurring) = self.is_recurring {
            updated.is_recurring = is_recurring;
        }
        if let Some(period) = self.recurring_period {
            updated.recurring_period = Some(period);
        }
        if let Some(tags) = self.tags {
            updated.tags = normalize_tags(tags);
        }
        if updated.is_recurring && updated.recurring_period.is_none() {
            return Err(ExpenseError::MissingRecurringPeriod);
        }

        updated.updated_at = now;
        *expense = updated;
        Ok(())
    }
}

fn validate_amount(amount: Decimal) -> Result<(), ExpenseError> {
    if amount <= Decimal::ZERO {
        return Err(ExpenseError::NonPositiveAmount);
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<(), ExpenseError> {
    if description.is_empty() {
        return Err(ExpenseError::MissingDescription);
    }
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ExpenseError::DescriptionTooLong {
            max: MAX_DESCRIPTION_LEN,
        });
    }
    Ok(())
}

fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}
