//! Expense repository for expense database operations.

use chrono::{DateTime, Utc};
use fintrack_core::expense::{
    Category, Expense, ExpenseError, ExpenseFilter, ExpenseSort, ExpenseUpdate, NewExpense,
    RecurringPeriod, SortField, SortOrder,
};
use fintrack_shared::types::{ExpenseId, PageRequest, UserId};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set,
};

use super::error::RepositoryError;
use crate::entities::expenses;

const TABLE: &str = "expenses";

/// One page of expenses plus totals over the whole filtered set.
#[derive(Debug, Clone)]
pub struct ExpensePage {
    /// Expenses on this page.
    pub expenses: Vec<Expense>,
    /// Number of expenses matching the filter.
    pub total_count: u64,
    /// Sum of amounts matching the filter.
    pub total_amount: Decimal,
}

/// Expense repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    db: DatabaseConnection,
}

impl ExpenseRepository {
    /// Creates a new expense repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists a user's expenses matching `filter`, ordered and paginated.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be read.
    pub async fn list(
        &self,
        user_id: UserId,
        filter: &ExpenseFilter,
        sort: ExpenseSort,
        page: PageRequest,
    ) -> Result<ExpensePage, RepositoryError> {
        let query = filtered(user_id, filter);

        let total_count = query.clone().count(&self.db).await?;
        let amounts: Vec<Decimal> = query
            .clone()
            .select_only()
            .column(expenses::Column::Amount)
            .into_tuple()
            .all(&self.db)
            .await?;

        let models = ordered(query, sort)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(ExpensePage {
            expenses: models
                .into_iter()
                .map(expense_from_model)
                .collect::<Result<_, _>>()?,
            total_count,
            total_amount: amounts.into_iter().sum(),
        })
    }

    /// Gets one of a user's expenses.
    ///
    /// # Errors
    ///
    /// Returns `ExpenseError::NotFound` if the user has no such expense.
    pub async fn find(&self, user_id: UserId, id: ExpenseId) -> Result<Expense, RepositoryError> {
        let model = self.find_model(user_id, id).await?;
        expense_from_model(model)
    }

    /// Records a new expense after validating it.
    ///
    /// # Errors
    ///
    /// Returns the violated `ExpenseError` rule or a database error.
    pub async fn create(&self, input: NewExpense) -> Result<Expense, RepositoryError> {
        let input = input.validated()?;
        let now = Utc::now().into();

        let model = expenses::ActiveModel {
            id: Set(ExpenseId::new().into_inner()),
            user_id: Set(input.user_id.into_inner()),
            amount: Set(input.amount),
            category: Set(input.category.as_str().to_string()),
            description: Set(input.description),
            date: Set(input.date.into()),
            is_recurring: Set(input.is_recurring),
            recurring_period: Set(input.recurring_period.map(|p| p.as_str().to_string())),
            receipt_url: Set(input.receipt_url),
            tags: Set(serde_json::json!(input.tags)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let saved = model.insert(&self.db).await?;
        tracing::debug!(expense_id = %saved.id, "expense inserted");
        expense_from_model(saved)
    }

    /// Applies a partial update to one of a user's expenses.
    ///
    /// # Errors
    ///
    /// Returns `ExpenseError::NotFound` or the violated rule.
    pub async fn update(
        &self,
        user_id: UserId,
        id: ExpenseId,
        update: ExpenseUpdate,
    ) -> Result<Expense, RepositoryError> {
        let model = self.find_model(user_id, id).await?;
        let mut expense = expense_from_model(model.clone())?;
        update.apply(&mut expense, Utc::now())?;

        let mut active = model.into_active_model();
        active.amount = Set(expense.amount);
        active.category = Set(expense.category.as_str().to_string());
        active.description = Set(expense.description);
        active.date = Set(expense.date.into());
        active.is_recurring = Set(expense.is_recurring);
        active.recurring_period = Set(expense.recurring_period.map(|p| p.as_str().to_string()));
        active.tags = Set(serde_json::json!(expense.tags));
        active.updated_at = Set(expense.updated_at.into());

        let saved = active.update(&self.db).await?;
        expense_from_model(saved)
    }

    /// Deletes one of a user's expenses.
    ///
    /// # Errors
    ///
    /// Returns `ExpenseError::NotFound` if nothing was deleted.
    pub async fn delete(&self, user_id: UserId, id: ExpenseId) -> Result<(), RepositoryError> {
        let result = expenses::Entity::delete_many()
            .filter(expenses::Column::Id.eq(id.into_inner()))
            .filter(expenses::Column::UserId.eq(user_id.into_inner()))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(ExpenseError::NotFound(id).into());
        }
        Ok(())
    }

    /// Expenses a budget covers, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be read.
    pub async fn find_for_budget(
        &self,
        user_id: UserId,
        category: Category,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Expense>, RepositoryError> {
        let filter = ExpenseFilter::for_category_between(category, start, end);
        self.fetch(filtered(user_id, &filter).order_by_desc(expenses::Column::Date))
            .await
    }

    /// Every expense a user has recorded.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be read.
    pub async fn list_all(&self, user_id: UserId) -> Result<Vec<Expense>, RepositoryError> {
        self.fetch(filtered(user_id, &ExpenseFilter::default()))
            .await
    }

    /// A user's expenses dated within `[start, end]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be read.
    pub async fn list_between(
        &self,
        user_id: UserId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Expense>, RepositoryError> {
        let filter = ExpenseFilter {
            category: None,
            start_date: Some(start),
            end_date: Some(end),
        };
        self.fetch(filtered(user_id, &filter)).await
    }

    async fn find_model(
        &self,
        user_id: UserId,
        id: ExpenseId,
    ) -> Result<expenses::Model, RepositoryError> {
        expenses::Entity::find_by_id(id.into_inner())
            .filter(expenses::Column::UserId.eq(user_id.into_inner()))
            .one(&self.db)
            .await?
            .ok_or_else(|| ExpenseError::NotFound(id).into())
    }

    async fn fetch(&self, query: Select<expenses::Entity>) -> Result<Vec<Expense>, RepositoryError> {
        query
            .all(&self.db)
            .await?
            .into_iter()
            .map(expense_from_model)
            .collect()
    }
}

fn filtered(user_id: UserId, filter: &ExpenseFilter) -> Select<expenses::Entity> {
    let mut query =
        expenses::Entity::find().filter(expenses::Column::UserId.eq(user_id.into_inner()));

    if let Some(category) = filter.category {
        query = query.filter(expenses::Column::Category.eq(category.as_str()));
    }
    if let Some(start) = filter.start_date {
        query = query.filter(expenses::Column::Date.gte(start));
    }
    if let Some(end) = filter.end_date {
        query = query.filter(expenses::Column::Date.lte(end));
    }
    query
}

fn ordered(query: Select<expenses::Entity>, sort: ExpenseSort) -> Select<expenses::Entity> {
    let column = match sort.field {
        SortField::Date => expenses::Column::Date,
        SortField::Amount => expenses::Column::Amount,
        SortField::CreatedAt => expenses::Column::CreatedAt,
    };
    match sort.order {
        SortOrder::Asc => query.order_by_asc(column),
        SortOrder::Desc => query.order_by_desc(column),
    }
}

/// Converts a stored row into the domain type.
///
/// # Errors
///
/// Returns `RepositoryError::Corrupt` for unknown enum labels or malformed tags.
pub fn expense_from_model(model: expenses::Model) -> Result<Expense, RepositoryError> {
    let id = model.id;
    let category = model
        .category
        .parse::<Category>()
        .map_err(|e| RepositoryError::corrupt(TABLE, id, e))?;
    let recurring_period = model
        .recurring_period
        .as_deref()
        .map(str::parse::<RecurringPeriod>)
        .transpose()
        .map_err(|e| RepositoryError::corrupt(TABLE, id, e))?;
    let tags: Vec<String> =
        serde_json::from_value(model.tags).map_err(|e| RepositoryError::corrupt(TABLE, id, e))?;

    Ok(Expense {
        id: ExpenseId::from_uuid(id),
        user_id: UserId::from_uuid(model.user_id),
        amount: model.amount,
        category,
        description: model.description,
        date: model.date.with_timezone(&Utc),
        is_recurring: model.is_recurring,
        recurring_period,
        receipt_url: model.receipt_url,
        tags,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn model() -> expenses::Model {
        let at = Utc.with_ymd_and_hms(2026, 4, 2, 9, 30, 0).unwrap().into();
        expenses::Model {
            id: Uuid::now_v7(),
            user_id: Uuid::now_v7(),
            amount: dec!(12.3400),
            category: "Food & Dining".to_string(),
            description: "Coffee".to_string(),
            date: at,
            is_recurring: true,
            recurring_period: Some("weekly".to_string()),
            receipt_url: None,
            tags: serde_json::json!(["morning"]),
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_model_converts() {
        let m = model();
        let expense = expense_from_model(m.clone()).unwrap();
        assert_eq!(expense.id.into_inner(), m.id);
        assert_eq!(expense.category, Category::FoodDining);
        assert_eq!(expense.recurring_period, Some(RecurringPeriod::Weekly));
        assert_eq!(expense.tags, vec!["morning".to_string()]);
        assert_eq!(expense.amount, dec!(12.34));
    }

    #[test]
    fn test_unknown_category_is_corrupt() {
        let mut m = model();
        m.category = "Groceries".to_string();
        assert!(matches!(
            expense_from_model(m),
            Err(RepositoryError::Corrupt { table: "expenses", .. })
        ));
    }

    #[test]
    fn test_malformed_tags_are_corrupt() {
        let mut m = model();
        m.tags = serde_json::json!({"not": "a list"});
        assert!(matches!(
            expense_from_model(m),
            Err(RepositoryError::Corrupt { .. })
        ));
    }
}
