//! Budget repository for budget database operations.

use chrono::Utc;
use fintrack_core::budget::{
    Budget, BudgetError, BudgetPeriod, BudgetService, BudgetUpdate, DateRange, NewBudget,
};
use fintrack_core::expense::Category;
use fintrack_shared::types::{BudgetId, UserId};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};

use super::error::RepositoryError;
use crate::entities::budgets;

const TABLE: &str = "budgets";

/// Budget repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct BudgetRepository {
    db: DatabaseConnection,
}

impl BudgetRepository {
    /// Creates a new budget repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists a user's budgets, newest first, optionally by active flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be read.
    pub async fn list(
        &self,
        user_id: UserId,
        is_active: Option<bool>,
    ) -> Result<Vec<Budget>, RepositoryError> {
        let mut query =
            budgets::Entity::find().filter(budgets::Column::UserId.eq(user_id.into_inner()));
        if let Some(active) = is_active {
            query = query.filter(budgets::Column::IsActive.eq(active));
        }

        query
            .order_by_desc(budgets::Column::CreatedAt)
            .all(&self.db)
            .await?
            .into_iter()
            .map(budget_from_model)
            .collect()
    }

    /// Gets one of a user's budgets.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::NotFound` if the user has no such budget.
    pub async fn find(&self, user_id: UserId, id: BudgetId) -> Result<Budget, RepositoryError> {
        budget_from_model(self.find_model(user_id, id).await?)
    }

    /// Creates a budget after validating it and checking for overlap with
    /// active budgets of the same category.
    ///
    /// # Errors
    ///
    /// Returns the violated `BudgetError` rule or a database error.
    pub async fn create(&self, input: NewBudget) -> Result<Budget, RepositoryError> {
        BudgetService::validate_new(&input)?;

        let clashing = self
            .find_overlapping_active(input.user_id, input.category, input.range(), None)
            .await?;
        BudgetService::ensure_no_overlap(input.category, input.range(), &clashing)?;

        let now = Utc::now().into();
        let model = budgets::ActiveModel {
            id: Set(BudgetId::new().into_inner()),
            user_id: Set(input.user_id.into_inner()),
            category: Set(input.category.as_str().to_string()),
            amount: Set(input.amount),
            period: Set(input.period.as_str().to_string()),
            start_date: Set(input.start_date.into()),
            end_date: Set(input.end_date.into()),
            spent: Set(Decimal::ZERO),
            alert_threshold: Set(i16::from(input.threshold())),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let saved = model.insert(&self.db).await?;
        tracing::debug!(budget_id = %saved.id, "budget inserted");
        budget_from_model(saved)
    }

    /// Applies a partial update, re-validating the result.
    ///
    /// An update that leaves the budget active is checked for overlap with
    /// the user's other active budgets.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::NotFound` or the violated rule.
    pub async fn update(
        &self,
        user_id: UserId,
        id: BudgetId,
        update: BudgetUpdate,
    ) -> Result<Budget, RepositoryError> {
        let model = self.find_model(user_id, id).await?;
        let mut budget = budget_from_model(model.clone())?;
        BudgetService::apply_update(&mut budget, update, Utc::now())?;

        if budget.is_active {
            let clashing = self
                .find_overlapping_active(user_id, budget.category, budget.range(), Some(id))
                .await?;
            BudgetService::ensure_no_overlap(budget.category, budget.range(), &clashing)?;
        }

        let mut active = model.into_active_model();
        active.category = Set(budget.category.as_str().to_string());
        active.amount = Set(budget.amount);
        active.period = Set(budget.period.as_str().to_string());
        active.start_date = Set(budget.start_date.into());
        active.end_date = Set(budget.end_date.into());
        active.alert_threshold = Set(i16::from(budget.alert_threshold));
        active.is_active = Set(budget.is_active);
        active.updated_at = Set(budget.updated_at.into());

        budget_from_model(active.update(&self.db).await?)
    }

    /// Deletes one of a user's budgets.
    ///
    /// # Errors
    ///
    /// Returns `BudgetError::NotFound` if nothing was deleted.
    pub async fn delete(&self, user_id: UserId, id: BudgetId) -> Result<(), RepositoryError> {
        let result = budgets::Entity::delete_many()
            .filter(budgets::Column::Id.eq(id.into_inner()))
            .filter(budgets::Column::UserId.eq(user_id.into_inner()))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(BudgetError::NotFound(id).into());
        }
        Ok(())
    }

    /// Active budgets of `category` whose range overlaps `range`.
    ///
    /// `exclude` skips one budget, for checks made while updating it.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be read.
    pub async fn find_overlapping_active(
        &self,
        user_id: UserId,
        category: Category,
        range: DateRange,
        exclude: Option<BudgetId>,
    ) -> Result<Vec<Budget>, RepositoryError> {
        let mut query = budgets::Entity::find()
            .filter(budgets::Column::UserId.eq(user_id.into_inner()))
            .filter(budgets::Column::Category.eq(category.as_str()))
            .filter(budgets::Column::IsActive.eq(true))
            .filter(budgets::Column::StartDate.lte(range.end))
            .filter(budgets::Column::EndDate.gte(range.start));
        if let Some(excluded) = exclude {
            query = query.filter(budgets::Column::Id.ne(excluded.into_inner()));
        }

        query
            .all(&self.db)
            .await?
            .into_iter()
            .map(budget_from_model)
            .collect()
    }

    async fn find_model(
        &self,
        user_id: UserId,
        id: BudgetId,
    ) -> Result<budgets::Model, RepositoryError> {
        budgets::Entity::find_by_id(id.into_inner())
            .filter(budgets::Column::UserId.eq(user_id.into_inner()))
            .one(&self.db)
            .await?
            .ok_or_else(|| BudgetError::NotFound(id).into())
    }
}

/// Converts a stored row into the domain type.
///
/// # Errors
///
/// Returns `RepositoryError::Corrupt` for unknown enum labels or an
/// out-of-range threshold.
pub fn budget_from_model(model: budgets::Model) -> Result<Budget, RepositoryError> {
    let id = model.id;
    let category = model
        .category
        .parse::<Category>()
        .map_err(|e| RepositoryError::corrupt(TABLE, id, e))?;
    let period = model
        .period
        .parse::<BudgetPeriod>()
        .map_err(|e| RepositoryError::corrupt(TABLE, id, e))?;
    let alert_threshold = u8::try_from(model.alert_threshold)
        .ok()
        .filter(|t| *t <= 100)
        .ok_or_else(|| {
            RepositoryError::corrupt(
                TABLE,
                id,
                format!("alert threshold {} out of range", model.alert_threshold),
            )
        })?;

    Ok(Budget {
        id: BudgetId::from_uuid(id),
        user_id: UserId::from_uuid(model.user_id),
        category,
        amount: model.amount,
        period,
        start_date: model.start_date.with_timezone(&Utc),
        end_date: model.end_date.with_timezone(&Utc),
        spent: model.spent,
        alert_threshold,
        is_active: model.is_active,
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

    fn model() -> budgets::Model {
        let start = Utc.with_ymd_and_hms(2026, 4, 1, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 4, 30, 23, 59, 59).unwrap();
        budgets::Model {
            id: Uuid::now_v7(),
            user_id: Uuid::now_v7(),
            category: "Travel".to_string(),
            amount: dec!(1500.0000),
            period: "monthly".to_string(),
            start_date: start.into(),
            end_date: end.into(),
            spent: Decimal::ZERO,
            alert_threshold: 75,
            is_active: true,
            created_at: start.into(),
            updated_at: start.into(),
        }
    }

    #[test]
    fn test_model_converts() {
        let budget = budget_from_model(model()).unwrap();
        assert_eq!(budget.category, Category::Travel);
        assert_eq!(budget.period, BudgetPeriod::Monthly);
        assert_eq!(budget.alert_threshold, 75);
        assert!(budget.end_date > budget.start_date);
    }

    #[test]
    fn test_bad_rows_are_corrupt() {
        let mut m = model();
        m.period = "fortnightly".to_string();
        assert!(matches!(budget_from_model(m), Err(RepositoryError::Corrupt { .. })));

        let mut m = model();
        m.alert_threshold = 120;
        assert!(matches!(budget_from_model(m), Err(RepositoryError::Corrupt { .. })));

        let mut m = model();
        m.alert_threshold = -1;
        assert!(matches!(budget_from_model(m), Err(RepositoryError::Corrupt { .. })));
    }
}
