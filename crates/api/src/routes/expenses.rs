//! Expense CRUD, listing, and analytics routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use fintrack_core::expense::{
    AnalyticsPeriod, Category, Expense, ExpenseAnalytics, ExpenseFilter, ExpenseSort,
    ExpenseUpdate, NewExpense, RecurringPeriod, SortField, SortOrder,
};
use fintrack_db::ExpenseRepository;
use fintrack_shared::types::{ExpenseId, PageMeta, PageRequest};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::{
    AppState,
    error::{ApiError, ApiResult},
    middleware::AuthUser,
    response::success,
};

/// Creates the expense routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/expenses", get(list_expenses).post(create_expense))
        .route(
            "/expenses/{id}",
            get(get_expense).put(update_expense).delete(delete_expense),
        )
        .route("/expenses/analytics/summary", get(spending_summary))
        .route("/expenses/categories/list", get(list_categories))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing expenses.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListExpensesQuery {
    /// Category label, or `all`.
    pub category: Option<String>,
    /// Earliest date, RFC 3339 or `YYYY-MM-DD`.
    pub start_date: Option<String>,
    /// Latest date, RFC 3339 or `YYYY-MM-DD` (whole day).
    pub end_date: Option<String>,
    /// Page number, from 1.
    pub page: Option<u32>,
    /// Page size.
    pub limit: Option<u32>,
    /// Field to order by.
    pub sort_by: Option<SortField>,
    /// Direction.
    pub sort_order: Option<SortOrder>,
}

/// Request body for recording an expense.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExpenseRequest {
    /// Amount spent.
    pub amount: Decimal,
    /// Category label.
    pub category: Category,
    /// What the money was spent on.
    pub description: String,
    /// When it was spent; defaults to now.
    pub date: Option<DateTime<Utc>>,
    /// Whether the expense repeats.
    #[serde(default)]
    pub is_recurring: bool,
    /// Recurrence period, required when recurring.
    pub recurring_period: Option<RecurringPeriod>,
    /// Link to a receipt.
    pub receipt_url: Option<String>,
    /// Free-form tags.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Request body for updating an expense.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExpenseRequest {
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
    /// Replacement tags.
    pub tags: Option<Vec<String>>,
}

impl From<UpdateExpenseRequest> for ExpenseUpdate {
    fn from(req: UpdateExpenseRequest) -> Self {
        Self {
            amount: req.amount,
            category: req.category,
            description: req.description,
            date: req.date,
            is_recurring: req.is_recurring,
            recurring_period: req.recurring_period,
            tags: req.tags,
        }
    }
}

/// Totals over the whole filtered list.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSummary {
    /// Sum of matching amounts.
    pub total_amount: Decimal,
    /// Number of matching expenses.
    pub count: u64,
}

/// Response for the expense list.
#[derive(Debug, Serialize)]
pub struct ExpenseListResponse {
    /// Expenses on this page.
    pub expenses: Vec<Expense>,
    /// Pagination metadata.
    pub pagination: PageMeta,
    /// Totals across all pages.
    pub summary: ListSummary,
}

/// Query parameters for the analytics summary.
#[derive(Debug, Deserialize)]
pub struct AnalyticsQuery {
    /// `week`, `month`, or `year`.
    pub period: Option<String>,
}

// ============================================================================
// Query parsing
// ============================================================================

fn parse_category(value: Option<&str>) -> ApiResult<Option<Category>> {
    match value.map(str::trim) {
        None | Some("" | "all") => Ok(None),
        Some(label) => label.parse().map(Some).map_err(ApiError::validation),
    }
}

/// Parses an RFC 3339 instant, or a bare date taken as the start or end of that day.
fn parse_date(value: Option<&str>, end_of_day: bool) -> ApiResult<Option<DateTime<Utc>>> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Ok(Some(instant.with_timezone(&Utc)));
    }

    let day = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| ApiError::validation(format!("Invalid date: {value}")))?;
    let time = if end_of_day {
        NaiveTime::from_hms_milli_opt(23, 59, 59, 999)
    } else {
        Some(NaiveTime::MIN)
    };
    Ok(time.map(|t| day.and_time(t).and_utc()))
}

impl ListExpensesQuery {
    fn filter(&self) -> ApiResult<ExpenseFilter> {
        Ok(ExpenseFilter {
            category: parse_category(self.category.as_deref())?,
            start_date: parse_date(self.start_date.as_deref(), false)?,
            end_date: parse_date(self.end_date.as_deref(), true)?,
        })
    }

    fn sort(&self) -> ExpenseSort {
        ExpenseSort {
            field: self.sort_by.unwrap_or_default(),
            order: self.sort_order.unwrap_or_default(),
        }
    }

    fn page(&self) -> PageRequest {
        let defaults = PageRequest::default();
        PageRequest::new(
            self.page.unwrap_or(defaults.page),
            self.limit.unwrap_or(defaults.limit),
        )
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /expenses - Filtered, sorted, paginated list with totals.
async fn list_expenses(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListExpensesQuery>,
) -> ApiResult<impl IntoResponse> {
    let filter = query.filter()?;
    let page = query.page();

    let result = ExpenseRepository::new((*state.db).clone())
        .list(auth.user_id(), &filter, query.sort(), page)
        .await?;

    Ok(success(ExpenseListResponse {
        expenses: result.expenses,
        pagination: PageMeta::new(page, result.total_count),
        summary: ListSummary {
            total_amount: result.total_amount,
            count: result.total_count,
        },
    }))
}

/// GET /expenses/{id}
async fn get_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<ExpenseId>,
) -> ApiResult<impl IntoResponse> {
    let expense = ExpenseRepository::new((*state.db).clone())
        .find(auth.user_id(), id)
        .await?;
    Ok(success(expense))
}

/// POST /expenses
async fn create_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateExpenseRequest>,
) -> ApiResult<impl IntoResponse> {
    let expense = ExpenseRepository::new((*state.db).clone())
        .create(NewExpense {
            user_id: auth.user_id(),
            amount: payload.amount,
            category: payload.category,
            description: payload.description,
            date: payload.date.unwrap_or_else(Utc::now),
            is_recurring: payload.is_recurring,
            recurring_period: payload.recurring_period,
            receipt_url: payload.receipt_url,
            tags: payload.tags,
        })
        .await?;

    info!(expense_id = %expense.id, user_id = %expense.user_id, "Expense recorded");
    Ok((StatusCode::CREATED, success(expense)))
}

/// PUT /expenses/{id}
async fn update_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<ExpenseId>,
    Json(payload): Json<UpdateExpenseRequest>,
) -> ApiResult<impl IntoResponse> {
    let expense = ExpenseRepository::new((*state.db).clone())
        .update(auth.user_id(), id, payload.into())
        .await?;
    Ok(success(expense))
}

/// DELETE /expenses/{id}
async fn delete_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<ExpenseId>,
) -> ApiResult<impl IntoResponse> {
    ExpenseRepository::new((*state.db).clone())
        .delete(auth.user_id(), id)
        .await?;

    info!(expense_id = %id, "Expense deleted");
    Ok(Json(json!({
        "success": true,
        "message": "Expense deleted successfully"
    })))
}

/// GET /expenses/analytics/summary?period=week|month|year
async fn spending_summary(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<AnalyticsQuery>,
) -> ApiResult<impl IntoResponse> {
    let period = AnalyticsPeriod::parse_or_default(query.period.as_deref());
    let now = Utc::now();
    let expenses = ExpenseRepository::new((*state.db).clone())
        .list_between(auth.user_id(), period.start(now), now)
        .await?;

    Ok(success(ExpenseAnalytics::summarize(&expenses, period, now)))
}

/// GET /expenses/categories/list
async fn list_categories() -> impl IntoResponse {
    success(Category::ALL.map(|c| c.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_category_all_means_unfiltered() {
        assert_eq!(parse_category(None).unwrap(), None);
        assert_eq!(parse_category(Some("all")).unwrap(), None);
        assert_eq!(
            parse_category(Some("Travel")).unwrap(),
            Some(Category::Travel)
        );
        assert!(parse_category(Some("Groceries")).is_err());
    }

    #[test]
    fn test_bare_dates_cover_whole_day() {
        let start = parse_date(Some("2026-04-01"), false).unwrap().unwrap();
        let end = parse_date(Some("2026-04-01"), true).unwrap().unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 4, 1, 0, 0, 0).unwrap());
        assert!(end > Utc.with_ymd_and_hms(2026, 4, 1, 23, 59, 59).unwrap());
        assert!(end < Utc.with_ymd_and_hms(2026, 4, 2, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_rfc3339_dates_are_exact() {
        let parsed = parse_date(Some("2026-04-01T12:30:00+02:00"), true)
            .unwrap()
            .unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2026, 4, 1, 10, 30, 0).unwrap());
        assert_eq!(parse_date(Some(""), false).unwrap(), None);
        assert!(parse_date(Some("yesterday"), false).is_err());
    }

    #[test]
    fn test_query_defaults() {
        let query = ListExpensesQuery::default();
        let page = query.page();
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, 50);
        assert_eq!(query.sort(), ExpenseSort::default());
    }
}
