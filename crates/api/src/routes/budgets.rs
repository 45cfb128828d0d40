//! Budget management, reconciliation overview, and alert routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::{DateTime, Utc};
use fintrack_core::budget::{
    Alert, AlertKind, Budget, BudgetPeriod, BudgetReconciler, BudgetSummary, BudgetUpdate,
    NewBudget, ReconciliationResult,
};
use fintrack_core::expense::{Category, Expense};
use fintrack_db::{BudgetRepository, ExpenseRepository};
use fintrack_shared::types::money::round_to_cents;
use fintrack_shared::types::{BudgetId, UserId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::{AppState, error::ApiResult, middleware::AuthUser, response::success};

/// Creates the budget routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/budgets", get(list_budgets).post(create_budget))
        .route(
            "/budgets/{id}",
            get(get_budget).put(update_budget).delete(delete_budget),
        )
        .route("/budgets/analytics/overview", get(budget_overview))
        .route("/budgets/alerts", get(budget_alerts))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing budgets.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListBudgetsQuery {
    /// Only budgets with this active flag.
    pub is_active: Option<bool>,
}

/// Request body for creating a budget.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBudgetRequest {
    /// Category the budget covers.
    pub category: Category,
    /// Spending limit.
    pub amount: Decimal,
    /// Period label; defaults to monthly.
    pub period: Option<BudgetPeriod>,
    /// Start of the covered range.
    pub start_date: DateTime<Utc>,
    /// End of the covered range.
    pub end_date: DateTime<Utc>,
    /// Alert threshold percentage; defaults to 80.
    pub alert_threshold: Option<u8>,
}

/// Request body for updating a budget.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBudgetRequest {
    /// New category.
    pub category: Option<Category>,
    /// New limit.
    pub amount: Option<Decimal>,
    /// New period label.
    pub period: Option<BudgetPeriod>,
    /// New start date.
    pub start_date: Option<DateTime<Utc>>,
    /// New end date.
    pub end_date: Option<DateTime<Utc>>,
    /// New alert threshold.
    pub alert_threshold: Option<u8>,
    /// Activate or deactivate.
    pub is_active: Option<bool>,
}

impl From<UpdateBudgetRequest> for BudgetUpdate {
    fn from(req: UpdateBudgetRequest) -> Self {
        Self {
            category: req.category,
            amount: req.amount,
            period: req.period,
            start_date: req.start_date,
            end_date: req.end_date,
            alert_threshold: req.alert_threshold,
            is_active: req.is_active,
        }
    }
}

/// Spending figures attached to a budget in list and detail responses.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetMetrics {
    /// Sum of covered expenses.
    pub actual_spent: Decimal,
    /// Limit minus spent; negative when over budget.
    pub remaining_amount: Decimal,
    /// Percentage used, capped at 100.
    pub percentage_used: Decimal,
    /// Whether spending exceeds the limit.
    pub is_over_budget: bool,
    /// Whether the alert threshold was reached.
    pub needs_alert: bool,
    /// Number of covered expenses.
    pub expense_count: usize,
}

impl From<&ReconciliationResult> for BudgetMetrics {
    fn from(result: &ReconciliationResult) -> Self {
        Self {
            actual_spent: result.actual_spent,
            remaining_amount: result.remaining_amount,
            percentage_used: round_to_cents(result.percentage_used),
            is_over_budget: result.is_over_budget,
            needs_alert: result.needs_alert,
            expense_count: result.expense_count,
        }
    }
}

/// A budget with its spending figures.
#[derive(Debug, Serialize)]
pub struct BudgetWithMetrics {
    /// Stored budget.
    #[serde(flatten)]
    pub budget: Budget,
    /// Reconciled figures.
    #[serde(flatten)]
    pub metrics: BudgetMetrics,
}

/// A budget with its figures and the expenses it covers.
#[derive(Debug, Serialize)]
pub struct BudgetDetail {
    /// Budget and figures.
    #[serde(flatten)]
    pub budget: BudgetWithMetrics,
    /// Covered expenses, newest first.
    pub expenses: Vec<Expense>,
}

/// Totals over the budgets active now.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewSummary {
    /// Sum of limits.
    pub total_budgeted: Decimal,
    /// Sum of spending.
    pub total_spent: Decimal,
    /// Budgeted minus spent.
    pub total_remaining: Decimal,
    /// Spent over budgeted, not capped.
    pub overall_percentage_used: Decimal,
    /// Number of budgets active now.
    pub active_budget_count: usize,
    /// Budgets over their limit.
    pub over_budget_count: usize,
    /// Budgets at or past their threshold.
    pub alerts_needed: usize,
}

impl From<BudgetSummary> for OverviewSummary {
    fn from(summary: BudgetSummary) -> Self {
        Self {
            total_budgeted: summary.total_budgeted,
            total_spent: summary.total_spent,
            total_remaining: summary.total_remaining,
            overall_percentage_used: round_to_cents(summary.overall_percentage_used),
            active_budget_count: summary.budget_count,
            over_budget_count: summary.over_budget_count,
            alerts_needed: summary.alerts_needed,
        }
    }
}

/// Response for the overview endpoint.
#[derive(Debug, Serialize)]
pub struct BudgetOverview {
    /// Totals.
    pub summary: OverviewSummary,
    /// Per-budget results.
    pub budgets: Vec<ReconciliationResult>,
}

// ============================================================================
// Helpers
// ============================================================================

fn rounded(mut result: ReconciliationResult) -> ReconciliationResult {
    result.percentage_used = round_to_cents(result.percentage_used);
    result.raw_percentage_used = round_to_cents(result.raw_percentage_used);
    result
}

fn rounded_alert(mut alert: Alert) -> Alert {
    if let AlertKind::ApproachingLimit { percentage_used } = &mut alert.kind {
        *percentage_used = round_to_cents(*percentage_used);
    }
    alert
}

/// Reconciles `budgets` against all of the user's expenses.
async fn reconcile(
    state: &AppState,
    user_id: UserId,
    budgets: &[Budget],
) -> ApiResult<Vec<ReconciliationResult>> {
    if budgets.is_empty() {
        return Ok(Vec::new());
    }
    let expenses = ExpenseRepository::new((*state.db).clone())
        .list_all(user_id)
        .await?;
    Ok(BudgetReconciler::reconcile_all(budgets, &expenses)?)
}

/// The user's budgets that are active and cover `now`.
async fn active_now(
    state: &AppState,
    user_id: UserId,
    now: DateTime<Utc>,
) -> ApiResult<Vec<Budget>> {
    let budgets = BudgetRepository::new((*state.db).clone())
        .list(user_id, Some(true))
        .await?;
    Ok(budgets.into_iter().filter(|b| b.is_active_at(now)).collect())
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /budgets?isActive= - Budgets with their spending figures.
async fn list_budgets(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ListBudgetsQuery>,
) -> ApiResult<impl IntoResponse> {
    let budgets = BudgetRepository::new((*state.db).clone())
        .list(auth.user_id(), query.is_active)
        .await?;
    let results = reconcile(&state, auth.user_id(), &budgets).await?;

    let data: Vec<BudgetWithMetrics> = budgets
        .into_iter()
        .zip(&results)
        .map(|(budget, result)| BudgetWithMetrics {
            budget,
            metrics: result.into(),
        })
        .collect();

    Ok(success(data))
}

/// GET /budgets/{id} - One budget with figures and covered expenses.
async fn get_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<BudgetId>,
) -> ApiResult<impl IntoResponse> {
    let budget = BudgetRepository::new((*state.db).clone())
        .find(auth.user_id(), id)
        .await?;
    let expenses = ExpenseRepository::new((*state.db).clone())
        .find_for_budget(
            auth.user_id(),
            budget.category,
            budget.start_date,
            budget.end_date,
        )
        .await?;
    let result = BudgetReconciler::reconcile(&budget, &expenses)?;

    Ok(success(BudgetDetail {
        budget: BudgetWithMetrics {
            budget,
            metrics: (&result).into(),
        },
        expenses,
    }))
}

/// POST /budgets
async fn create_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateBudgetRequest>,
) -> ApiResult<impl IntoResponse> {
    let budget = BudgetRepository::new((*state.db).clone())
        .create(NewBudget {
            user_id: auth.user_id(),
            category: payload.category,
            amount: payload.amount,
            period: payload.period.unwrap_or_default(),
            start_date: payload.start_date,
            end_date: payload.end_date,
            alert_threshold: payload.alert_threshold,
        })
        .await?;

    info!(budget_id = %budget.id, category = %budget.category, "Budget created");
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": budget,
            "message": "Budget created successfully"
        })),
    ))
}

/// PUT /budgets/{id}
async fn update_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<BudgetId>,
    Json(payload): Json<UpdateBudgetRequest>,
) -> ApiResult<impl IntoResponse> {
    let budget = BudgetRepository::new((*state.db).clone())
        .update(auth.user_id(), id, payload.into())
        .await?;

    Ok(Json(json!({
        "success": true,
        "data": budget,
        "message": "Budget updated successfully"
    })))
}

/// DELETE /budgets/{id}
async fn delete_budget(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<BudgetId>,
) -> ApiResult<impl IntoResponse> {
    BudgetRepository::new((*state.db).clone())
        .delete(auth.user_id(), id)
        .await?;

    info!(budget_id = %id, "Budget deleted");
    Ok(Json(json!({
        "success": true,
        "message": "Budget deleted successfully"
    })))
}

/// GET /budgets/analytics/overview - Totals over budgets active now.
async fn budget_overview(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<impl IntoResponse> {
    let budgets = active_now(&state, auth.user_id(), Utc::now()).await?;
    let results = reconcile(&state, auth.user_id(), &budgets).await?;
    let summary = BudgetReconciler::summarize(&results);

    Ok(success(BudgetOverview {
        summary: summary.into(),
        budgets: results.into_iter().map(rounded).collect(),
    }))
}

/// GET /budgets/alerts - Over-budget and approaching-limit alerts.
async fn budget_alerts(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<impl IntoResponse> {
    let budgets = active_now(&state, auth.user_id(), Utc::now()).await?;
    let results = reconcile(&state, auth.user_id(), &budgets).await?;
    let alerts: Vec<Alert> = BudgetReconciler::derive_alerts(&results)
        .into_iter()
        .map(rounded_alert)
        .collect();

    Ok(success(json!({
        "alertCount": alerts.len(),
        "alerts": alerts,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn budget() -> Budget {
        let start = Utc.with_ymd_and_hms(2026, 4, 1, 0, 0, 0).unwrap();
        Budget {
            id: BudgetId::new(),
            user_id: UserId::new(),
            category: Category::Shopping,
            amount: dec!(300),
            period: BudgetPeriod::Monthly,
            start_date: start,
            end_date: Utc.with_ymd_and_hms(2026, 4, 30, 23, 59, 59).unwrap(),
            spent: Decimal::ZERO,
            alert_threshold: 80,
            is_active: true,
            created_at: start,
            updated_at: start,
        }
    }

    fn result_for(spent: Decimal) -> ReconciliationResult {
        let budget = budget();
        let expense = Expense {
            id: fintrack_shared::types::ExpenseId::new(),
            user_id: budget.user_id,
            amount: spent,
            category: Category::Shopping,
            description: "Shoes".to_string(),
            date: Utc.with_ymd_and_hms(2026, 4, 10, 12, 0, 0).unwrap(),
            is_recurring: false,
            recurring_period: None,
            receipt_url: None,
            tags: Vec::new(),
            created_at: budget.start_date,
            updated_at: budget.start_date,
        };
        BudgetReconciler::reconcile(&budget, &[expense]).unwrap()
    }

    #[test]
    fn test_metrics_round_percentages() {
        let metrics = BudgetMetrics::from(&result_for(dec!(100)));
        assert_eq!(metrics.percentage_used, dec!(33.33));
        assert_eq!(metrics.remaining_amount, dec!(200));
        assert!(!metrics.needs_alert);
    }

    #[test]
    fn test_flattened_budget_json() {
        let result = result_for(dec!(450));
        let json = serde_json::to_value(BudgetWithMetrics {
            budget: budget(),
            metrics: (&result).into(),
        })
        .unwrap();

        assert_eq!(json["category"], "Shopping");
        assert_eq!(json["alertThreshold"], 80);
        assert_eq!(json["actualSpent"], "450");
        assert_eq!(json["remainingAmount"], "-150");
        assert_eq!(json["percentageUsed"], "100");
        assert_eq!(json["isOverBudget"], true);
    }

    #[test]
    fn test_alert_percentage_rounded_to_cents() {
        let result = result_for(dec!(250));
        let alert = Alert::for_result(&result).map(rounded_alert).unwrap();

        assert_eq!(
            alert.kind,
            AlertKind::ApproachingLimit {
                percentage_used: dec!(83.33)
            }
        );
        let json = serde_json::to_value(&alert).unwrap();
        assert_eq!(json["type"], "approaching_limit");
        assert_eq!(json["percentageUsed"], "83.33");
    }

    #[test]
    fn test_overview_summary_keeps_uncapped_percentage() {
        let results = vec![rounded(result_for(dec!(450)))];
        let summary = OverviewSummary::from(BudgetReconciler::summarize(&results));

        assert_eq!(summary.active_budget_count, 1);
        assert_eq!(summary.overall_percentage_used, dec!(150));
        assert_eq!(summary.total_remaining, dec!(-150));
        assert_eq!(summary.over_budget_count, 1);
    }
}
