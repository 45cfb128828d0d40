//! Mapping from domain and repository errors to HTTP responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use fintrack_core::auth::PasswordError;
use fintrack_core::budget::BudgetError;
use fintrack_core::expense::ExpenseError;
use fintrack_db::RepositoryError;
use fintrack_shared::{AppError, JwtError};
use serde_json::json;
use tracing::error;

/// Handler error; renders as `{"error", "message"}` with the mapped status.
#[derive(Debug)]
pub struct ApiError(pub AppError);

/// Result alias for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// 400 with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self(AppError::Validation(message.into()))
    }

    /// 401 with the given message.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self(AppError::Unauthorized(message.into()))
    }

    /// 404 with the given message.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self(AppError::NotFound(message.into()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if self.0.is_server_error() {
            error!(error = %self.0, "request failed");
        }

        (
            status,
            Json(json!({
                "error": self.0.error_code().to_ascii_lowercase(),
                "message": self.0.public_message(),
            })),
        )
            .into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<ExpenseError> for ApiError {
    fn from(err: ExpenseError) -> Self {
        match err {
            ExpenseError::NotFound(_) => Self::not_found("Expense not found"),
            other => Self::validation(other.to_string()),
        }
    }
}

impl From<BudgetError> for ApiError {
    fn from(err: BudgetError) -> Self {
        match err {
            BudgetError::NotFound(_) => Self::not_found("Budget not found"),
            BudgetError::DuplicateActiveBudget(_) => Self(AppError::Conflict(err.to_string())),
            BudgetError::InvalidBudget { .. } => Self(AppError::Internal(err.to_string())),
            other => Self::validation(other.to_string()),
        }
    }
}

impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Expense(e) => e.into(),
            RepositoryError::Budget(e) => e.into(),
            RepositoryError::UserNotFound(_) => Self::not_found("User not found"),
            RepositoryError::EmailTaken => Self(AppError::Conflict(err.to_string())),
            RepositoryError::Database(e) => Self(AppError::Database(e.to_string())),
            RepositoryError::Corrupt { .. } => Self(AppError::Internal(err.to_string())),
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        match err {
            PasswordError::TooShort { .. } => Self::validation(err.to_string()),
            other => Self(AppError::Internal(other.to_string())),
        }
    }
}

impl From<JwtError> for ApiError {
    fn from(err: JwtError) -> Self {
        Self(AppError::Internal(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fintrack_core::expense::Category;
    use fintrack_shared::types::{BudgetId, ExpenseId};
    use http_body_util::BodyExt;
    use rstest::rstest;

    async fn render(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[rstest]
    #[case(BudgetError::NotFound(BudgetId::new()).into(), StatusCode::NOT_FOUND)]
    #[case(BudgetError::DuplicateActiveBudget(Category::Travel).into(), StatusCode::CONFLICT)]
    #[case(BudgetError::InvalidDateRange.into(), StatusCode::BAD_REQUEST)]
    #[case(ExpenseError::NotFound(ExpenseId::new()).into(), StatusCode::NOT_FOUND)]
    #[case(ExpenseError::NonPositiveAmount.into(), StatusCode::BAD_REQUEST)]
    #[case(RepositoryError::EmailTaken.into(), StatusCode::CONFLICT)]
    #[case(PasswordError::TooShort { min: 6 }.into(), StatusCode::BAD_REQUEST)]
    #[case(JwtError::Expired.into(), StatusCode::INTERNAL_SERVER_ERROR)]
    #[tokio::test]
    async fn test_status_mapping(#[case] err: ApiError, #[case] expected: StatusCode) {
        let (status, _) = render(err).await;
        assert_eq!(status, expected);
    }

    #[tokio::test]
    async fn test_client_error_body() {
        let (_, body) = render(ExpenseError::NonPositiveAmount.into()).await;
        assert_eq!(body["error"], "validation_error");
        assert_eq!(body["message"], "Amount must be greater than 0");
    }

    #[tokio::test]
    async fn test_server_error_hides_details() {
        let err = RepositoryError::Database(sea_orm::DbErr::Custom("connection reset".into()));
        let (status, body) = render(err.into()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "An error occurred");
    }
}
