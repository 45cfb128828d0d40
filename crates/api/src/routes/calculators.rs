//! Loan and investment calculator routes.
//!
//! Fields arrive as form text (numbers are accepted too). Inputs the
//! calculators cannot use produce `data: null` rather than an error status.

use axum::{
    Json, Router,
    extract::rejection::JsonRejection,
    response::IntoResponse,
    routing::post,
};
use fintrack_core::projection::{EmiInput, FinancialProjector, SipInput, SwpInput};
use serde::Deserialize;

use crate::{AppState, response::success};

/// Creates the calculator routes. They touch no user data and need no token.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/calculators/emi", post(emi))
        .route("/calculators/sip", post(sip))
        .route("/calculators/swp", post(swp))
}

/// A numeric form field sent as text or as a JSON number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FormField {
    /// Text as typed.
    Text(String),
    /// A JSON number.
    Number(serde_json::Number),
}

impl Default for FormField {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl FormField {
    fn text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Number(number) => number.to_string(),
        }
    }
}

/// Request body for the EMI calculator.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmiRequest {
    /// Principal.
    pub loan_amount: FormField,
    /// Annual interest rate in percent.
    pub interest_rate: FormField,
    /// Tenure in years.
    pub loan_tenure: FormField,
}

/// Request body for the SIP calculator.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SipRequest {
    /// Monthly contribution.
    pub monthly_investment: FormField,
    /// Expected annual return in percent.
    pub expected_return: FormField,
    /// Duration in years.
    pub time_period: FormField,
}

/// Request body for the SWP calculator.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SwpRequest {
    /// Starting corpus.
    pub total_investment: FormField,
    /// Monthly withdrawal.
    pub withdrawal_per_month: FormField,
    /// Expected annual return in percent.
    pub expected_return: FormField,
    /// Duration in years.
    pub time_period: FormField,
}

/// POST /calculators/emi
async fn emi(payload: Result<Json<EmiRequest>, JsonRejection>) -> impl IntoResponse {
    let req = payload.map(|Json(r)| r).unwrap_or_default();
    let input = EmiInput::parse(
        &req.loan_amount.text(),
        &req.interest_rate.text(),
        &req.loan_tenure.text(),
    );
    success(FinancialProjector::emi(&input))
}

/// POST /calculators/sip
async fn sip(payload: Result<Json<SipRequest>, JsonRejection>) -> impl IntoResponse {
    let req = payload.map(|Json(r)| r).unwrap_or_default();
    let input = SipInput::parse(
        &req.monthly_investment.text(),
        &req.expected_return.text(),
        &req.time_period.text(),
    );
    success(FinancialProjector::sip(&input))
}

/// POST /calculators/swp
async fn swp(payload: Result<Json<SwpRequest>, JsonRejection>) -> impl IntoResponse {
    let req = payload.map(|Json(r)| r).unwrap_or_default();
    let input = SwpInput::parse(
        &req.total_investment.text(),
        &req.withdrawal_per_month.text(),
        &req.expected_return.text(),
        &req.time_period.text(),
    );
    success(FinancialProjector::swp(&input))
}
