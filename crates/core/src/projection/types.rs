//! Calculator inputs and results.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// Longest tenure the calculators accept.
pub const MAX_TENURE_YEARS: u32 = 100;

const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);
const MONTHLY_RATE_DIVISOR: Decimal = Decimal::from_parts(1200, 0, 0, false, 0);

/// Parses a UI field; blank or unparsable text reads as zero.
pub(crate) fn parse_field(raw: &str) -> Decimal {
    Decimal::from_str(raw.trim()).unwrap_or(Decimal::ZERO)
}

/// Annual percent to monthly fraction, or `None` if negative.
pub(crate) fn monthly_rate(annual_rate_percent: Decimal) -> Option<Decimal> {
    if annual_rate_percent < Decimal::ZERO {
        return None;
    }
    Some(annual_rate_percent / MONTHLY_RATE_DIVISOR)
}

/// Whole months in `years`, or `None` outside `1..=MAX_TENURE_YEARS * 12`.
pub(crate) fn total_months(years: Decimal) -> Option<u32> {
    let months = (years * MONTHS_PER_YEAR).floor().to_u32()?;
    (1..=MAX_TENURE_YEARS * 12).contains(&months).then_some(months)
}

/// Loan amortization input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmiInput {
    /// Loan amount.
    pub principal: Decimal,
    /// Annual interest rate in percent.
    pub annual_rate_percent: Decimal,
    /// Tenure in years.
    pub years: Decimal,
}

impl EmiInput {
    /// Builds an input from raw form fields.
    #[must_use]
    pub fn parse(principal: &str, annual_rate_percent: &str, years: &str) -> Self {
        Self {
            principal: parse_field(principal),
            annual_rate_percent: parse_field(annual_rate_percent),
            years: parse_field(years),
        }
    }
}

/// Principal and interest paid during one loan year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmiYear {
    /// Year number, starting at 1.
    pub year: u32,
    /// Principal repaid that year.
    pub principal: Decimal,
    /// Interest paid that year.
    pub interest: Decimal,
}

/// Loan amortization result. Amounts are whole currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmiResult {
    /// Equated monthly installment.
    pub monthly_payment: Decimal,
    /// Installment times number of months.
    pub total_payment: Decimal,
    /// `total_payment - principal`.
    pub total_interest: Decimal,
    /// Loan amount.
    pub principal: Decimal,
    /// First ten years (at most) of the schedule.
    pub yearly_breakdown: Vec<EmiYear>,
}

/// Recurring investment input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SipInput {
    /// Monthly contribution.
    pub monthly_investment: Decimal,
    /// Expected annual return in percent.
    pub annual_rate_percent: Decimal,
    /// Investment horizon in years.
    pub years: Decimal,
}

impl SipInput {
    /// Builds an input from raw form fields.
    #[must_use]
    pub fn parse(monthly_investment: &str, annual_rate_percent: &str, years: &str) -> Self {
        Self {
            monthly_investment: parse_field(monthly_investment),
            annual_rate_percent: parse_field(annual_rate_percent),
            years: parse_field(years),
        }
    }
}

/// Recurring investment result. Amounts are whole currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SipResult {
    /// Value at the end of the horizon.
    pub future_value: Decimal,
    /// Sum of contributions.
    pub total_invested: Decimal,
    /// `future_value - total_invested`.
    pub estimated_returns: Decimal,
}

/// Withdrawal plan input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwpInput {
    /// Starting corpus.
    pub initial_investment: Decimal,
    /// Fixed withdrawal per month.
    pub monthly_withdrawal: Decimal,
    /// Expected annual return in percent.
    pub annual_rate_percent: Decimal,
    /// Plan length in years.
    pub years: Decimal,
}

impl SwpInput {
    /// Builds an input from raw form fields.
    #[must_use]
    pub fn parse(
        initial_investment: &str,
        monthly_withdrawal: &str,
        annual_rate_percent: &str,
        years: &str,
    ) -> Self {
        Self {
            initial_investment: parse_field(initial_investment),
            monthly_withdrawal: parse_field(monthly_withdrawal),
            annual_rate_percent: parse_field(annual_rate_percent),
            years: parse_field(years),
        }
    }
}

/// Running totals at a sampled month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwpSample {
    /// Month number, starting at 1.
    pub month: u32,
    /// Balance after that month's withdrawal.
    pub balance: Decimal,
    /// Withdrawn so far.
    pub total_withdrawn: Decimal,
}

/// Withdrawal plan result. Amounts are whole currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwpResult {
    /// Balance left at the end, never negative.
    pub final_balance: Decimal,
    /// Sum of withdrawals actually made.
    pub total_withdrawn: Decimal,
    /// `final_balance + total_withdrawn - initial_investment`.
    pub total_returns: Decimal,
    /// Every sixth month plus the last month of the plan.
    pub samples: Vec<SwpSample>,
}
