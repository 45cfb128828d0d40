//! Future value of a systematic investment plan.

use fintrack_shared::types::money::round_to_unit;
use rust_decimal::{Decimal, MathematicalOps};

use super::types::{SipInput, SipResult, monthly_rate, total_months};

/// Computes the SIP future value, or `None` for inputs that invest nothing.
///
/// Contributions are made at the start of each month.
pub(crate) fn calculate(input: &SipInput) -> Option<SipResult> {
    let contribution = input.monthly_investment;
    if contribution <= Decimal::ZERO {
        return None;
    }
    let rate = monthly_rate(input.annual_rate_percent)?;
    let months = total_months(input.years)?;
    let n = Decimal::from(months);

    let invested = contribution.checked_mul(n)?;
    let future_value = if rate.is_zero() {
        invested
    } else {
        // P * ((1+r)^n - 1) / r * (1+r)
        let growth = (Decimal::ONE + rate).checked_powi(i64::from(months))?;
        contribution
            .checked_mul((growth - Decimal::ONE).checked_div(rate)?)?
            .checked_mul(Decimal::ONE + rate)?
    };

    let future_value = round_to_unit(future_value);
    let total_invested = round_to_unit(invested);

    Some(SipResult {
        future_value,
        total_invested,
        estimated_returns: future_value - total_invested,
    })
}
