//! Loan amortization.

use fintrack_shared::types::money::round_to_unit;
use rust_decimal::{Decimal, MathematicalOps};

use super::types::{EmiInput, EmiResult, EmiYear, monthly_rate, total_months};

/// Years shown in the amortization breakdown.
const BREAKDOWN_YEARS: u32 = 10;

/// Computes the EMI schedule, or `None` for inputs that yield no loan.
pub(crate) fn calculate(input: &EmiInput) -> Option<EmiResult> {
    let principal = input.principal;
    if principal <= Decimal::ZERO {
        return None;
    }
    let rate = monthly_rate(input.annual_rate_percent)?;
    let months = total_months(input.years)?;
    let n = Decimal::from(months);

    let installment = if rate.is_zero() {
        principal / n
    } else {
        // P * r * (1+r)^n / ((1+r)^n - 1)
        let growth = (Decimal::ONE + rate).checked_powi(i64::from(months))?;
        principal
            .checked_mul(rate)?
            .checked_mul(growth)?
            .checked_div(growth - Decimal::ONE)?
    };

    let total_payment = installment.checked_mul(n)?;
    let monthly_payment = round_to_unit(installment);
    let years = (months / 12).min(BREAKDOWN_YEARS);

    Some(EmiResult {
        monthly_payment,
        total_payment: round_to_unit(total_payment),
        total_interest: round_to_unit(total_payment.checked_sub(principal)?),
        principal: round_to_unit(principal),
        yearly_breakdown: breakdown(principal, rate, monthly_payment, years)?,
    })
}

/// Simulates amortization with the rounded installment, one entry per year
/// until `years` or payoff. `None` if a running total overflows.
fn breakdown(
    principal: Decimal,
    rate: Decimal,
    installment: Decimal,
    years: u32,
) -> Option<Vec<EmiYear>> {
    let mut balance = principal;
    let mut schedule = Vec::with_capacity(years as usize);

    for year in 1..=years {
        let mut year_principal = Decimal::ZERO;
        let mut year_interest = Decimal::ZERO;

        for _ in 0..12 {
            if balance <= Decimal::ZERO {
                break;
            }
            let interest = balance.checked_mul(rate)?;
            let repaid = installment.checked_sub(interest)?;
            year_principal = year_principal.checked_add(repaid)?;
            year_interest = year_interest.checked_add(interest)?;
            balance = balance.checked_sub(repaid)?;
        }

        schedule.push(EmiYear {
            year,
            principal: round_to_unit(year_principal),
            interest: round_to_unit(year_interest),
        });

        if balance <= Decimal::ZERO {
            break;
        }
    }

    Some(schedule)
}
