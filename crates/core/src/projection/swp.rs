//! Systematic withdrawal plan simulation.

use fintrack_shared::types::money::round_to_unit;
use rust_decimal::Decimal;

use super::types::{SwpInput, SwpResult, SwpSample, monthly_rate, total_months};

/// Months between chart samples.
const SAMPLE_INTERVAL: u32 = 6;

/// Simulates the plan month by month, or returns `None` for inputs with
/// nothing to withdraw.
///
/// Each month the balance grows first, then the withdrawal is taken, capped
/// at the balance. The plan stops early once the corpus is exhausted.
pub(crate) fn calculate(input: &SwpInput) -> Option<SwpResult> {
    let corpus = input.initial_investment;
    let withdrawal = input.monthly_withdrawal;
    if corpus <= Decimal::ZERO || withdrawal <= Decimal::ZERO {
        return None;
    }
    let rate = monthly_rate(input.annual_rate_percent)?;
    let months = total_months(input.years)?;

    let mut balance = corpus;
    let mut withdrawn = Decimal::ZERO;
    let mut samples = Vec::new();

    for month in 1..=months {
        if balance <= Decimal::ZERO {
            break;
        }

        balance = balance.checked_add(balance.checked_mul(rate)?)?;
        let taken = withdrawal.min(balance);
        balance -= taken;
        withdrawn = withdrawn.checked_add(taken)?;

        if month % SAMPLE_INTERVAL == 0 || month == months {
            samples.push(SwpSample {
                month,
                balance: round_to_unit(balance),
                total_withdrawn: round_to_unit(withdrawn),
            });
        }
    }

    let final_balance = round_to_unit(balance).max(Decimal::ZERO);
    let returns = final_balance.checked_add(withdrawn)?.checked_sub(corpus)?;

    Some(SwpResult {
        final_balance,
        total_withdrawn: round_to_unit(withdrawn),
        total_returns: round_to_unit(returns),
        samples,
    })
}
