//! Loan and investment calculators.
//!
//! All calculations run on `Decimal`. Inputs that cannot produce a meaningful
//! result (non-positive amounts, negative rates, tenures under one month)
//! yield `None` instead of an error.

mod emi;
mod sip;
mod swp;
pub mod types;


pub use types::{
    EmiInput, EmiResult, EmiYear, MAX_TENURE_YEARS, SipInput, SipResult, SwpInput, SwpResult,
    SwpSample,
};

/// Entry point for the EMI, SIP, and SWP calculators.
pub struct FinancialProjector;

impl FinancialProjector {
    /// Monthly installment and amortization breakdown for a loan.
    #[must_use]
    pub fn emi(input: &EmiInput) -> Option<EmiResult> {
        emi::calculate(input)
    }

    /// Future value of fixed monthly contributions.
    #[must_use]
    pub fn sip(input: &SipInput) -> Option<SipResult> {
        sip::calculate(input)
    }

    /// Balance and withdrawals over a fixed monthly withdrawal plan.
    #[must_use]
    pub fn swp(input: &SwpInput) -> Option<SwpResult> {
        swp::calculate(input)
    }
}
