//! Equated monthly installment arithmetic.
//!
//! Money paths use `rust_decimal` throughout - no floats.

use rust_decimal::Decimal;
use serde::Serialize;

/// Errors for EMI calculation inputs.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmiError {
    #[error("principal must be positive")]
    NonPositivePrincipal,
    #[error("annual rate cannot be negative")]
    NegativeRate,
    #[error("tenure must be at least one month")]
    ZeroTenure,
    #[error("amount out of range")]
    Overflow,
}

/// Result of an EMI calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmiQuote {
    /// Fixed monthly installment, rounded to 2 decimal places.
    pub monthly_installment: Decimal,
    /// Installment times tenure.
    pub total_payable: Decimal,
    /// Total payable minus principal.
    pub total_interest: Decimal,
}

/// Compute the fixed-rate amortized installment.
///
/// Standard formula `E = P * r * (1+r)^n / ((1+r)^n - 1)` with
/// `r = annual_rate_percent / 1200`. A zero rate degenerates to straight
/// division of the principal over the tenure.
///
/// # Errors
///
/// Returns [`EmiError`] for non-positive principal, negative rate, zero
/// tenure, or arithmetic overflow.
pub fn quote(
    principal: Decimal,
    annual_rate_percent: Decimal,
    tenure_months: u32,
) -> Result<EmiQuote, EmiError> {
    if principal <= Decimal::ZERO {
        return Err(EmiError::NonPositivePrincipal);
    }
    if annual_rate_percent < Decimal::ZERO {
        return Err(EmiError::NegativeRate);
    }
    if tenure_months == 0 {
        return Err(EmiError::ZeroTenure);
    }

    let months = Decimal::from(tenure_months);

    let installment = if annual_rate_percent.is_zero() {
        principal
            .checked_div(months)
            .ok_or(EmiError::Overflow)?
            .round_dp(2)
    } else {
        let monthly_rate = annual_rate_percent
            .checked_div(Decimal::from(1200))
            .ok_or(EmiError::Overflow)?;

        // (1 + r)^n by repeated multiplication; tenure is bounded by u32
        // and practically by loan terms, so this stays cheap and exact
        // within Decimal precision.
        let base = Decimal::ONE + monthly_rate;
        let mut factor = Decimal::ONE;
        for _ in 0..tenure_months {
            factor = factor.checked_mul(base).ok_or(EmiError::Overflow)?;
        }

        let numerator = principal
            .checked_mul(monthly_rate)
            .and_then(|v| v.checked_mul(factor))
            .ok_or(EmiError::Overflow)?;
        let denominator = factor - Decimal::ONE;
        numerator
            .checked_div(denominator)
            .ok_or(EmiError::Overflow)?
            .round_dp(2)
    };

    let total_payable = installment
        .checked_mul(months)
        .ok_or(EmiError::Overflow)?
        .round_dp(2);

    Ok(EmiQuote {
        monthly_installment: installment,
        total_payable,
        total_interest: (total_payable - principal).round_dp(2),
    })
}
