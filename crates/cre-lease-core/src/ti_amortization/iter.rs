//! Level-payment amortization of financed tenant improvements.
//!
//! The full schedule is produced lazily, one period at a time, so callers
//! choose how much of it to materialise. The iterator is `Clone`: cloning a
//! fresh iterator restarts the schedule from period one.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::iter::FusedIterator;

use crate::types::{Money, Percent, Rate};

/// A single period of the amortization schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmortizationPaymentRow {
    /// Period number (1-indexed)
    pub payment_number: u32,
    /// Level payment for the period
    pub payment: Money,
    /// Part of the payment that reduces the balance
    pub principal: Money,
    /// Part of the payment that is interest on the opening balance
    pub interest: Money,
    /// Balance after the payment, never below zero
    pub balance: Money,
}

/// Lazy, finite amortization schedule.
#[derive(Debug, Clone)]
pub struct AmortizationIter {
    payment: Money,
    monthly_rate: Rate,
    term_months: u32,
    period: u32,
    balance: Money,
}

impl AmortizationIter {
    /// Schedule for `principal` at `annual_rate_percent` (6 = 6% a year)
    /// over `term_months` monthly payments.
    ///
    /// Negative principal and rates are treated as zero. A zero term yields
    /// an empty schedule.
    pub fn new(principal: Money, annual_rate_percent: Percent, term_months: u32) -> Self {
        let principal = principal.max(Decimal::ZERO);
        let monthly_rate = monthly_rate(annual_rate_percent.max(Decimal::ZERO));
        AmortizationIter {
            payment: level_payment(principal, monthly_rate, term_months),
            monthly_rate,
            term_months,
            period: 0,
            balance: principal,
        }
    }

    pub fn monthly_payment(&self) -> Money {
        self.payment
    }

    pub fn monthly_rate(&self) -> Rate {
        self.monthly_rate
    }

    pub fn term_months(&self) -> u32 {
        self.term_months
    }
}

impl Iterator for AmortizationIter {
    type Item = AmortizationPaymentRow;

    fn next(&mut self) -> Option<Self::Item> {
        if self.period >= self.term_months {
            return None;
        }
        self.period += 1;

        let interest = self.balance.saturating_mul(self.monthly_rate);
        let principal = self.payment.saturating_sub(interest);
        // Rounding on the last period can leave the balance a hair below zero
        self.balance = self.balance.saturating_sub(principal).max(Decimal::ZERO);

        Some(AmortizationPaymentRow {
            payment_number: self.period,
            payment: self.payment,
            principal,
            interest,
            balance: self.balance,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.term_months - self.period) as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for AmortizationIter {}

impl FusedIterator for AmortizationIter {}

// ---------------------------------------------------------------------------
// Math helpers
// ---------------------------------------------------------------------------

/// Monthly rate from an annual percentage: pct / 100 / 12.
pub fn monthly_rate(annual_rate_percent: Percent) -> Rate {
    annual_rate_percent / dec!(100) / dec!(12)
}

/// Largest (1 + r)^n that still amortizes to a zero balance. Past it the
/// principal part of early payments falls below decimal precision.
pub const MAX_COMPOUND_FACTOR: Decimal = dec!(1000000000000);

/// (1 + r)^n by iterative multiplication, `None` once it leaves the decimal
/// range.
pub fn compound_factor(monthly_rate: Rate, term_months: u32) -> Option<Decimal> {
    let one_plus_r = Decimal::ONE.checked_add(monthly_rate)?;
    (0..term_months).try_fold(Decimal::ONE, |acc, _| acc.checked_mul(one_plus_r))
}

/// Level payment r * P / (1 - (1 + r)^-n).
///
/// A zero rate repays straight-line: P / n with no interest.
///
/// Only meaningful while (1 + r)^n stays within [`MAX_COMPOUND_FACTOR`].
/// Beyond the decimal range the payment degrades to pure interest (P * r)
/// and the balance never pays down; `run_ti_schedule` rejects such terms.
/// Results beyond the decimal range saturate.
pub fn level_payment(principal: Money, monthly_rate: Rate, term_months: u32) -> Money {
    if term_months == 0 {
        return Decimal::ZERO;
    }
    if monthly_rate.is_zero() {
        return principal / Decimal::from(term_months);
    }

    let interest_only = principal.saturating_mul(monthly_rate);
    match compound_factor(monthly_rate, term_months) {
        Some(compound) => {
            let annuity = Decimal::ONE - Decimal::ONE / compound;
            // A rate too small to register rounds back to straight-line
            if annuity.is_zero() {
                return principal / Decimal::from(term_months);
            }
            interest_only.checked_div(annuity).unwrap_or(Decimal::MAX)
        }
        None => interest_only,
    }
}
