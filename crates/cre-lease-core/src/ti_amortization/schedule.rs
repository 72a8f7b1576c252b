//! Bounded TI amortization schedules.
//!
//! Wraps [`AmortizationIter`] into a size-bounded result: terms up to 24
//! months are listed in full, longer terms list the first 12 periods and a
//! single line counting the periods left out. Totals always cover the whole
//! term.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::derived::record::LeaseRecord;
use crate::error::LeaseEngineError;
use crate::types::{
    checked_product, ensure_non_negative, with_metadata, ComputationOutput, Money, Percent,
};
use crate::LeaseEngineResult;

use super::iter::{
    compound_factor, level_payment, monthly_rate, AmortizationIter, AmortizationPaymentRow,
    MAX_COMPOUND_FACTOR,
};

/// Longest term listed period by period.
pub const FULL_LISTING_MAX_MONTHS: u32 = 24;
/// Periods listed before the summary line on longer terms.
pub const TRUNCATED_DETAIL_ROWS: u32 = 12;

// ---------------------------------------------------------------------------
// Input / Output
// ---------------------------------------------------------------------------

/// Financed TI terms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TiScheduleInput {
    pub principal: Money,
    /// Annual interest in percent (6 = 6%)
    pub annual_rate_percent: Percent,
    pub term_months: u32,
}

/// One line of a bounded schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScheduleLine {
    Payment(AmortizationPaymentRow),
    /// Stands in for the periods not listed
    RemainingPayments { remaining_periods: u32 },
}

/// A non-empty schedule with whole-term totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizingSchedule {
    pub principal: Money,
    pub annual_rate_percent: Percent,
    pub term_months: u32,
    pub monthly_payment: Money,
    pub total_payments: Money,
    pub total_interest: Money,
    /// Balance after the last period
    pub final_balance: Money,
    pub lines: Vec<ScheduleLine>,
}

impl AmortizingSchedule {
    /// Listed payment rows, without the summary line.
    pub fn payment_rows(&self) -> impl Iterator<Item = &AmortizationPaymentRow> {
        self.lines.iter().filter_map(|line| match line {
            ScheduleLine::Payment(row) => Some(row),
            ScheduleLine::RemainingPayments { .. } => None,
        })
    }

    /// Periods not listed in `lines`.
    pub fn remaining_periods(&self) -> u32 {
        self.lines
            .iter()
            .find_map(|line| match line {
                ScheduleLine::RemainingPayments { remaining_periods } => Some(*remaining_periods),
                ScheduleLine::Payment(_) => None,
            })
            .unwrap_or(0)
    }

    /// Every period of the term, restarted from period one.
    pub fn full_schedule(&self) -> AmortizationIter {
        AmortizationIter::new(self.principal, self.annual_rate_percent, self.term_months)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TiSchedule {
    /// No financed amount or no term
    Empty,
    Amortizing(AmortizingSchedule),
}

impl TiSchedule {
    pub fn is_empty(&self) -> bool {
        matches!(self, TiSchedule::Empty)
    }

    pub fn as_amortizing(&self) -> Option<&AmortizingSchedule> {
        match self {
            TiSchedule::Empty => None,
            TiSchedule::Amortizing(s) => Some(s),
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Amortize `principal` at `annual_rate_percent` over `term_months`.
///
/// Empty when there is nothing financed or no term. A zero rate gives an
/// interest-free straight-line schedule.
pub fn schedule(principal: Money, annual_rate_percent: Percent, term_months: u32) -> TiSchedule {
    if principal <= Decimal::ZERO || term_months == 0 {
        return TiSchedule::Empty;
    }

    let iter = AmortizationIter::new(principal, annual_rate_percent, term_months);
    let monthly_payment = iter.monthly_payment();
    let truncate = term_months > FULL_LISTING_MAX_MONTHS;

    let mut lines = Vec::with_capacity(if truncate {
        TRUNCATED_DETAIL_ROWS as usize + 1
    } else {
        term_months as usize
    });
    let mut total_interest = Decimal::ZERO;
    let mut final_balance = principal;

    for row in iter {
        total_interest = total_interest.saturating_add(row.interest);
        final_balance = row.balance;
        if !truncate || row.payment_number <= TRUNCATED_DETAIL_ROWS {
            lines.push(ScheduleLine::Payment(row));
        }
    }
    if truncate {
        lines.push(ScheduleLine::RemainingPayments {
            remaining_periods: term_months - TRUNCATED_DETAIL_ROWS,
        });
    }

    TiSchedule::Amortizing(AmortizingSchedule {
        principal,
        annual_rate_percent,
        term_months,
        monthly_payment,
        total_payments: monthly_payment.saturating_mul(Decimal::from(term_months)),
        total_interest,
        final_balance,
        lines,
    })
}

/// Schedule for the TI financing recorded on a lease.
pub fn schedule_for_record(record: &LeaseRecord) -> TiSchedule {
    schedule(
        record.ti_amortized_amount,
        record.ti_amortization_rate,
        record.ti_amortization_term,
    )
}

/// Validate the financing terms and build the bounded schedule.
pub fn run_ti_schedule(input: &TiScheduleInput) -> LeaseEngineResult<ComputationOutput<TiSchedule>> {
    let start = Instant::now();
    debug!(
        principal = %input.principal,
        rate = %input.annual_rate_percent,
        term = input.term_months,
        "building TI amortization schedule"
    );

    validate_terms(input)?;

    let result = schedule(input.principal, input.annual_rate_percent, input.term_months);

    let mut warnings: Vec<String> = Vec::new();
    match &result {
        TiSchedule::Empty => {
            warnings.push("No financed TI amount or term; schedule is empty".into());
        }
        TiSchedule::Amortizing(s) => {
            if input.annual_rate_percent.is_zero() {
                warnings.push("Zero interest rate; principal repaid straight-line".into());
            }
            if s.remaining_periods() > 0 {
                warnings.push(format!(
                    "Showing first {} of {} payments",
                    TRUNCATED_DETAIL_ROWS, input.term_months
                ));
            }
        }
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "TI amortization (level payment, monthly compounding)",
        &serde_json::json!({
            "principal": input.principal.to_string(),
            "annual_rate_percent": input.annual_rate_percent.to_string(),
            "term_months": input.term_months,
            "full_listing_max_months": FULL_LISTING_MAX_MONTHS,
        }),
        warnings,
        elapsed,
        result,
    ))
}

/// Reject financing terms that cannot amortize within decimal precision:
/// negative amounts, payments or totals beyond the decimal range, and
/// rate/term pairs whose compounding passes [`MAX_COMPOUND_FACTOR`].
pub fn validate_terms(input: &TiScheduleInput) -> LeaseEngineResult<()> {
    ensure_non_negative("principal", input.principal)?;
    ensure_non_negative("annual_rate_percent", input.annual_rate_percent)?;
    if input.principal.is_zero() || input.term_months == 0 {
        return Ok(());
    }

    let rate = monthly_rate(input.annual_rate_percent);
    checked_product("principal", &[input.principal, rate])?;
    if !rate.is_zero() {
        match compound_factor(rate, input.term_months) {
            Some(factor) if factor <= MAX_COMPOUND_FACTOR => {}
            _ => {
                return Err(LeaseEngineError::InvalidInput {
                    field: "term_months".into(),
                    reason: format!(
                        "{}% over {} months compounds past {}; the balance would never amortize",
                        input.annual_rate_percent, input.term_months, MAX_COMPOUND_FACTOR
                    ),
                });
            }
        }
    }

    let payment = level_payment(input.principal, rate, input.term_months);
    checked_product("principal", &[payment, Decimal::from(input.term_months)])?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
