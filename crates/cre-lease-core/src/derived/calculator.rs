//! Derived lease fields.
//!
//! Recomputes rent, TI allowance, CAM charges and term figures from a
//! record's base terms:
//! - `rent_annual = rent_psf * leased_area`, `rent_monthly = rent_annual / 12`
//! - `ti_allowance_total = ti_allowance_psf * leased_area`
//! - `ti_allowance_remaining = ti_allowance_total - ti_allowance_spent`
//! - `annual_cam_charges = monthly_cam_fee_psf * 12 * leased_area`
//! - `remaining_term` = calendar months from the as-of date to expiration
//!
//! Derivation only reads base terms, so it is safe to run on every edit.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::lease_term::{months_between, remaining_months};
use crate::types::{checked_product, ensure_non_negative, with_metadata, ComputationOutput};
use crate::LeaseEngineResult;

use super::record::LeaseRecord;

pub(crate) const MONTHS_PER_YEAR: Decimal = dec!(12);

// ---------------------------------------------------------------------------
// Input / Output
// ---------------------------------------------------------------------------

/// A snapshot of lease records to derive as of a given date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeriveInput {
    /// Date the remaining term is measured from
    pub as_of: NaiveDate,
    pub records: Vec<LeaseRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeriveOutput {
    /// Records in input order with every derived field refreshed
    pub records: Vec<LeaseRecord>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Refresh every derived field of `record` as of `as_of`.
///
/// Total for any decimal inputs. A zero or negative area yields zero rent,
/// allowance and CAM figures. Products beyond the decimal range saturate;
/// [`run_derive`] rejects such records instead.
pub fn derive(record: &LeaseRecord, as_of: NaiveDate) -> LeaseRecord {
    let area = record.effective_area();
    let rent_annual = record.rent_psf.saturating_mul(area);
    let ti_allowance_total = record.ti_allowance_psf.saturating_mul(area);

    LeaseRecord {
        rent_annual,
        rent_monthly: rent_annual / MONTHS_PER_YEAR,
        ti_allowance_total,
        ti_allowance_remaining: ti_allowance_total.saturating_sub(record.ti_allowance_spent),
        annual_cam_charges: record
            .monthly_cam_fee_psf
            .saturating_mul(MONTHS_PER_YEAR)
            .saturating_mul(area),
        remaining_term: remaining_months(record.lease_end_date, as_of),
        total_term_months: months_between(record.lease_start_date, record.lease_end_date),
        ..record.clone()
    }
}

/// Derive a snapshot of records, keeping their order.
pub fn derive_all(records: &[LeaseRecord], as_of: NaiveDate) -> Vec<LeaseRecord> {
    records.iter().map(|r| derive(r, as_of)).collect()
}

/// Validate and derive a snapshot, reporting suspicious records as warnings.
pub fn run_derive(input: &DeriveInput) -> LeaseEngineResult<ComputationOutput<DeriveOutput>> {
    let start = Instant::now();
    debug!(records = input.records.len(), as_of = %input.as_of, "deriving lease fields");

    validate_records(&input.records)?;

    let records = derive_all(&input.records, input.as_of);
    let warnings = collect_warnings(&records);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Lease derived fields (rent, TI allowance, CAM, remaining term)",
        &serde_json::json!({
            "as_of": input.as_of.to_string(),
            "records": input.records.len(),
            "month_counting": "calendar months, day of month ignored",
        }),
        warnings,
        elapsed,
        DeriveOutput { records },
    ))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Reject negative money and rates, and terms whose derived figures do not
/// fit a decimal.
pub fn validate_records(records: &[LeaseRecord]) -> LeaseEngineResult<()> {
    for (i, record) in records.iter().enumerate() {
        validate_record(i, record)?;
    }
    Ok(())
}

fn validate_record(index: usize, record: &LeaseRecord) -> LeaseEngineResult<()> {
    let fields = [
        ("rent_psf", record.rent_psf),
        ("ti_allowance_psf", record.ti_allowance_psf),
        ("ti_allowance_spent", record.ti_allowance_spent),
        ("monthly_cam_fee_psf", record.monthly_cam_fee_psf),
        ("ti_amortized_amount", record.ti_amortized_amount),
        ("ti_amortization_rate", record.ti_amortization_rate),
    ];
    for (name, value) in fields {
        ensure_non_negative(&format!("records[{index}].{name}"), value)?;
    }

    let area = record.effective_area();
    checked_product(
        &format!("records[{index}].rent_psf"),
        &[record.rent_psf, area],
    )?;
    checked_product(
        &format!("records[{index}].ti_allowance_psf"),
        &[record.ti_allowance_psf, area],
    )?;
    checked_product(
        &format!("records[{index}].monthly_cam_fee_psf"),
        &[record.monthly_cam_fee_psf, MONTHS_PER_YEAR, area],
    )?;
    Ok(())
}

fn collect_warnings(records: &[LeaseRecord]) -> Vec<String> {
    let mut warnings = Vec::new();
    for record in records {
        if record.leased_area <= Decimal::ZERO {
            warnings.push(format!(
                "Lease {}: leased area is {}; rent, TI and CAM figures derived as zero",
                record.id, record.leased_area
            ));
        }
        if record.total_term_months < 0 {
            warnings.push(format!(
                "Lease {}: end date {} precedes start date {}",
                record.id, record.lease_end_date, record.lease_start_date
            ));
        }
        if record.ti_allowance_remaining < Decimal::ZERO {
            warnings.push(format!(
                "Lease {}: TI allowance over-drawn by {}",
                record.id, -record.ti_allowance_remaining
            ));
        }
    }
    warnings
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
