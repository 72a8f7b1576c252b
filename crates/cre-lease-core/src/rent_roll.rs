//! Rent roll summary across a building's leases.
//!
//! Derives every record as of a date and rolls the results up into
//! building totals, area-weighted averages and a status per lease.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::derived::calculator::{derive_all, validate_records};
use crate::derived::record::LeaseRecord;
use crate::error::LeaseEngineError;
use crate::lease_term::{lease_status, LeaseStatus};
use crate::types::{checked_product, checked_total, with_metadata, Area, ComputationOutput, Money};
use crate::LeaseEngineResult;

// ---------------------------------------------------------------------------
// Input / Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentRollInput {
    pub as_of: NaiveDate,
    pub records: Vec<LeaseRecord>,
}

/// One lease on the rent roll.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentRollLine {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tenant_name: Option<String>,
    pub status: LeaseStatus,
    pub leased_area: Area,
    pub rent_annual: Money,
    pub annual_cam_charges: Money,
    pub remaining_term: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentRollSummary {
    pub as_of: NaiveDate,
    pub tenant_count: usize,
    pub active_count: usize,
    pub upcoming_count: usize,
    pub expired_count: usize,
    pub total_leased_area: Area,
    pub total_annual_rent: Money,
    pub total_monthly_rent: Money,
    pub total_annual_cam: Money,
    pub total_ti_allowance: Money,
    pub total_ti_remaining: Money,
    /// Total annual rent over total leased area
    pub weighted_avg_rent_psf: Money,
    /// Remaining term in months, weighted by leased area
    pub weighted_avg_remaining_term: Decimal,
    pub lines: Vec<RentRollLine>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Roll up `records` as of `as_of`. Area-weighted figures are zero when no
/// space is leased. Totals saturate at the decimal range; [`run_rent_roll`]
/// rejects rolls that would reach it.
pub fn summarize(records: &[LeaseRecord], as_of: NaiveDate) -> RentRollSummary {
    let derived = derive_all(records, as_of);

    let mut total_leased_area = Decimal::ZERO;
    let mut total_annual_rent = Decimal::ZERO;
    let mut total_monthly_rent = Decimal::ZERO;
    let mut total_annual_cam = Decimal::ZERO;
    let mut total_ti_allowance = Decimal::ZERO;
    let mut total_ti_remaining = Decimal::ZERO;
    let mut area_months = Decimal::ZERO;
    let (mut active_count, mut upcoming_count, mut expired_count) = (0, 0, 0);
    let mut lines = Vec::with_capacity(derived.len());

    for record in &derived {
        let area = record.effective_area();
        total_leased_area = total_leased_area.saturating_add(area);
        total_annual_rent = total_annual_rent.saturating_add(record.rent_annual);
        total_monthly_rent = total_monthly_rent.saturating_add(record.rent_monthly);
        total_annual_cam = total_annual_cam.saturating_add(record.annual_cam_charges);
        total_ti_allowance = total_ti_allowance.saturating_add(record.ti_allowance_total);
        total_ti_remaining = total_ti_remaining.saturating_add(record.ti_allowance_remaining);
        area_months =
            area_months.saturating_add(area.saturating_mul(Decimal::from(record.remaining_term)));

        let status = lease_status(record.lease_start_date, record.lease_end_date, as_of);
        match status {
            LeaseStatus::Active => active_count += 1,
            LeaseStatus::Upcoming => upcoming_count += 1,
            LeaseStatus::Expired => expired_count += 1,
        }

        lines.push(RentRollLine {
            id: record.id.clone(),
            tenant_name: record.tenant_name.clone(),
            status,
            leased_area: area,
            rent_annual: record.rent_annual,
            annual_cam_charges: record.annual_cam_charges,
            remaining_term: record.remaining_term,
        });
    }

    let (weighted_avg_rent_psf, weighted_avg_remaining_term) = if total_leased_area.is_zero() {
        (Decimal::ZERO, Decimal::ZERO)
    } else {
        (
            total_annual_rent / total_leased_area,
            area_months / total_leased_area,
        )
    };

    RentRollSummary {
        as_of,
        tenant_count: derived.len(),
        active_count,
        upcoming_count,
        expired_count,
        total_leased_area,
        total_annual_rent,
        total_monthly_rent,
        total_annual_cam,
        total_ti_allowance,
        total_ti_remaining,
        weighted_avg_rent_psf,
        weighted_avg_remaining_term,
        lines,
    }
}

pub fn run_rent_roll(input: &RentRollInput) -> LeaseEngineResult<ComputationOutput<RentRollSummary>> {
    let start = Instant::now();
    debug!(records = input.records.len(), as_of = %input.as_of, "summarising rent roll");

    if input.records.is_empty() {
        return Err(LeaseEngineError::InsufficientData(
            "Rent roll requires at least one lease".into(),
        ));
    }
    validate_records(&input.records)?;
    check_totals(&derive_all(&input.records, input.as_of))?;

    let summary = summarize(&input.records, input.as_of);

    let mut warnings: Vec<String> = Vec::new();
    if summary.expired_count > 0 {
        warnings.push(format!(
            "{} expired lease(s) included in totals",
            summary.expired_count
        ));
    }
    if summary.total_leased_area.is_zero() {
        warnings.push("Total leased area is zero; weighted averages reported as 0".into());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Rent roll summary (area-weighted)",
        &serde_json::json!({
            "as_of": input.as_of.to_string(),
            "records": input.records.len(),
        }),
        warnings,
        elapsed,
        summary,
    ))
}

/// Every building total must fit a decimal.
fn check_totals(derived: &[LeaseRecord]) -> LeaseEngineResult<()> {
    checked_total("records.leased_area", derived.iter().map(|r| r.effective_area()))?;
    checked_total("records.rent_psf", derived.iter().map(|r| r.rent_annual))?;
    checked_total(
        "records.monthly_cam_fee_psf",
        derived.iter().map(|r| r.annual_cam_charges),
    )?;
    checked_total(
        "records.ti_allowance_psf",
        derived.iter().map(|r| r.ti_allowance_total),
    )?;
    checked_total(
        "records.ti_allowance_spent",
        derived.iter().map(|r| r.ti_allowance_spent),
    )?;

    let area_months = derived
        .iter()
        .map(|r| {
            checked_product(
                "records.leased_area",
                &[r.effective_area(), Decimal::from(r.remaining_term)],
            )
        })
        .collect::<LeaseEngineResult<Vec<_>>>()?;
    checked_total("records.leased_area", area_months)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
