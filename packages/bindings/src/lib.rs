use chrono::NaiveDate;
use napi::Result as NapiResult;
use napi_derive::napi;
use serde::{Deserialize, Serialize};

use cre_lease_core::cam::allocation::CamAllocation;
use cre_lease_core::derived::record::LeaseRecord;
use cre_lease_core::lease_term::{self, LeaseStatus};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Derived fields
// ---------------------------------------------------------------------------

#[napi]
pub fn derive_leases(input_json: String) -> NapiResult<String> {
    let input: cre_lease_core::derived::calculator::DeriveInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        cre_lease_core::derived::calculator::run_derive(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// CAM
// ---------------------------------------------------------------------------

#[napi]
pub fn allocate_cam(input_json: String) -> NapiResult<String> {
    let input: cre_lease_core::cam::allocation::CamAllocationInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        cre_lease_core::cam::allocation::run_cam_allocation(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct ApplyCamInput {
    as_of: NaiveDate,
    records: Vec<LeaseRecord>,
    allocation: CamAllocation,
}

#[napi]
pub fn apply_cam_allocation(input_json: String) -> NapiResult<String> {
    let input: ApplyCamInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    cre_lease_core::derived::calculator::validate_records(&input.records)
        .map_err(to_napi_error)?;
    let records =
        cre_lease_core::cam::apply::apply_allocation(&input.records, &input.allocation, input.as_of);
    serde_json::to_string(&records).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// TI amortization
// ---------------------------------------------------------------------------

#[napi]
pub fn ti_schedule(input_json: String) -> NapiResult<String> {
    let input: cre_lease_core::ti_amortization::schedule::TiScheduleInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = cre_lease_core::ti_amortization::schedule::run_ti_schedule(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Rent roll and lease term
// ---------------------------------------------------------------------------

#[napi]
pub fn rent_roll(input_json: String) -> NapiResult<String> {
    let input: cre_lease_core::rent_roll::RentRollInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = cre_lease_core::rent_roll::run_rent_roll(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct LeaseTermInput {
    as_of: NaiveDate,
    lease_start_date: NaiveDate,
    lease_end_date: NaiveDate,
}

#[derive(Serialize)]
struct LeaseTermOutput {
    remaining_months: u32,
    elapsed_months: u32,
    total_term_months: i32,
    status: LeaseStatus,
}

#[napi]
pub fn lease_term_summary(input_json: String) -> NapiResult<String> {
    let input: LeaseTermInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = LeaseTermOutput {
        remaining_months: lease_term::remaining_months(input.lease_end_date, input.as_of),
        elapsed_months: lease_term::elapsed_months(input.lease_start_date, input.as_of),
        total_term_months: lease_term::months_between(input.lease_start_date, input.lease_end_date),
        status: lease_term::lease_status(input.lease_start_date, input.lease_end_date, input.as_of),
    };
    serde_json::to_string(&output).map_err(to_napi_error)
}
