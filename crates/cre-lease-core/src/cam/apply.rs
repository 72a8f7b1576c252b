//! Write a CAM allocation back into the lease records.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::HashMap;

use crate::derived::calculator::{derive, MONTHS_PER_YEAR};
use crate::derived::record::LeaseRecord;

use super::allocation::{AllocationRecord, CamAllocation};

/// Return `records` with each allocated tenant's monthly CAM fee set so that
/// its annual CAM charges equal its allocation, re-derived as of `as_of`.
///
/// Tenants missing from the allocation keep their fee. A tenant with no
/// leased area, or too little for the fee to fit a decimal, gets a zero fee
/// since a per-square-foot rate cannot carry its allocation.
pub fn apply_allocation(
    records: &[LeaseRecord],
    allocation: &CamAllocation,
    as_of: NaiveDate,
) -> Vec<LeaseRecord> {
    let by_tenant: HashMap<&str, &AllocationRecord> = allocation
        .allocations
        .iter()
        .map(|a| (a.tenant_id.as_str(), a))
        .collect();

    records
        .iter()
        .map(|record| match by_tenant.get(record.id.as_str()) {
            Some(alloc) => {
                let area = record.effective_area();
                let fee = (alloc.allocation_amount / MONTHS_PER_YEAR)
                    .checked_div(area)
                    .unwrap_or(Decimal::ZERO);
                let updated = LeaseRecord {
                    monthly_cam_fee_psf: fee,
                    ..record.clone()
                };
                derive(&updated, as_of)
            }
            None => derive(record, as_of),
        })
        .collect()
}
