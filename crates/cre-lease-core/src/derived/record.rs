//! The lease record shared by every calculator in the engine.
//!
//! A record carries the base terms keyed in on the lease form plus the
//! fields derived from them. Derived fields are outputs only: they are
//! overwritten on every call to [`derive`](super::calculator::derive) and are
//! never read back as inputs.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Area, Money, Percent};

/// One tenant's lease terms and the financial fields derived from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaseRecord {
    /// Stable identifier, unchanged across edits
    pub id: String,
    /// Tenant display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_name: Option<String>,

    // -- base terms -------------------------------------------------------
    /// Leased area in square feet
    pub leased_area: Area,
    /// Base rent per square foot per year
    pub rent_psf: Money,
    /// Landlord TI allowance per square foot
    #[serde(default)]
    pub ti_allowance_psf: Money,
    /// Cumulative TI allowance drawn to date
    #[serde(default)]
    pub ti_allowance_spent: Money,
    /// CAM fee per square foot per month
    #[serde(default)]
    pub monthly_cam_fee_psf: Money,
    pub lease_start_date: NaiveDate,
    pub lease_end_date: NaiveDate,
    /// TI cost financed by the landlord and repaid with rent
    #[serde(default)]
    pub ti_amortized_amount: Money,
    /// Annual interest on the financed TI, in percent (6 = 6%)
    #[serde(default)]
    pub ti_amortization_rate: Percent,
    /// Repayment term for the financed TI in months
    #[serde(default)]
    pub ti_amortization_term: u32,

    // -- derived ----------------------------------------------------------
    #[serde(default)]
    pub rent_annual: Money,
    #[serde(default)]
    pub rent_monthly: Money,
    #[serde(default)]
    pub ti_allowance_total: Money,
    /// Negative when the allowance is over-drawn
    #[serde(default)]
    pub ti_allowance_remaining: Money,
    #[serde(default)]
    pub annual_cam_charges: Money,
    /// Months left as of the derivation date, floored at zero
    #[serde(default)]
    pub remaining_term: u32,
    /// Contract length in calendar months
    #[serde(default)]
    pub total_term_months: i32,
}

impl LeaseRecord {
    /// A record with base terms only; every derived field starts at zero.
    pub fn new(
        id: impl Into<String>,
        leased_area: Area,
        rent_psf: Money,
        lease_start_date: NaiveDate,
        lease_end_date: NaiveDate,
    ) -> Self {
        LeaseRecord {
            id: id.into(),
            tenant_name: None,
            leased_area,
            rent_psf,
            ti_allowance_psf: Decimal::ZERO,
            ti_allowance_spent: Decimal::ZERO,
            monthly_cam_fee_psf: Decimal::ZERO,
            lease_start_date,
            lease_end_date,
            ti_amortized_amount: Decimal::ZERO,
            ti_amortization_rate: Decimal::ZERO,
            ti_amortization_term: 0,
            rent_annual: Decimal::ZERO,
            rent_monthly: Decimal::ZERO,
            ti_allowance_total: Decimal::ZERO,
            ti_allowance_remaining: Decimal::ZERO,
            annual_cam_charges: Decimal::ZERO,
            remaining_term: 0,
            total_term_months: 0,
        }
    }

    /// Leased area used for money and share calculations; negative areas
    /// count as empty space.
    pub fn effective_area(&self) -> Area {
        self.leased_area.max(Decimal::ZERO)
    }
}
