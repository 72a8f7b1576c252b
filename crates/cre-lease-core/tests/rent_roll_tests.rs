#![cfg(feature = "rent_roll")]

use cre_lease_core::lease_term::LeaseStatus;
use cre_lease_core::rent_roll::{self, RentRollInput};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

fn input() -> RentRollInput {
    serde_json::from_str(
        r#"{
            "as_of": "2026-10-16",
            "records": [
                {
                    "id": "suite-100",
                    "leased_area": "1000",
                    "rent_psf": "30",
                    "lease_start_date": "2025-01-01",
                    "lease_end_date": "2027-12-31"
                },
                {
                    "id": "suite-200",
                    "tenant_name": "Harbor Dental",
                    "leased_area": "3000",
                    "rent_psf": "20",
                    "monthly_cam_fee_psf": "1",
                    "lease_start_date": "2026-01-01",
                    "lease_end_date": "2029-06-30"
                }
            ]
        }"#,
    )
    .unwrap()
}

#[test]
fn test_rent_roll_from_form_json() {
    let output = rent_roll::run_rent_roll(&input()).unwrap();
    let summary = output.result;

    assert_eq!(summary.tenant_count, 2);
    assert_eq!(summary.active_count, 2);
    assert_eq!(summary.total_leased_area, dec!(4000));
    assert_eq!(summary.total_annual_rent, dec!(90000));
    assert_eq!(summary.total_monthly_rent, dec!(7500));
    assert_eq!(summary.total_annual_cam, dec!(36000));
    assert_eq!(summary.weighted_avg_rent_psf, dec!(22.5));
    assert!(output.warnings.is_empty());
}

#[test]
fn test_rent_roll_weighted_remaining_term() {
    // 14 months on 1000 sf, 32 months on 3000 sf
    let summary = rent_roll::summarize(&input().records, input().as_of);
    assert_eq!(summary.lines[0].remaining_term, 14);
    assert_eq!(summary.lines[1].remaining_term, 32);
    assert_eq!(summary.weighted_avg_remaining_term, dec!(27.5));
}

#[test]
fn test_rent_roll_statuses_follow_as_of() {
    let mut later = input();
    later.as_of = chrono::NaiveDate::from_ymd_opt(2028, 3, 1).unwrap();
    let output = rent_roll::run_rent_roll(&later).unwrap();

    assert_eq!(output.result.lines[0].status, LeaseStatus::Expired);
    assert_eq!(output.result.lines[1].status, LeaseStatus::Active);
    assert_eq!(output.result.expired_count, 1);
    assert_eq!(output.warnings.len(), 1);
}
