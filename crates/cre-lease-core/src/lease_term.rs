//! Calendar month arithmetic for lease terms.
//!
//! Months are counted on the calendar grid only: day-of-month is ignored, so
//! a lease ending on the 1st and one ending on the 28th of the same month
//! report the same count. Derived values already stored by callers depend on
//! this convention.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Where a lease sits relative to an as-of date, at month granularity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LeaseStatus {
    /// Commencement month is after the as-of month
    Upcoming,
    /// The as-of month falls inside the lease, end month included
    Active,
    /// Expiration month is before the as-of month
    Expired,
}

/// Whole calendar months from `start` to `end`.
///
/// Negative when `end` falls in an earlier month than `start`; rejecting
/// out-of-order dates is the caller's job.
pub fn months_between(start: NaiveDate, end: NaiveDate) -> i32 {
    (end.year() - start.year()) * 12 + (end.month() as i32 - start.month() as i32)
}

/// Months left until `end` as of `as_of`, never negative.
pub fn remaining_months(end: NaiveDate, as_of: NaiveDate) -> u32 {
    months_between(as_of, end).max(0) as u32
}

/// Months since `start` as of `as_of`, zero before commencement.
pub fn elapsed_months(start: NaiveDate, as_of: NaiveDate) -> u32 {
    months_between(start, as_of).max(0) as u32
}

/// Classify a lease as upcoming, active or expired on `as_of`.
pub fn lease_status(start: NaiveDate, end: NaiveDate, as_of: NaiveDate) -> LeaseStatus {
    if months_between(as_of, start) > 0 {
        LeaseStatus::Upcoming
    } else if months_between(as_of, end) < 0 {
        LeaseStatus::Expired
    } else {
        LeaseStatus::Active
    }
}
