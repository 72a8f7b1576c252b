use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LeaseEngineError;
use crate::LeaseEngineResult;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.005 = 0.5% per month).
pub type Rate = Decimal;

/// Rates as entered on the lease form (6 = 6% per year).
pub type Percent = Decimal;

/// Floor area in square feet
pub type Area = Decimal;

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

/// Reject negative amounts coming in from the form layer.
pub(crate) fn ensure_non_negative(field: &str, value: Decimal) -> LeaseEngineResult<()> {
    if value < Decimal::ZERO {
        return Err(LeaseEngineError::InvalidInput {
            field: field.into(),
            reason: "Value must not be negative".into(),
        });
    }
    Ok(())
}

/// Product of `factors`, or `InvalidInput` on `field` when it leaves the
/// decimal range.
pub(crate) fn checked_product(field: &str, factors: &[Decimal]) -> LeaseEngineResult<Decimal> {
    factors
        .iter()
        .try_fold(Decimal::ONE, |acc, f| acc.checked_mul(*f))
        .ok_or_else(|| out_of_range(field))
}

/// Sum of `values`, or `InvalidInput` on `field` when it leaves the decimal
/// range.
pub(crate) fn checked_total(
    field: &str,
    values: impl IntoIterator<Item = Decimal>,
) -> LeaseEngineResult<Decimal> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v))
        .ok_or_else(|| out_of_range(field))
}

fn out_of_range(field: &str) -> LeaseEngineError {
    LeaseEngineError::InvalidInput {
        field: field.into(),
        reason: "Value too large for decimal arithmetic".into(),
    }
}
