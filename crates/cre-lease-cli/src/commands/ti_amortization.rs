use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use cre_lease_core::ti_amortization::iter::AmortizationIter;
use cre_lease_core::ti_amortization::schedule::{self, TiScheduleInput};

use crate::input;

/// Arguments for a TI amortization schedule
#[derive(Args)]
pub struct TiScheduleArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Financed TI amount
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 6 for 6%)
    #[arg(long, default_value = "0")]
    pub rate: Decimal,

    /// Repayment term in months
    #[arg(long)]
    pub term: Option<u32>,

    /// List every period instead of the bounded schedule
    #[arg(long)]
    pub full: bool,
}

pub fn run_ti_schedule(args: TiScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let ti_input: TiScheduleInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let principal = args
            .principal
            .ok_or("--principal is required (or provide --input)")?;
        let term = args.term.ok_or("--term is required (or provide --input)")?;
        TiScheduleInput {
            principal,
            annual_rate_percent: args.rate,
            term_months: term,
        }
    };

    build_schedule(&ti_input, args.full)
}

/// Bounded schedule envelope, or every period when `full` is set. Both
/// paths reject the same inputs.
fn build_schedule(
    ti_input: &TiScheduleInput,
    full: bool,
) -> Result<Value, Box<dyn std::error::Error>> {
    if full {
        schedule::validate_terms(ti_input)?;
        let rows: Vec<_> = AmortizationIter::new(
            ti_input.principal,
            ti_input.annual_rate_percent,
            ti_input.term_months,
        )
        .collect();
        return Ok(json!({ "rows": rows }));
    }

    let result = schedule::run_ti_schedule(ti_input)?;
    Ok(serde_json::to_value(result)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn terms(principal: Decimal, rate: Decimal) -> TiScheduleInput {
        TiScheduleInput {
            principal,
            annual_rate_percent: rate,
            term_months: 36,
        }
    }

    #[test]
    fn test_full_listing_rejects_negative_principal() {
        let err = build_schedule(&terms(dec!(-5000), dec!(6)), true).unwrap_err();
        assert!(err.to_string().contains("principal"), "got {}", err);
    }

    #[test]
    fn test_full_listing_rejects_negative_rate() {
        let err = build_schedule(&terms(dec!(50000), dec!(-1)), true).unwrap_err();
        assert!(err.to_string().contains("annual_rate_percent"), "got {}", err);
    }

    #[test]
    fn test_full_listing_lists_every_period() {
        let value = build_schedule(&terms(dec!(50000), dec!(6)), true).unwrap();
        assert_eq!(value["rows"].as_array().map(Vec::len), Some(36));
    }
}
