use chrono::NaiveDate;
use clap::Args;
use serde_json::Value;

use cre_lease_core::rent_roll::{self, RentRollInput};

use crate::input;

/// Arguments for the rent roll summary
#[derive(Args)]
pub struct RentRollArgs {
    /// Path to JSON input file: {"as_of", "records"} or an array of records
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_rent_roll(
    args: RentRollArgs,
    as_of: NaiveDate,
) -> Result<Value, Box<dyn std::error::Error>> {
    let data = input::load(args.input.as_deref(), "rent roll")?;
    let roll_input: RentRollInput = input::snapshot(data, as_of)?;
    let result = rent_roll::run_rent_roll(&roll_input)?;
    Ok(serde_json::to_value(result)?)
}
