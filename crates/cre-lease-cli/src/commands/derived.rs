use chrono::NaiveDate;
use clap::Args;
use serde_json::Value;

use cre_lease_core::derived::calculator::{self, DeriveInput};

use crate::input;

/// Arguments for recomputing derived lease fields
#[derive(Args)]
pub struct DeriveArgs {
    /// Path to JSON input file: {"as_of", "records"} or an array of records
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_derive(args: DeriveArgs, as_of: NaiveDate) -> Result<Value, Box<dyn std::error::Error>> {
    let data = input::load(args.input.as_deref(), "lease derivation")?;
    let derive_input: DeriveInput = input::snapshot(data, as_of)?;
    let result = calculator::run_derive(&derive_input)?;
    Ok(serde_json::to_value(result)?)
}
