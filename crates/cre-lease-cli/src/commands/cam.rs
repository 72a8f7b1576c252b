use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use serde_json::{json, Value};

use cre_lease_core::cam::allocation::{self, AllocationMethod, CamAllocationInput};
use cre_lease_core::cam::apply;

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MethodArg {
    ProRata,
    Fixed,
    Custom,
    None,
}

impl From<MethodArg> for AllocationMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::ProRata => AllocationMethod::ProRata,
            MethodArg::Fixed => AllocationMethod::Fixed,
            MethodArg::Custom => AllocationMethod::Custom,
            MethodArg::None => AllocationMethod::None,
        }
    }
}

/// Arguments for CAM expense allocation
#[derive(Args)]
pub struct CamArgs {
    /// Path to JSON input file: {"records", "expenses", "method", "custom_amounts"}
    #[arg(long)]
    pub input: Option<String>,

    /// Allocation policy (overrides the method in the input file)
    #[arg(long, value_enum)]
    pub method: Option<MethodArg>,

    /// Also return the records with CAM fees rewritten from the allocation
    #[arg(long)]
    pub apply: bool,
}

pub fn run_cam_allocation(
    args: CamArgs,
    as_of: NaiveDate,
) -> Result<Value, Box<dyn std::error::Error>> {
    let data = input::load(args.input.as_deref(), "CAM allocation")?;
    let mut cam_input: CamAllocationInput = serde_json::from_value(data)?;
    if let Some(method) = args.method {
        cam_input.method = method.into();
    }

    let result = allocation::run_cam_allocation(&cam_input)?;
    if !args.apply {
        return Ok(serde_json::to_value(result)?);
    }

    let records = apply::apply_allocation(&cam_input.records, &result.result, as_of);
    Ok(json!({
        "allocation": serde_json::to_value(&result)?,
        "records": serde_json::to_value(records)?,
    }))
}
