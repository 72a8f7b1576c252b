use chrono::NaiveDate;
use clap::Args;
use serde_json::{json, Value};

use cre_lease_core::lease_term;

/// Arguments for lease term arithmetic
#[derive(Args)]
pub struct LeaseTermArgs {
    /// Lease expiration date (YYYY-MM-DD)
    #[arg(long)]
    pub end: NaiveDate,

    /// Lease commencement date (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<NaiveDate>,
}

pub fn run_lease_term(
    args: LeaseTermArgs,
    as_of: NaiveDate,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut result = json!({
        "as_of": as_of,
        "end": args.end,
        "remaining_months": lease_term::remaining_months(args.end, as_of),
    });

    if let (Some(start), Value::Object(map)) = (args.start, &mut result) {
        map.insert("start".into(), json!(start));
        map.insert(
            "total_term_months".into(),
            json!(lease_term::months_between(start, args.end)),
        );
        map.insert(
            "elapsed_months".into(),
            json!(lease_term::elapsed_months(start, as_of)),
        );
        map.insert(
            "status".into(),
            json!(lease_term::lease_status(start, args.end, as_of)),
        );
    }

    Ok(result)
}
