pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Keys whose array values are printed as their own table or CSV block.
pub(crate) const LISTING_KEYS: [&str; 5] = ["allocations", "lines", "records", "rows", "expenses"];

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// The computed payload: the envelope's `result`, the allocation half of a
/// `--apply` run, or the value itself.
pub(crate) fn result_of(value: &Value) -> &Value {
    let value = value.get("allocation").unwrap_or(value);
    value.get("result").unwrap_or(value)
}

/// First listing array found in `map`, with its key.
pub(crate) fn listing(map: &serde_json::Map<String, Value>) -> Option<(&str, &[Value])> {
    LISTING_KEYS.iter().find_map(|key| match map.get(*key) {
        Some(Value::Array(items)) => Some((*key, items.as_slice())),
        _ => None,
    })
}
