pub mod file;
pub mod stdin;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

/// Load the command's JSON input from `--input <file>` or piped stdin.
pub fn load(path: Option<&str>, what: &str) -> Result<Value, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        file::read_json_value(path)
    } else if let Some(data) = stdin::read_stdin()? {
        Ok(data)
    } else {
        Err(format!("--input <file.json> or stdin required for {what}").into())
    }
}

/// Deserialize a dated snapshot of lease records.
///
/// Accepts either `{"as_of": ..., "records": [...]}` or a bare array of
/// records; `as_of` falls back to the command-line date when absent.
pub fn snapshot<T: DeserializeOwned>(
    data: Value,
    as_of: NaiveDate,
) -> Result<T, Box<dyn std::error::Error>> {
    let mut data = match data {
        Value::Array(records) => json!({ "records": records }),
        other => other,
    };
    if let Value::Object(map) = &mut data {
        map.entry("as_of")
            .or_insert_with(|| Value::String(as_of.to_string()));
    }
    Ok(serde_json::from_value(data)?)
}
