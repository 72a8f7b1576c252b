use serde_json::{Map, Value};
use std::io;

use super::{listing, result_of};

/// Write output as CSV to stdout.
///
/// Results carrying a listing (allocations, schedule lines, records) are
/// written one row per item; anything else as `field,value` pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    // cam-allocate --apply: the updated records are the useful sheet
    let value = match value.get("records") {
        Some(records @ Value::Array(_)) if value.get("allocation").is_some() => records,
        _ => value,
    };

    match value {
        Value::Array(arr) => write_array_csv(&mut wtr, arr),
        other => match result_of(other) {
            Value::Object(map) => match listing(map) {
                Some((_, items)) => write_array_csv(&mut wtr, items),
                None => write_pairs(&mut wtr, map),
            },
            scalar => {
                let _ = wtr.write_record([&format_csv_value(scalar)]);
            }
        },
    }

    let _ = wtr.flush();
}

fn write_pairs(wtr: &mut csv::Writer<io::StdoutLock<'_>>, map: &Map<String, Value>) {
    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in map {
        let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
    }
}

fn write_array_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, arr: &[Value]) {
    let mut headers: Vec<&str> = Vec::new();
    for item in arr {
        if let Value::Object(map) = item {
            for key in map.keys() {
                if !headers.contains(&key.as_str()) {
                    headers.push(key.as_str());
                }
            }
        }
    }

    if headers.is_empty() {
        for item in arr {
            let _ = wtr.write_record([&format_csv_value(item)]);
        }
        return;
    }

    let _ = wtr.write_record(&headers);
    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&row);
        }
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
