use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::LISTING_KEYS;

/// Format output as tables: scalar fields first, then one table per listing.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let (Some(allocation), Some(Value::Array(records))) =
                (map.get("allocation"), map.get("records"))
            {
                // cam-allocate --apply
                print_table(allocation);
                println!("\nUpdated records:");
                print_array_table(records);
            } else if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_object(map);
            }
        }
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", value),
    }
}

fn print_result_table(result: &Value, envelope: &Map<String, Value>) {
    match result {
        Value::Object(res_map) => print_object(res_map),
        other => println!("{}", format_value(other)),
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_object(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    let mut scalars = 0;
    for (key, val) in map {
        if is_listing(key, val) {
            continue;
        }
        builder.push_record([key.as_str(), &format_value(val)]);
        scalars += 1;
    }
    if scalars > 0 {
        println!("{}", Table::from(builder));
    }

    for key in LISTING_KEYS {
        if let Some(Value::Array(items)) = map.get(key) {
            println!("\n{}:", key);
            print_array_table(items);
        }
    }
}

fn is_listing(key: &str, val: &Value) -> bool {
    val.is_array() && LISTING_KEYS.contains(&key)
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    // Schedules mix payment rows with a summary line, so take the
    // union of keys in first-seen order
    let mut headers: Vec<String> = Vec::new();
    for item in arr {
        if let Value::Object(map) = item {
            for key in map.keys() {
                if !headers.contains(key) {
                    headers.push(key.clone());
                }
            }
        }
    }

    if headers.is_empty() {
        for item in arr {
            println!("{}", format_value(item));
        }
        return;
    }

    let mut builder = Builder::default();
    builder.push_record(&headers);
    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                .collect();
            builder.push_record(row);
        }
    }
    println!("{}", Table::from(builder));
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
