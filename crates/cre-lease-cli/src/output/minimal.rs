use serde_json::Value;

use super::result_of;

/// Print just the key answer value from the output.
///
/// Looks for well-known result fields in order of priority, then falls
/// back to the first scalar field in the result object.
pub fn print_minimal(value: &Value) {
    let result_obj = result_of(value);

    let priority_keys = [
        "monthly_payment",
        "total_allocated",
        "total_annual_rent",
        "remaining_months",
        "status",
    ];

    if let Value::Object(map) = result_obj {
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", format_minimal(val));
                    return;
                }
            }
        }

        // Derived snapshots: one line per lease
        if let Some(Value::Array(records)) = map.get("records") {
            for record in records {
                let id = record.get("id").map(format_minimal).unwrap_or_default();
                let rent = record
                    .get("rent_annual")
                    .map(format_minimal)
                    .unwrap_or_default();
                println!("{}\t{}", id, rent);
            }
            return;
        }

        if let Some((key, val)) = map.iter().find(|(_, v)| !v.is_array() && !v.is_object()) {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(result_obj));
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
