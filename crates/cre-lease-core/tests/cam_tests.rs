use chrono::NaiveDate;
use cre_lease_core::cam::allocation::{
    self, AllocationMethod, CamAllocationInput, ExpenseCategory,
};
use cre_lease_core::cam::apply;
use cre_lease_core::derived::record::LeaseRecord;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn tenant(id: &str, area: Decimal) -> LeaseRecord {
    LeaseRecord::new(id, area, dec!(27), date(2024, 6, 1), date(2031, 5, 31))
}

fn strip_center() -> Vec<LeaseRecord> {
    vec![
        tenant("grocer", dec!(28000)),
        tenant("pharmacy", dec!(11250)),
        tenant("nails", dec!(1200)),
        tenant("pizza", dec!(1850)),
        tenant("bank", dec!(3333)),
    ]
}

fn budget() -> Vec<ExpenseCategory> {
    vec![
        ExpenseCategory {
            id: "snow".into(),
            name: "Snow removal".into(),
            amount: dec!(18500),
        },
        ExpenseCategory {
            id: "parking".into(),
            name: "Parking lot maintenance".into(),
            amount: dec!(42750.55),
        },
        ExpenseCategory {
            id: "tax".into(),
            name: "Real estate taxes".into(),
            amount: dec!(131000),
        },
    ]
}

// ===========================================================================
// Pro-rata
// ===========================================================================

#[test]
fn test_pro_rata_sums_to_budget() {
    let result = allocation::allocate(
        &strip_center(),
        &budget(),
        AllocationMethod::ProRata,
        &HashMap::new(),
    );
    let share_sum: Decimal = result.allocations.iter().map(|a| a.share_percentage).sum();

    assert_eq!(result.total_expense, dec!(192250.55));
    assert!((share_sum - dec!(100)).abs() < dec!(0.01));
    assert!((result.total_allocated - result.total_expense).abs() < dec!(0.01));
    assert!(result.is_balanced());
}

#[test]
fn test_pro_rata_share_formula() {
    let records = strip_center();
    let result = allocation::allocate(&records, &budget(), AllocationMethod::ProRata, &HashMap::new());
    let total_area: Decimal = records.iter().map(|r| r.leased_area).sum();

    for (record, alloc) in records.iter().zip(&result.allocations) {
        assert_eq!(alloc.tenant_id, record.id);
        assert_eq!(
            alloc.share_percentage,
            record.leased_area / total_area * dec!(100)
        );
        assert_eq!(
            alloc.allocation_amount,
            alloc.share_percentage / dec!(100) * result.total_expense
        );
    }
}

#[test]
fn test_pro_rata_zero_area_no_error() {
    let records = vec![tenant("a", Decimal::ZERO), tenant("b", Decimal::ZERO)];
    let result = allocation::allocate(&records, &budget(), AllocationMethod::ProRata, &HashMap::new());
    assert_eq!(result.allocations.len(), 2);
    assert!(result
        .allocations
        .iter()
        .all(|a| a.share_percentage.is_zero() && a.allocation_amount.is_zero()));
}

// ===========================================================================
// Other policies
// ===========================================================================

#[test]
fn test_fixed_split_is_total_over_count() {
    let result = allocation::allocate(&strip_center(), &budget(), AllocationMethod::Fixed, &HashMap::new());
    let expected = dec!(192250.55) / dec!(5);
    for alloc in &result.allocations {
        assert_eq!(alloc.allocation_amount, expected);
    }
}

#[test]
fn test_custom_amounts_serde_roundtrip_of_method() {
    let json = r#"{
        "records": [],
        "expenses": [],
        "method": "custom",
        "custom_amounts": {"grocer": "1000"}
    }"#;
    let input: CamAllocationInput = serde_json::from_str(json).unwrap();
    assert_eq!(input.method, AllocationMethod::Custom);
    assert_eq!(input.custom_amounts.get("grocer"), Some(&dec!(1000)));
}

#[test]
fn test_method_defaults_to_pro_rata() {
    let json = r#"{"records": [], "expenses": []}"#;
    let input: CamAllocationInput = serde_json::from_str(json).unwrap();
    assert_eq!(input.method, AllocationMethod::ProRata);
}

#[test]
fn test_run_custom_warns_on_unknown_tenant() {
    let mut custom = HashMap::new();
    custom.insert("grocer".to_string(), dec!(100000));
    custom.insert("closed-video-store".to_string(), dec!(5000));
    let input = CamAllocationInput {
        records: strip_center(),
        expenses: budget(),
        method: AllocationMethod::Custom,
        custom_amounts: custom,
    };
    let output = allocation::run_cam_allocation(&input).unwrap();
    assert!(output
        .warnings
        .iter()
        .any(|w| w.contains("closed-video-store")));
    assert!(!output.result.is_balanced());
    assert_eq!(
        output.result.for_tenant("grocer").map(|a| a.allocation_amount),
        Some(dec!(100000))
    );
}

#[test]
fn test_balance_flag_serialized() {
    let result = allocation::allocate(&strip_center(), &budget(), AllocationMethod::None, &HashMap::new());
    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["is_balanced"], serde_json::Value::Bool(false));
    assert_eq!(value["method"], "none");
}

// ===========================================================================
// Write-back
// ===========================================================================

#[test]
fn test_apply_allocation_sets_cam_charges() {
    let records = strip_center();
    let result = allocation::allocate(&records, &budget(), AllocationMethod::ProRata, &HashMap::new());
    let updated = apply::apply_allocation(&records, &result, date(2026, 10, 16));

    for (record, alloc) in updated.iter().zip(&result.allocations) {
        let diff = (record.annual_cam_charges - alloc.allocation_amount).abs();
        assert!(diff < dec!(0.01), "{} off by {}", record.id, diff);
    }
    let cam_total: Decimal = updated.iter().map(|r| r.annual_cam_charges).sum();
    assert!((cam_total - dec!(192250.55)).abs() < dec!(0.01));
}
