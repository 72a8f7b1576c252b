//! Common Area Maintenance (CAM) expense allocation.
//!
//! Spreads the annual budget of shared building expenses across tenants
//! under one of four policies:
//! 1. **Pro-rata** -- by each tenant's share of total leased area
//! 2. **Fixed** -- equal split per tenant, area ignored
//! 3. **Custom** -- caller-supplied amount per tenant
//! 4. **None** -- nothing recovered
//!
//! Area shares are reported under every policy. Whether the allocations
//! add back up to the expense pool is reported as a diagnostic and never
//! blocks the result.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, warn};

use crate::derived::calculator::MONTHS_PER_YEAR;
use crate::derived::record::LeaseRecord;
use crate::types::{
    checked_total, ensure_non_negative, with_metadata, Area, ComputationOutput, Money, Percent,
};
use crate::LeaseEngineResult;

/// Largest gap between allocated and budgeted totals still counted as balanced.
pub const BALANCE_TOLERANCE: Money = dec!(0.01);

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Policy used to split the expense pool.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AllocationMethod {
    #[default]
    ProRata,
    Fixed,
    Custom,
    None,
}

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// One line of the annual operating expense budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseCategory {
    pub id: String,
    pub name: String,
    /// Annual budgeted cost
    pub amount: Money,
}

/// Full input for a CAM allocation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CamAllocationInput {
    /// Tenants sharing the expense pool, in display order
    pub records: Vec<LeaseRecord>,
    pub expenses: Vec<ExpenseCategory>,
    #[serde(default)]
    pub method: AllocationMethod,
    /// Annual amount per tenant id, used by the custom policy
    #[serde(default)]
    pub custom_amounts: HashMap<String, Money>,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// A single tenant's allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationRecord {
    pub tenant_id: String,
    /// Area counted toward the share (negative areas count as zero)
    pub leased_area: Area,
    /// Share of total leased area, 0-100
    pub share_percentage: Percent,
    /// Annual amount recovered from the tenant
    pub allocation_amount: Money,
    /// Override supplied for this tenant, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_amount: Option<Money>,
    pub monthly_allocation: Money,
}

/// Result of allocating the expense pool across all tenants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CamAllocation {
    pub method: AllocationMethod,
    /// Per-tenant allocations, in input order
    pub allocations: Vec<AllocationRecord>,
    pub total_expense: Money,
    pub total_area: Area,
    pub total_allocated: Money,
    /// total_allocated - total_expense
    pub variance: Money,
    #[serde(rename = "is_balanced")]
    balanced: bool,
}

impl CamAllocation {
    /// True when the allocations add back up to the expense pool within one cent.
    pub fn is_balanced(&self) -> bool {
        self.balanced
    }

    /// Allocation for a tenant id, if the tenant was part of the run.
    pub fn for_tenant(&self, tenant_id: &str) -> Option<&AllocationRecord> {
        self.allocations.iter().find(|a| a.tenant_id == tenant_id)
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Allocate the total of `expenses` across `records` using `method`.
///
/// Never fails: an empty tenant list gives an empty allocation and a zero
/// total area gives zero shares. Totals saturate at the decimal range;
/// [`run_cam_allocation`] rejects pools that would reach it.
pub fn allocate(
    records: &[LeaseRecord],
    expenses: &[ExpenseCategory],
    method: AllocationMethod,
    custom_amounts: &HashMap<String, Money>,
) -> CamAllocation {
    let total_expense: Money = expenses
        .iter()
        .fold(Decimal::ZERO, |acc, e| acc.saturating_add(e.amount));
    let total_area: Area = records
        .iter()
        .fold(Decimal::ZERO, |acc, r| acc.saturating_add(r.effective_area()));
    let fixed_amount = if records.is_empty() {
        Decimal::ZERO
    } else {
        total_expense / Decimal::from(records.len() as u64)
    };

    let allocations: Vec<AllocationRecord> = records
        .iter()
        .map(|record| {
            let area = record.effective_area();
            let share_percentage = if total_area.is_zero() {
                Decimal::ZERO
            } else {
                area / total_area * dec!(100)
            };
            let custom_amount = custom_amounts.get(&record.id).copied();

            let allocation_amount = match method {
                AllocationMethod::ProRata => share_percentage / dec!(100) * total_expense,
                AllocationMethod::Fixed => fixed_amount,
                AllocationMethod::Custom => custom_amount.unwrap_or(Decimal::ZERO),
                AllocationMethod::None => Decimal::ZERO,
            };

            AllocationRecord {
                tenant_id: record.id.clone(),
                leased_area: area,
                share_percentage,
                allocation_amount,
                custom_amount,
                monthly_allocation: allocation_amount / MONTHS_PER_YEAR,
            }
        })
        .collect();

    let total_allocated: Money = allocations
        .iter()
        .fold(Decimal::ZERO, |acc, a| acc.saturating_add(a.allocation_amount));
    let variance = total_allocated.saturating_sub(total_expense);

    CamAllocation {
        method,
        allocations,
        total_expense,
        total_area,
        total_allocated,
        variance,
        balanced: variance.abs() < BALANCE_TOLERANCE,
    }
}

/// Validate the input, allocate, and report imbalance as a warning.
pub fn run_cam_allocation(
    input: &CamAllocationInput,
) -> LeaseEngineResult<ComputationOutput<CamAllocation>> {
    let start = Instant::now();
    debug!(
        tenants = input.records.len(),
        expenses = input.expenses.len(),
        method = ?input.method,
        "allocating CAM expenses"
    );

    for (i, expense) in input.expenses.iter().enumerate() {
        ensure_non_negative(&format!("expenses[{i}].amount"), expense.amount)?;
    }
    for (tenant_id, amount) in &input.custom_amounts {
        ensure_non_negative(&format!("custom_amounts.{tenant_id}"), *amount)?;
    }
    checked_total("expenses", input.expenses.iter().map(|e| e.amount))?;
    checked_total(
        "records.leased_area",
        input.records.iter().map(|r| r.effective_area()),
    )?;
    if input.method == AllocationMethod::Custom {
        checked_total(
            "custom_amounts",
            input
                .records
                .iter()
                .filter_map(|r| input.custom_amounts.get(&r.id).copied()),
        )?;
    }

    let allocation = allocate(
        &input.records,
        &input.expenses,
        input.method,
        &input.custom_amounts,
    );

    let mut warnings: Vec<String> = Vec::new();
    if !input.records.is_empty() && allocation.total_area.is_zero() {
        warnings.push("Total leased area is zero; area shares reported as 0%".into());
    }
    if input.method == AllocationMethod::Custom {
        let mut unknown: Vec<&str> = input
            .custom_amounts
            .keys()
            .filter(|id| !input.records.iter().any(|r| &r.id == *id))
            .map(|id| id.as_str())
            .collect();
        unknown.sort_unstable();
        for id in unknown {
            warnings.push(format!("Custom amount for unknown tenant {id} ignored"));
        }
    }
    if !allocation.is_balanced() {
        warn!(variance = %allocation.variance, "CAM allocation unbalanced");
        warnings.push(format!(
            "Allocations total {} against expenses of {} (variance {})",
            allocation.total_allocated.round_dp(2),
            allocation.total_expense.round_dp(2),
            allocation.variance.round_dp(2)
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "CAM expense allocation",
        &serde_json::json!({
            "method": input.method,
            "tenants": input.records.len(),
            "expense_categories": input.expenses.len(),
            "balance_tolerance": BALANCE_TOLERANCE.to_string(),
        }),
        warnings,
        elapsed,
        allocation,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn tenant(id: &str, area: Decimal) -> LeaseRecord {
        LeaseRecord::new(
            id,
            area,
            dec!(30),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2029, 12, 31).unwrap(),
        )
    }

    fn tenants() -> Vec<LeaseRecord> {
        vec![
            tenant("anchor", dec!(12000)),
            tenant("cafe", dec!(1500)),
            tenant("dental", dec!(2500)),
        ]
    }

    fn expenses() -> Vec<ExpenseCategory> {
        vec![
            ExpenseCategory {
                id: "janitorial".into(),
                name: "Janitorial".into(),
                amount: dec!(48000),
            },
            ExpenseCategory {
                id: "landscaping".into(),
                name: "Landscaping".into(),
                amount: dec!(12000),
            },
            ExpenseCategory {
                id: "insurance".into(),
                name: "Property insurance".into(),
                amount: dec!(20000),
            },
        ]
    }

    #[test]
    fn test_pro_rata_shares() {
        let result = allocate(
            &tenants(),
            &expenses(),
            AllocationMethod::ProRata,
            &HashMap::new(),
        );

        assert_eq!(result.total_expense, dec!(80000));
        assert_eq!(result.total_area, dec!(16000));
        assert_eq!(result.allocations[0].share_percentage, dec!(75));
        assert_eq!(result.allocations[0].allocation_amount, dec!(60000));
        assert_eq!(result.allocations[1].allocation_amount, dec!(7500));
        assert_eq!(result.allocations[2].allocation_amount, dec!(12500));
        assert_eq!(result.allocations[2].monthly_allocation, dec!(12500) / dec!(12));
        assert!(result.is_balanced());
    }

    #[test]
    fn test_pro_rata_balanced_with_uneven_areas() {
        let records = vec![
            tenant("a", dec!(1234.5)),
            tenant("b", dec!(777)),
            tenant("c", dec!(3)),
        ];
        let result = allocate(&records, &expenses(), AllocationMethod::ProRata, &HashMap::new());
        let share_sum: Decimal = result.allocations.iter().map(|a| a.share_percentage).sum();

        assert!((share_sum - dec!(100)).abs() < dec!(0.01));
        assert!((result.total_allocated - dec!(80000)).abs() < dec!(0.01));
        assert!(result.is_balanced());
    }

    #[test]
    fn test_pro_rata_zero_total_area() {
        let records = vec![tenant("a", Decimal::ZERO), tenant("b", Decimal::ZERO)];
        let result = allocate(&records, &expenses(), AllocationMethod::ProRata, &HashMap::new());

        for alloc in &result.allocations {
            assert_eq!(alloc.share_percentage, Decimal::ZERO);
            assert_eq!(alloc.allocation_amount, Decimal::ZERO);
        }
        assert!(!result.is_balanced());
    }

    #[test]
    fn test_fixed_equal_split() {
        let result = allocate(&tenants(), &expenses(), AllocationMethod::Fixed, &HashMap::new());
        let expected = dec!(80000) / dec!(3);
        for alloc in &result.allocations {
            assert_eq!(alloc.allocation_amount, expected);
        }
        // Shares still follow area
        assert_eq!(result.allocations[0].share_percentage, dec!(75));
        assert!(result.is_balanced());
    }

    #[test]
    fn test_fixed_no_tenants() {
        let result = allocate(&[], &expenses(), AllocationMethod::Fixed, &HashMap::new());
        assert!(result.allocations.is_empty());
        assert_eq!(result.total_allocated, Decimal::ZERO);
    }

    #[test]
    fn test_custom_defaults_missing_to_zero() {
        let mut custom = HashMap::new();
        custom.insert("anchor".to_string(), dec!(50000));
        custom.insert("cafe".to_string(), dec!(10000));

        let result = allocate(&tenants(), &expenses(), AllocationMethod::Custom, &custom);

        assert_eq!(result.allocations[0].allocation_amount, dec!(50000));
        assert_eq!(result.allocations[0].custom_amount, Some(dec!(50000)));
        assert_eq!(result.allocations[2].allocation_amount, Decimal::ZERO);
        assert_eq!(result.allocations[2].custom_amount, None);
        assert_eq!(result.allocations[1].share_percentage, dec!(9.375));
        assert_eq!(result.variance, dec!(-20000));
        assert!(!result.is_balanced());
    }

    #[test]
    fn test_none_allocates_nothing() {
        let result = allocate(&tenants(), &expenses(), AllocationMethod::None, &HashMap::new());
        assert!(result.allocations.iter().all(|a| a.allocation_amount.is_zero()));
        assert_eq!(result.allocations[0].share_percentage, dec!(75));
        assert!(!result.is_balanced());
    }

    #[test]
    fn test_output_keeps_input_order() {
        let result = allocate(&tenants(), &expenses(), AllocationMethod::ProRata, &HashMap::new());
        let ids: Vec<&str> = result.allocations.iter().map(|a| a.tenant_id.as_str()).collect();
        assert_eq!(ids, vec!["anchor", "cafe", "dental"]);
    }

    #[test]
    fn test_run_warns_when_unbalanced() {
        let input = CamAllocationInput {
            records: tenants(),
            expenses: expenses(),
            method: AllocationMethod::None,
            custom_amounts: HashMap::new(),
        };
        let output = run_cam_allocation(&input).unwrap();
        assert!(!output.result.is_balanced());
        assert!(output.warnings.iter().any(|w| w.contains("variance -80000")));
    }

    #[test]
    fn test_run_rejects_negative_expense() {
        let mut bad = expenses();
        bad[1].amount = dec!(-5);
        let input = CamAllocationInput {
            records: tenants(),
            expenses: bad,
            method: AllocationMethod::ProRata,
            custom_amounts: HashMap::new(),
        };
        match run_cam_allocation(&input).unwrap_err() {
            crate::LeaseEngineError::InvalidInput { field, .. } => {
                assert_eq!(field, "expenses[1].amount");
            }
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    fn oversized_pool() -> Vec<ExpenseCategory> {
        ["roof", "parking"]
            .iter()
            .map(|id| ExpenseCategory {
                id: id.to_string(),
                name: id.to_string(),
                amount: dec!(5e28),
            })
            .collect()
    }

    #[test]
    fn test_allocate_saturates_oversized_pool() {
        let result = allocate(
            &tenants(),
            &oversized_pool(),
            AllocationMethod::Fixed,
            &HashMap::new(),
        );
        assert_eq!(result.total_expense, Decimal::MAX);
        assert_eq!(result.allocations.len(), 3);
    }

    #[test]
    fn test_run_rejects_oversized_pool() {
        let input = CamAllocationInput {
            records: tenants(),
            expenses: oversized_pool(),
            method: AllocationMethod::ProRata,
            custom_amounts: HashMap::new(),
        };
        match run_cam_allocation(&input).unwrap_err() {
            crate::LeaseEngineError::InvalidInput { field, .. } => {
                assert_eq!(field, "expenses");
            }
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_run_rejects_oversized_custom_amounts() {
        let custom: HashMap<String, Money> = [("anchor", dec!(6e28)), ("cafe", dec!(6e28))]
            .into_iter()
            .map(|(id, amount)| (id.to_string(), amount))
            .collect();
        let input = CamAllocationInput {
            records: tenants(),
            expenses: expenses(),
            method: AllocationMethod::Custom,
            custom_amounts: custom,
        };
        match run_cam_allocation(&input).unwrap_err() {
            crate::LeaseEngineError::InvalidInput { field, .. } => {
                assert_eq!(field, "custom_amounts");
            }
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }
}
