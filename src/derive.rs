use polars::prelude::*;

use crate::error::{PipelineError, Result};
use crate::loader::{COST_ITEMS, EQUIPMENT_USAGE, OR_TIME, PHYSICIAN_COMMISSION, PHYSICIAN_SALARY};
use crate::schema::{commission, cost_items, derived, equipment, or_time, rates, salary};

/// Formula input columns and the source each one must have come from.
const FORMULA_INPUTS: [(&str, &str); 10] = [
    (commission::COMMISSION_MINUTES, PHYSICIAN_COMMISSION.label),
    (commission::COMMISSION_FEE, PHYSICIAN_COMMISSION.label),
    (salary::PER_MINUTE_RATE, PHYSICIAN_SALARY.label),
    (or_time::NURSE_MINUTES, OR_TIME.label),
    (or_time::ASSISTANT_MINUTES, OR_TIME.label),
    (or_time::RECOVERY_MINUTES, OR_TIME.label),
    (or_time::PARAMETER_COUNT, OR_TIME.label),
    (equipment::DEPRECIATION_MINUTES, EQUIPMENT_USAGE.label),
    (equipment::DEPRECIATION_RATE, EQUIPMENT_USAGE.label),
    (cost_items::DRUG_MATERIAL_SUBTOTAL, COST_ITEMS.label),
];

// ── Cost derivation ─────────────────────────────────────────────────────────

/// Compute the fifteen derived cost columns on the merged ledger.
///
/// Each `with_columns` layer only reads columns that exist before it, so the
/// formula dependency order is enforced by data flow. Arithmetic stays f64;
/// a null input makes every cost downstream of it null, and the finalizer
/// resolves those to zero.
pub fn derive_costs(ledger: DataFrame) -> Result<DataFrame> {
    for (column, source_label) in FORMULA_INPUTS {
        if !ledger.schema().contains(column) {
            return Err(PipelineError::MissingColumn {
                source_label,
                column,
            });
        }
    }

    let derived = ledger
        .lazy()
        // per-minute staffing costs and the administrative workload charge
        .with_columns([
            (col(commission::COMMISSION_MINUTES) * col(salary::PER_MINUTE_RATE))
                .alias(derived::PHYSICIAN_FIXED_SALARY_COST),
            (col(or_time::NURSE_MINUTES) * lit(rates::NURSE_PER_MINUTE))
                .alias(derived::NURSE_COST),
            (col(or_time::ASSISTANT_MINUTES) * lit(rates::ASSISTANT_PER_MINUTE))
                .alias(derived::ASSISTANT_COST),
            (col(or_time::RECOVERY_MINUTES) * lit(rates::RECOVERY_PER_MINUTE))
                .alias(derived::RECOVERY_COST),
            (col(or_time::PARAMETER_COUNT) * lit(rates::ADMIN_STAFF_PER_PARAMETER))
                .alias(derived::ADMIN_STAFF_COST),
        ])
        // labor roll-up, keeping the operand order fixed, plus both
        // depreciation lines off the same time base
        .with_columns([
            (col(commission::COMMISSION_FEE)
                + col(derived::PHYSICIAN_FIXED_SALARY_COST)
                + col(derived::NURSE_COST)
                + col(derived::ASSISTANT_COST)
                + col(derived::RECOVERY_COST)
                + col(derived::ADMIN_STAFF_COST))
            .alias(derived::TOTAL_LABOR_COST),
            (col(equipment::DEPRECIATION_MINUTES) * col(equipment::DEPRECIATION_RATE))
                .alias(derived::EQUIPMENT_DEPRECIATION_COST),
            (col(equipment::DEPRECIATION_MINUTES) * lit(rates::FACILITY_DEPRECIATION_PER_MINUTE))
                .alias(derived::FACILITY_DEPRECIATION_COST),
        ])
        .with_columns([(col(derived::EQUIPMENT_DEPRECIATION_COST)
            + col(derived::FACILITY_DEPRECIATION_COST))
        .alias(derived::TOTAL_DEPRECIATION_COST)])
        .with_columns([(col(derived::TOTAL_DEPRECIATION_COST) * lit(rates::MAINTENANCE_SHARE))
            .alias(derived::MAINTENANCE_COST)])
        .with_columns([(col(derived::TOTAL_DEPRECIATION_COST) + col(derived::MAINTENANCE_COST))
            .alias(derived::TOTAL_FACILITY_COST)])
        .with_columns([(col(derived::TOTAL_LABOR_COST)
            + col(cost_items::DRUG_MATERIAL_SUBTOTAL)
            + col(derived::TOTAL_FACILITY_COST))
        .alias(derived::TOTAL_DIRECT_COST)])
        .with_columns([
            (col(derived::TOTAL_DIRECT_COST) * lit(rates::OVERHEAD_OPERATING_SHARE))
                .alias(derived::OVERHEAD_OPERATING_COST),
            (col(derived::TOTAL_DIRECT_COST) * lit(rates::ADMIN_OVERHEAD_SHARE))
                .alias(derived::ADMIN_OVERHEAD_COST),
        ])
        .with_columns([(col(derived::TOTAL_DIRECT_COST)
            + col(derived::OVERHEAD_OPERATING_COST)
            + col(derived::ADMIN_OVERHEAD_COST))
        .alias(derived::GRAND_TOTAL_COST)])
        .collect()?;

    Ok(derived)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger_row() -> DataFrame {
        df!(
            "醫師抽成費" => [500.0],
            "醫師時間2" => [30.0],
            "醫師每分鐘人力成本" => [10.0],
            "刷手及流動護士" => [5.0],
            "外科助手" => [2.0],
            "恢復室" => [3.0],
            "參數" => [1.0],
            "折舊時間2" => [10.0],
            "設備折舊" => [2.0],
            "藥品醫材成本合計" => [200.0],
        )
        .unwrap()
    }

    fn value(df: &DataFrame, column: &str) -> f64 {
        df.column(column).unwrap().f64().unwrap().get(0).unwrap()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn all_fifteen_costs_follow_their_formulas() {
        let derived = derive_costs(ledger_row()).unwrap();

        assert_close(value(&derived, "醫師固定薪成本"), 300.0);
        assert_close(value(&derived, "刷手及流動護士成本"), 66.55);
        assert_close(value(&derived, "外科助手成本"), 25.76);
        assert_close(value(&derived, "恢復室成本"), 31.44);
        assert_close(value(&derived, "行政人員"), 100.0);
        assert_close(value(&derived, "用人成本合計"), 1023.75);
        assert_close(value(&derived, "設備折舊成本"), 20.0);
        assert_close(value(&derived, "房屋折舊成本"), 7.1);
        assert_close(value(&derived, "總折舊成本"), 27.1);
        assert_close(value(&derived, "維修費用"), 4.878);
        assert_close(value(&derived, "設施設備費用合計"), 31.978);
        assert_close(value(&derived, "直接成本合計"), 1255.728);
        assert_close(value(&derived, "作業成本"), 188.3592);
        assert_close(value(&derived, "行政管理成本"), 62.7864);
        assert_close(value(&derived, "成本總計"), 1506.8736);
    }

    #[test]
    fn labor_total_is_exactly_the_sum_of_its_six_parts() {
        let derived = derive_costs(ledger_row()).unwrap();

        let manual = ((((value(&derived, "醫師抽成費") + value(&derived, "醫師固定薪成本"))
            + value(&derived, "刷手及流動護士成本"))
            + value(&derived, "外科助手成本"))
            + value(&derived, "恢復室成本"))
            + value(&derived, "行政人員");
        assert_eq!(value(&derived, "用人成本合計"), manual);
    }

    #[test]
    fn null_input_propagates_to_every_downstream_cost() {
        let ledger = df!(
            "醫師抽成費" => [500.0],
            "醫師時間2" => [Option::<f64>::None],
            "醫師每分鐘人力成本" => [10.0],
            "刷手及流動護士" => [5.0],
            "外科助手" => [2.0],
            "恢復室" => [3.0],
            "參數" => [1.0],
            "折舊時間2" => [10.0],
            "設備折舊" => [2.0],
            "藥品醫材成本合計" => [200.0],
        )
        .unwrap();

        let derived = derive_costs(ledger).unwrap();
        let get = |column: &str| derived.column(column).unwrap().f64().unwrap().get(0);

        assert_eq!(get("醫師固定薪成本"), None);
        assert_eq!(get("用人成本合計"), None);
        assert_eq!(get("直接成本合計"), None);
        assert_eq!(get("成本總計"), None);
        // branches not fed by the null input stay intact
        assert_close(get("刷手及流動護士成本").unwrap(), 66.55);
        assert_close(get("總折舊成本").unwrap(), 27.1);
    }

    #[test]
    fn missing_formula_input_names_its_source() {
        let ledger = ledger_row().drop("醫師時間2").unwrap();
        let err = derive_costs(ledger).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::MissingColumn {
                source_label: "醫師抽成費",
                column: "醫師時間2",
            }
        ));
    }
}
