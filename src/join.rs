use log::debug;
use polars::prelude::*;

use crate::error::{PipelineError, Result};
use crate::loader::{
    SourceSet, COST_ITEMS, EQUIPMENT_USAGE, MATERIAL_PROFIT, OR_TIME, PHYSICIAN_COMMISSION,
    PHYSICIAN_SALARY, SURGERY_REGISTRY,
};
use crate::schema::keys;

/// Left-hand label once the first stage has merged sources together.
const LEDGER: &str = "合併結果";

// ── Merge stages ────────────────────────────────────────────────────────────

/// Run the six joins in dependency order and return the merged ledger.
///
/// Inner joins drop surgeries that cannot be costed because a source has no
/// matching row; the material join is left-outer because a surgery may
/// legitimately have no billed material line. Duplicate keys multiply into
/// the full cross product, and row order always follows the left side.
pub fn merge_sources(sources: &SourceSet) -> Result<DataFrame> {
    let merged = join_stage(
        &sources.cost_items,
        &sources.or_time,
        &[keys::PATIENT_NAME],
        JoinType::Inner,
        "or-time",
        COST_ITEMS.label,
        OR_TIME.label,
    )?;
    let merged = join_stage(
        &merged,
        &sources.physician_commission,
        &[keys::SITE_CODE],
        JoinType::Inner,
        "commission",
        LEDGER,
        PHYSICIAN_COMMISSION.label,
    )?;
    let merged = join_stage(
        &merged,
        &sources.equipment_usage,
        &[keys::SITE_CODE],
        JoinType::Inner,
        "equipment",
        LEDGER,
        EQUIPMENT_USAGE.label,
    )?;
    let merged = join_stage(
        &merged,
        &sources.surgery_registry,
        &[keys::RECORD_NUMBER, keys::PHYSICIAN, keys::SITE_CODE],
        JoinType::Inner,
        "registry",
        LEDGER,
        SURGERY_REGISTRY.label,
    )?;
    let merged = join_stage(
        &merged,
        &sources.material_profit,
        &[keys::RECORD_NUMBER, keys::SITE_CODE],
        JoinType::Left,
        "material",
        LEDGER,
        MATERIAL_PROFIT.label,
    )?;
    let merged = join_stage(
        &merged,
        &sources.physician_salary,
        &[keys::PHYSICIAN],
        JoinType::Inner,
        "salary",
        LEDGER,
        PHYSICIAN_SALARY.label,
    )?;
    Ok(merged)
}

#[allow(clippy::too_many_arguments)]
fn join_stage(
    left: &DataFrame,
    right: &DataFrame,
    on: &[&'static str],
    how: JoinType,
    stage: &'static str,
    left_label: &'static str,
    right_label: &'static str,
) -> Result<DataFrame> {
    for &column in on {
        if !left.schema().contains(column) {
            return Err(PipelineError::JoinConflict {
                stage,
                column,
                side: left_label,
            });
        }
        if !right.schema().contains(column) {
            return Err(PipelineError::JoinConflict {
                stage,
                column,
                side: right_label,
            });
        }
    }

    let on_exprs: Vec<Expr> = on.iter().map(|&c| col(c)).collect();
    let args = JoinArgs {
        how,
        maintain_order: MaintainOrderJoin::Left,
        ..Default::default()
    };
    let joined = left
        .clone()
        .lazy()
        .join(right.clone().lazy(), on_exprs.clone(), on_exprs, args)
        .collect()?;

    debug!(
        "{stage} join: {} x {} rows -> {} rows",
        left.height(),
        right.height(),
        joined.height()
    );
    Ok(joined)
}
