use log::debug;
use polars::prelude::*;

use crate::error::{PipelineError, Result};
use crate::loader::{
    SourceSet, COST_ITEMS, EQUIPMENT_USAGE, MATERIAL_PROFIT, OR_TIME, PHYSICIAN_COMMISSION,
    SURGERY_REGISTRY,
};
use crate::schema::keys;

// ── Key normalization ───────────────────────────────────────────────────────

/// Normalize the designated join-key columns of every source.
///
/// Must run before any join: the join stages assume trimmed name keys and
/// integer site codes on both sides. Running it a second time changes
/// nothing.
pub fn normalize_sources(sources: SourceSet) -> Result<SourceSet> {
    let SourceSet {
        cost_items,
        or_time,
        physician_salary,
        surgery_registry,
        physician_commission,
        equipment_usage,
        material_profit,
    } = sources;

    let cost_items = trim_string_key(cost_items, keys::PATIENT_NAME, COST_ITEMS.label)?;
    let cost_items = coerce_site_code(cost_items, COST_ITEMS.label)?;

    let or_time = trim_string_key(or_time, keys::PATIENT_NAME, OR_TIME.label)?;

    let surgery_registry =
        trim_string_key(surgery_registry, keys::RECORD_NUMBER, SURGERY_REGISTRY.label)?;
    let surgery_registry = coerce_site_code(surgery_registry, SURGERY_REGISTRY.label)?;

    let physician_commission = coerce_site_code(physician_commission, PHYSICIAN_COMMISSION.label)?;

    let equipment_usage = coerce_site_code(equipment_usage, EQUIPMENT_USAGE.label)?;

    let material_profit =
        trim_string_key(material_profit, keys::RECORD_NUMBER, MATERIAL_PROFIT.label)?;
    let material_profit = coerce_site_code(material_profit, MATERIAL_PROFIT.label)?;

    debug!("join keys normalized for all seven sources");
    Ok(SourceSet {
        cost_items,
        or_time,
        physician_salary,
        surgery_registry,
        physician_commission,
        equipment_usage,
        material_profit,
    })
}

/// Strip surrounding whitespace from a string key column.
///
/// A non-string column is cast to String first. Null keys stay null; an
/// all-whitespace key becomes the empty string, which is a legal key that
/// simply never matches a real name.
pub fn trim_string_key(
    df: DataFrame,
    column: &'static str,
    source_label: &'static str,
) -> Result<DataFrame> {
    require_column(&df, column, source_label)?;
    let df = df
        .lazy()
        .with_columns([col(column)
            .cast(DataType::String)
            .str()
            .strip_chars(lit(NULL))])
        .collect()?;
    Ok(df)
}

/// Coerce the site-code key column to Int64.
///
/// Codes arrive as numbers in some workbooks and text in others; both sides
/// of a site-code join must agree on Int64 before joining. Unparsable or
/// missing codes become 0 and fractional codes truncate toward zero, so junk
/// codes from different sources can only ever meet each other in the 0 group.
pub fn coerce_site_code(df: DataFrame, source_label: &'static str) -> Result<DataFrame> {
    require_column(&df, keys::SITE_CODE, source_label)?;
    let df = df
        .lazy()
        .with_columns([col(keys::SITE_CODE)
            .cast(DataType::String)
            .str()
            .strip_chars(lit(NULL))
            .cast(DataType::Float64)
            .cast(DataType::Int64)
            .fill_null(lit(0))])
        .collect()?;
    Ok(df)
}

fn require_column(df: &DataFrame, column: &'static str, source_label: &'static str) -> Result<()> {
    if df.schema().contains(column) {
        Ok(())
    } else {
        Err(PipelineError::MissingColumn {
            source_label,
            column,
        })
    }
}
