use log::warn;
use polars::prelude::*;

use crate::error::{PipelineError, Result};
use crate::schema::{registry, report};

// ── Report assembly ─────────────────────────────────────────────────────────

/// The finalized report plus any schema gap found while assembling it.
///
/// `missing_columns` is non-empty when expected report columns were absent
/// after derivation. The frame then keeps whatever columns it has in schema
/// order instead of the fixed report order.
#[derive(Debug)]
pub struct CostReport {
    pub frame: DataFrame,
    pub missing_columns: Vec<String>,
}

impl CostReport {
    /// The schema gap as the error it was logged as, if there is one.
    pub fn schema_warning(&self) -> Option<PipelineError> {
        (!self.missing_columns.is_empty()).then(|| PipelineError::SchemaIncomplete {
            missing: self.missing_columns.clone(),
        })
    }

    /// Workbook file name the external report writer should save under.
    pub fn file_name(&self) -> &'static str {
        report::FILE_NAME
    }

    /// Name of the single result sheet in that workbook.
    pub fn sheet_name(&self) -> &'static str {
        report::SHEET
    }
}

/// Put the derived ledger into report shape.
///
/// Selects the fixed report columns, zero-fills and integer-rounds every
/// numeric column, and rewrites the date column as a 6-digit `YYMMDD`
/// string. A missing report column downgrades to a warning: the report is
/// still produced, unordered, and the gap is carried on the result.
pub fn finalize(derived: DataFrame) -> Result<CostReport> {
    let schema = derived.schema();
    let missing_columns: Vec<String> = report::COLUMNS
        .iter()
        .copied()
        .filter(|&column| !schema.contains(column))
        .map(str::to_string)
        .collect();

    let frame = if missing_columns.is_empty() {
        derived
            .lazy()
            .select(report::COLUMNS.iter().map(|&c| col(c)).collect::<Vec<_>>())
            .collect()?
    } else {
        warn!(
            "{}",
            PipelineError::SchemaIncomplete {
                missing: missing_columns.clone(),
            }
        );
        derived
    };

    let frame = round_numeric_columns(frame)?;
    let frame = format_report_date(frame)?;
    Ok(CostReport {
        frame,
        missing_columns,
    })
}

/// Zero-fill and round every numeric column to a plain integer.
///
/// Rounding is half-to-even. String and datetime columns pass through
/// untouched; all-empty (Null dtype) columns count as numeric and come out
/// as zeros.
fn round_numeric_columns(frame: DataFrame) -> Result<DataFrame> {
    let numeric: Vec<Expr> = frame
        .get_columns()
        .iter()
        .filter(|column| {
            matches!(
                column.dtype(),
                DataType::Float64 | DataType::Int64 | DataType::Null
            )
        })
        .map(|column| {
            col(column.name().as_str())
                .cast(DataType::Float64)
                .fill_null(lit(0.0))
                .round(0, RoundMode::HalfToEven)
                .cast(DataType::Int64)
        })
        .collect();

    if numeric.is_empty() {
        return Ok(frame);
    }
    Ok(frame.lazy().with_columns(numeric).collect()?)
}

/// Rewrite the date column as a `YYMMDD` string.
///
/// A datetime column is formatted directly; a string column is parsed first,
/// non-strictly, so an unparsable date ends up null rather than failing the
/// report. Frames without a date column pass through.
fn format_report_date(frame: DataFrame) -> Result<DataFrame> {
    let Some(dtype) = frame.schema().get(registry::DATE).cloned() else {
        return Ok(frame);
    };

    let expr = if matches!(dtype, DataType::Datetime(_, _)) {
        col(registry::DATE).dt().to_string("%y%m%d")
    } else if dtype == DataType::String {
        col(registry::DATE)
            .str()
            .to_datetime(
                Some(TimeUnit::Microseconds),
                None,
                StrptimeOptions {
                    strict: false,
                    ..Default::default()
                },
                lit("raise"),
            )
            .dt()
            .to_string("%y%m%d")
    } else {
        return Ok(frame);
    };

    Ok(frame.lazy().with_columns([expr]).collect()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn datetime_column(name: &str, timestamps: &[i64]) -> Column {
        Series::new(name.into(), timestamps)
            .cast(&DataType::Datetime(TimeUnit::Microseconds, None))
            .unwrap()
            .into()
    }

    fn micros(y: i32, m: u32, d: u32) -> i64 {
        chrono::NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            .and_utc()
            .timestamp_micros()
    }

    #[test]
    fn numeric_columns_zero_fill_and_round_half_to_even() {
        let frame = df!(
            "成本總計" => [Some(1.4), Some(2.5), Some(3.5), Some(-2.5), None],
            "病患姓名" => ["甲", "乙", "丙", "丁", "戊"],
        )
        .unwrap();

        let rounded = round_numeric_columns(frame).unwrap();
        let totals = rounded.column("成本總計").unwrap();
        assert_eq!(totals.dtype(), &DataType::Int64);
        let expected = [1, 2, 4, -2, 0];
        for (idx, want) in expected.into_iter().enumerate() {
            assert_eq!(totals.i64().unwrap().get(idx), Some(want));
        }
        // the name column is untouched
        assert_eq!(rounded.column("病患姓名").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn integer_columns_survive_the_float_round_trip() {
        let frame = df!("手術院碼" => [1i64, 2, 52]).unwrap();
        let rounded = round_numeric_columns(frame).unwrap();
        let codes = rounded.column("手術院碼").unwrap();
        assert_eq!(codes.dtype(), &DataType::Int64);
        assert_eq!(codes.i64().unwrap().get(2), Some(52));
    }

    #[test]
    fn all_null_column_becomes_zeros() {
        let frame = df!("材料淨利潤" => [Option::<f64>::None, None]).unwrap();
        let rounded = round_numeric_columns(frame).unwrap();
        let profit = rounded.column("材料淨利潤").unwrap();
        assert_eq!(profit.i64().unwrap().get(0), Some(0));
        assert_eq!(profit.i64().unwrap().get(1), Some(0));
    }

    #[test]
    fn datetime_date_column_formats_as_yymmdd() {
        let frame = DataFrame::new(vec![datetime_column(
            "日期",
            &[micros(2024, 3, 15), micros(2023, 11, 2)],
        )])
        .unwrap();

        let formatted = format_report_date(frame).unwrap();
        let dates = formatted.column("日期").unwrap();
        assert_eq!(dates.str().unwrap().get(0), Some("240315"));
        assert_eq!(dates.str().unwrap().get(1), Some("231102"));
    }

    #[test]
    fn string_date_column_is_parsed_then_formatted() {
        let frame = df!("日期" => [Some("2024-03-15"), Some("垃圾"), None]).unwrap();
        let formatted = format_report_date(frame).unwrap();
        let dates = formatted.column("日期").unwrap();
        assert_eq!(dates.str().unwrap().get(0), Some("240315"));
        assert_eq!(dates.str().unwrap().get(1), None);
        assert_eq!(dates.str().unwrap().get(2), None);
    }

    #[test]
    fn frame_without_date_column_passes_through() {
        let frame = df!("成本總計" => [1.0]).unwrap();
        let out = format_report_date(frame.clone()).unwrap();
        assert_eq!(out, frame);
    }

    #[test]
    fn schema_gap_keeps_the_frame_and_lists_the_missing_columns() {
        let frame = df!(
            "手術院碼" => [1i64],
            "成本總計" => [1506.8736],
        )
        .unwrap();

        let report = finalize(frame).unwrap();
        assert!(report.missing_columns.contains(&"病患姓名".to_string()));
        assert!(!report.missing_columns.contains(&"手術院碼".to_string()));
        assert!(report.schema_warning().is_some());
        // the surviving columns still get the numeric treatment
        let totals = report.frame.column("成本總計").unwrap();
        assert_eq!(totals.i64().unwrap().get(0), Some(1507));
    }

    #[test]
    fn report_carries_the_writer_hand_off_names() {
        let report = finalize(df!("成本總計" => [0.0]).unwrap()).unwrap();
        assert_eq!(report.file_name(), "產出報表1-報表版(全部院碼).xlsx");
        assert_eq!(report.sheet_name(), "報表結果");
    }
}
