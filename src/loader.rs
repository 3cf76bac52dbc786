use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use calamine::{Data, DataType as _, Range, Reader, Xlsx};
use log::{debug, info};
use polars::prelude::*;

use crate::error::{PipelineError, Result};
use crate::schema::{files, sheets};

// ── Source descriptions ─────────────────────────────────────────────────────

/// Static description of one of the seven workbook inputs.
pub struct SourceSpec {
    /// Human-readable source name used in every error and log line.
    pub label: &'static str,
    /// Conventional file name used by [`SourceSet::read_dir`].
    pub file_name: &'static str,
    /// Required worksheet; `None` reads the first sheet whatever its name.
    pub sheet: Option<&'static str>,
}

pub const COST_ITEMS: SourceSpec = SourceSpec {
    label: "分項成本",
    file_name: files::COST_ITEMS,
    sheet: Some(sheets::COST_ITEMS),
};

pub const OR_TIME: SourceSpec = SourceSpec {
    label: "開刀房時間",
    file_name: files::OR_TIME,
    sheet: None,
};

pub const PHYSICIAN_SALARY: SourceSpec = SourceSpec {
    label: "醫師薪資",
    file_name: files::PHYSICIAN_SALARY,
    sheet: None,
};

pub const SURGERY_REGISTRY: SourceSpec = SourceSpec {
    label: "手術檔",
    file_name: files::SURGERY_REGISTRY,
    sheet: Some(sheets::SURGERY_REGISTRY),
};

pub const PHYSICIAN_COMMISSION: SourceSpec = SourceSpec {
    label: "醫師抽成費",
    file_name: files::PHYSICIAN_COMMISSION,
    sheet: None,
};

pub const EQUIPMENT_USAGE: SourceSpec = SourceSpec {
    label: "設備使用檔",
    file_name: files::EQUIPMENT_USAGE,
    sheet: None,
};

pub const MATERIAL_PROFIT: SourceSpec = SourceSpec {
    label: "手術材料檔",
    file_name: files::MATERIAL_PROFIT,
    sheet: Some(sheets::MATERIAL_PROFIT),
};

// ── Source set ──────────────────────────────────────────────────────────────

/// The seven loaded sources, in upload order.
pub struct SourceSet {
    pub cost_items: DataFrame,
    pub or_time: DataFrame,
    pub physician_salary: DataFrame,
    pub surgery_registry: DataFrame,
    pub physician_commission: DataFrame,
    pub equipment_usage: DataFrame,
    pub material_profit: DataFrame,
}

impl SourceSet {
    /// Read all seven workbooks from one directory using their conventional
    /// file names.
    pub fn read_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        info!("reading source workbooks from {}", dir.display());
        Ok(Self {
            cost_items: read_source_path(&COST_ITEMS, dir.join(COST_ITEMS.file_name))?,
            or_time: read_source_path(&OR_TIME, dir.join(OR_TIME.file_name))?,
            physician_salary: read_source_path(
                &PHYSICIAN_SALARY,
                dir.join(PHYSICIAN_SALARY.file_name),
            )?,
            surgery_registry: read_source_path(
                &SURGERY_REGISTRY,
                dir.join(SURGERY_REGISTRY.file_name),
            )?,
            physician_commission: read_source_path(
                &PHYSICIAN_COMMISSION,
                dir.join(PHYSICIAN_COMMISSION.file_name),
            )?,
            equipment_usage: read_source_path(
                &EQUIPMENT_USAGE,
                dir.join(EQUIPMENT_USAGE.file_name),
            )?,
            material_profit: read_source_path(
                &MATERIAL_PROFIT,
                dir.join(MATERIAL_PROFIT.file_name),
            )?,
        })
    }
}

// ── Workbook reading ────────────────────────────────────────────────────────

/// Read one workbook from a file on disk. See [`read_source`].
pub fn read_source_path(spec: &SourceSpec, path: impl AsRef<Path>) -> Result<DataFrame> {
    let file = File::open(path.as_ref())?;
    read_source(spec, BufReader::new(file))
}

/// Read one workbook stream and convert its designated sheet to a DataFrame.
///
/// When `spec.sheet` is set the sheet must exist under exactly that name;
/// otherwise the first sheet is taken. Column names are whitespace-trimmed.
pub fn read_source<RS: Read + Seek>(spec: &SourceSpec, reader: RS) -> Result<DataFrame> {
    let mut workbook: Xlsx<_> = Xlsx::new(reader).map_err(|e| PipelineError::SourceRead {
        source_label: spec.label,
        detail: e.to_string(),
    })?;

    let range = match spec.sheet {
        Some(sheet) => {
            if !workbook.sheet_names().iter().any(|s| s == sheet) {
                return Err(PipelineError::MissingSheet {
                    source_label: spec.label,
                    sheet,
                });
            }
            workbook.worksheet_range(sheet)
        }
        None => workbook
            .worksheet_range_at(0)
            .ok_or_else(|| PipelineError::SourceRead {
                source_label: spec.label,
                detail: "workbook contains no worksheets".into(),
            })?,
    }
    .map_err(|e| PipelineError::SourceRead {
        source_label: spec.label,
        detail: e.to_string(),
    })?;

    range_to_frame(&range, spec.label)
}

/// Convert a worksheet cell range to a DataFrame.
///
/// Row 0 is the header row; headers are trimmed and columns whose header is
/// empty are dropped. Cell types carry through: uniformly numeric columns
/// become Float64/Int64, date cells become Datetime, mixed content degrades
/// to String, and empty or error cells become null.
fn range_to_frame(range: &Range<Data>, source_label: &'static str) -> Result<DataFrame> {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Err(PipelineError::SourceRead {
            source_label,
            detail: "sheet has no header row".into(),
        });
    };

    let headers: Vec<(usize, String)> = header
        .iter()
        .enumerate()
        .filter_map(|(idx, cell)| {
            let name = cell.as_string().unwrap_or_default();
            let name = name.trim();
            (!name.is_empty()).then(|| (idx, name.to_string()))
        })
        .collect();

    if headers.is_empty() {
        return Err(PipelineError::SourceRead {
            source_label,
            detail: "sheet has no named columns".into(),
        });
    }

    let body: Vec<&[Data]> = rows.collect();
    let columns = headers
        .iter()
        .map(|(idx, name)| {
            let values: Vec<AnyValue> = body
                .iter()
                .map(|row| row.get(*idx).map_or(AnyValue::Null, cell_to_value))
                .collect();
            // strict=false: a mixed column falls back to its supertype
            Series::from_any_values(name.as_str().into(), &values, false).map(Column::from)
        })
        .collect::<PolarsResult<Vec<Column>>>()?;

    let df = DataFrame::new(columns).map_err(|e| PipelineError::SourceRead {
        source_label,
        detail: e.to_string(),
    })?;
    debug!(
        "{source_label}: loaded {} rows x {} columns",
        df.height(),
        df.width()
    );
    Ok(df)
}

fn cell_to_value(cell: &Data) -> AnyValue<'static> {
    match cell {
        Data::Empty => AnyValue::Null,
        Data::String(s) => AnyValue::StringOwned(s.as_str().into()),
        Data::Float(v) => AnyValue::Float64(*v),
        Data::Int(v) => AnyValue::Int64(*v),
        Data::Bool(v) => AnyValue::Boolean(*v),
        Data::DateTime(_) | Data::DateTimeIso(_) => cell
            .as_datetime()
            .map(|dt| {
                AnyValue::Datetime(
                    dt.and_utc().timestamp_micros(),
                    TimeUnit::Microseconds,
                    None,
                )
            })
            .unwrap_or(AnyValue::Null),
        Data::DurationIso(s) => AnyValue::StringOwned(s.as_str().into()),
        // error cells (#DIV/0! and friends) carry no usable value
        Data::Error(_) => AnyValue::Null,
    }
}
