use thiserror::Error;

/// Errors raised while assembling the cost report.
///
/// Every variant is fatal to the run except [`PipelineError::SchemaIncomplete`],
/// which the finalizer downgrades to a warning carried on the report.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The workbook could not be read as tabular data.
    #[error("{source_label}: cannot read workbook: {detail}")]
    SourceRead {
        source_label: &'static str,
        detail: String,
    },

    /// A source that requires a named worksheet does not contain it.
    #[error("{source_label}: required sheet '{sheet}' not found")]
    MissingSheet {
        source_label: &'static str,
        sheet: &'static str,
    },

    /// A join key column is absent from one side of a join stage.
    #[error("{stage} join: key column '{column}' missing from {side}")]
    JoinConflict {
        stage: &'static str,
        column: &'static str,
        side: &'static str,
    },

    /// A designated key or formula input column is absent from its source.
    #[error("{source_label}: required column '{column}' missing")]
    MissingColumn {
        source_label: &'static str,
        column: &'static str,
    },

    /// Expected report columns are absent after derivation. The report is
    /// still produced from the columns that do exist, in schema order.
    #[error("report schema incomplete, missing columns: {}", .missing.join(", "))]
    SchemaIncomplete { missing: Vec<String> },

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
