//! Per-surgery cost allocation over seven hospital spreadsheet extracts.
//!
//! The pipeline reads seven xlsx sources, normalizes their join keys, merges
//! them into one wide ledger through six ordered joins, derives fifteen cost
//! columns from fixed business rates, and finalizes an integer-valued report
//! in a fixed column order.
//!
//! ```ignore
//! use surgi_costkit::{build_report, SourceSet};
//!
//! let sources = SourceSet::read_dir("uploads")?;
//! let report = build_report(sources)?;
//! // hand report.frame to the spreadsheet writer
//! ```

pub mod derive;
pub mod error;
pub mod finalize;
pub mod join;
pub mod loader;
pub mod normalize;
pub mod pipeline;
pub mod schema;

pub use error::{PipelineError, Result};
pub use finalize::CostReport;
pub use loader::{read_source, read_source_path, SourceSet, SourceSpec};
pub use pipeline::build_report;
