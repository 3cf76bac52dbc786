use log::info;

use crate::derive::derive_costs;
use crate::error::Result;
use crate::finalize::{finalize, CostReport};
use crate::join::merge_sources;
use crate::loader::SourceSet;
use crate::normalize::normalize_sources;

/// Build the cost allocation report from the seven loaded sources.
///
/// Stages run strictly in order: normalize keys, merge, derive costs,
/// finalize. Each stage consumes the previous stage's output, so nothing
/// downstream can see un-normalized keys or half-derived costs.
pub fn build_report(sources: SourceSet) -> Result<CostReport> {
    info!("normalizing join keys");
    let sources = normalize_sources(sources)?;

    info!("merging the seven sources");
    let ledger = merge_sources(&sources)?;
    info!("merged ledger holds {} rows", ledger.height());

    info!("deriving cost columns");
    let derived = derive_costs(ledger)?;

    info!("assembling the report");
    finalize(derived)
}
