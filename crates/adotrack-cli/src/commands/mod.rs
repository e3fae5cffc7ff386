//! CLI command implementations.

pub mod cache;
pub mod fingerprint;
pub mod rating;
pub mod status;

use adotrack::{Level, ProgressSnapshot, ReconciliationPipeline, RuntimeConfig, load_catalog};
use anyhow::{Context, Result, bail};
use std::path::Path;
use tracing::warn;

/// Load the catalog and run the reconciliation pipeline over it
///
/// Fails when the save file cannot be read.
pub(crate) fn load_progress(
    config: RuntimeConfig,
    catalog_file: &Path,
) -> Result<(Vec<Level>, ProgressSnapshot)> {
    let levels = load_catalog(catalog_file);
    if levels.is_empty() {
        bail!("No levels found in catalog {}", catalog_file.display());
    }

    let save_file = config.save_file_path.clone();
    let snapshot = ReconciliationPipeline::new(config)
        .try_run(&levels)
        .with_context(|| format!("Cannot reconcile progress from {}", save_file.display()))?;
    if snapshot.is_empty() {
        warn!("No progress information could be resolved");
    }

    Ok((levels, snapshot))
}
