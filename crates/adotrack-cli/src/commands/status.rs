//! Status command: progress of every level.

use std::io::IsTerminal;
use std::path::Path;

use adotrack::{
    DEFAULT_RATING_TOP_N, LevelFilter, ProgressKind, RuntimeConfig, SortKey, select_levels,
};
use anyhow::Result;

use crate::cli::OutputFormat;
use crate::output::{StatusReport, format_table_header, format_table_row};

pub fn run(
    config: RuntimeConfig,
    catalog_file: &Path,
    states: Vec<ProgressKind>,
    search: Option<String>,
    sort: SortKey,
    format: OutputFormat,
) -> Result<()> {
    let (levels, snapshot) = super::load_progress(config, catalog_file)?;

    let mut filter = LevelFilter::with_kinds(states);
    if let Some(query) = search {
        filter = filter.query(query);
    }
    let selected = select_levels(&levels, &snapshot, &filter, sort);

    match format {
        OutputFormat::Json => {
            let report = StatusReport::new(&selected, &snapshot, DEFAULT_RATING_TOP_N);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Table => {
            if selected.is_empty() {
                println!("No levels match the current filters");
                return Ok(());
            }

            let color = std::io::stdout().is_terminal();
            println!("{}", format_table_header());
            for level in &selected {
                println!(
                    "{}",
                    format_table_row(level, snapshot.get(level.id), color)
                );
            }
            println!();
            println!(
                "{} of {} levels shown, skill rating {:.2}",
                selected.len(),
                levels.len(),
                snapshot.skill_rating(DEFAULT_RATING_TOP_N)
            );
        }
    }

    Ok(())
}
