//! Rating command: aggregate skill rating.

use std::path::Path;

use adotrack::{Level, LevelProgress, RuntimeConfig};
use anyhow::Result;

use crate::output::{elide, state_label};

pub fn run(config: RuntimeConfig, catalog_file: &Path, top: usize) -> Result<()> {
    let (levels, snapshot) = super::load_progress(config, catalog_file)?;

    let mut contributing: Vec<(&Level, &LevelProgress)> = levels
        .iter()
        .filter_map(|level| snapshot.get(level.id).map(|progress| (level, progress)))
        .filter(|(_, progress)| progress.contribution > 0.0)
        .collect();
    contributing.sort_by(|a, b| b.1.contribution.total_cmp(&a.1.contribution));
    contributing.truncate(top);

    println!("Skill rating: {:.4}", snapshot.skill_rating(top));
    println!(
        "Best {} of {} cleared levels (averaged over {})",
        contributing.len(),
        snapshot
            .iter()
            .filter(|(_, progress)| progress.contribution > 0.0)
            .count(),
        top
    );
    println!();

    for (rank, (level, progress)) in contributing.iter().enumerate() {
        println!(
            "{:>3}. {:>7.3}  {:<20}  {}",
            rank + 1,
            progress.contribution,
            state_label(Some(*progress)),
            elide(&level.music.name, 48)
        );
    }

    Ok(())
}
