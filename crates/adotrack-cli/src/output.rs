//! Console and JSON rendering of level progress.

use adotrack::{Level, LevelProgress, ProgressKind, ProgressSnapshot};
use chrono::Utc;
use owo_colors::OwoColorize;
use serde::Serialize;

const NAME_WIDTH: usize = 36;
const ARTISTS_WIDTH: usize = 28;

/// One level in the JSON status report
#[derive(Debug, Serialize)]
pub struct LevelRow<'a> {
    pub id: u32,
    pub external_id: &'a str,
    pub name: &'a str,
    pub artists: &'a [String],
    pub difficulty: f64,
    /// False when this run could not resolve the level
    pub resolved: bool,
    pub state: &'static str,
    pub percentage: Option<f64>,
    pub contribution: f64,
}

impl<'a> LevelRow<'a> {
    pub fn new(level: &'a Level, progress: Option<&LevelProgress>) -> Self {
        let fallback = LevelProgress::not_played();
        let current = progress.unwrap_or(&fallback);
        Self {
            id: level.id,
            external_id: level.external_id(),
            name: &level.music.name,
            artists: &level.music.artists,
            difficulty: level.difficulty,
            resolved: progress.is_some(),
            state: current.kind().short_name(),
            percentage: current.state.percentage(),
            contribution: current.contribution,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StatusReport<'a> {
    pub generated_at: String,
    pub skill_rating: f64,
    pub levels: Vec<LevelRow<'a>>,
}

impl<'a> StatusReport<'a> {
    pub fn new(levels: &[&'a Level], snapshot: &ProgressSnapshot, top_n: usize) -> Self {
        Self {
            generated_at: Utc::now().to_rfc3339(),
            skill_rating: snapshot.skill_rating(top_n),
            levels: levels
                .iter()
                .map(|&level| LevelRow::new(level, snapshot.get(level.id)))
                .collect(),
        }
    }
}

/// Shorten text to `max` characters, marking the cut with an ellipsis
pub fn elide(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut shortened: String = text.chars().take(max.saturating_sub(1)).collect();
    shortened.push('…');
    shortened
}

/// State column text, e.g. "COMPLETED 97.50%"
pub fn state_label(progress: Option<&LevelProgress>) -> String {
    match progress {
        Some(progress) => match progress.state.percentage() {
            Some(pct) => format!("{} {:.2}%", progress.kind(), pct),
            None => progress.kind().to_string(),
        },
        None => format!("{} ?", ProgressKind::NotPlayed),
    }
}

fn paint(text: &str, kind: ProgressKind, color: bool) -> String {
    if !color {
        return text.to_string();
    }
    match kind {
        ProgressKind::NotPlayed => text.dimmed().to_string(),
        ProgressKind::InProgress => text.yellow().to_string(),
        ProgressKind::Completed => text.green().to_string(),
        ProgressKind::Flawless => text.bright_magenta().bold().to_string(),
    }
}

pub fn format_table_header() -> String {
    format!(
        "{:>8}  {:>6}  {:<20}  {:>7}  {:<NAME_WIDTH$}  {}",
        "ID", "DIFF", "STATE", "RATING", "NAME", "ARTISTS"
    )
}

pub fn format_table_row(level: &Level, progress: Option<&LevelProgress>, color: bool) -> String {
    let kind = progress.map(LevelProgress::kind).unwrap_or_default();
    let state = paint(&format!("{:<20}", state_label(progress)), kind, color);
    let contribution = progress.map(|p| p.contribution).unwrap_or(0.0);

    format!(
        "{:>8}  {:>6.1}  {}  {:>7.3}  {:<NAME_WIDTH$}  {}",
        level.id,
        level.difficulty,
        state,
        contribution,
        elide(&level.music.name, NAME_WIDTH),
        elide(&level.artists_display(), ARTISTS_WIDTH),
    )
}
