//! Filtering and ordering of catalog levels for display.

use std::cmp::Ordering;
use std::collections::HashSet;

use strum::{Display, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::level::Level;
use crate::pipeline::ProgressSnapshot;
use crate::progress::ProgressKind;

/// Which levels to show
#[derive(Debug, Clone)]
pub struct LevelFilter {
    /// Enabled progress kinds; levels without a resolved state count as not played
    pub kinds: HashSet<ProgressKind>,
    /// Case-insensitive substring of the song name or an artist
    pub query: Option<String>,
}

impl Default for LevelFilter {
    fn default() -> Self {
        Self {
            kinds: ProgressKind::iter().collect(),
            query: None,
        }
    }
}

impl LevelFilter {
    /// Filter showing only the given kinds (all kinds when empty)
    pub fn with_kinds<I: IntoIterator<Item = ProgressKind>>(kinds: I) -> Self {
        let kinds: HashSet<ProgressKind> = kinds.into_iter().collect();
        if kinds.is_empty() {
            return Self::default();
        }
        Self { kinds, query: None }
    }

    pub fn query<S: Into<String>>(mut self, query: S) -> Self {
        let query = query.into();
        self.query = if query.trim().is_empty() {
            None
        } else {
            Some(query.to_lowercase())
        };
        self
    }

    pub fn matches(&self, level: &Level, snapshot: &ProgressSnapshot) -> bool {
        if !self.kinds.contains(&snapshot.kind_of(level.id)) {
            return false;
        }

        let Some(query) = &self.query else {
            return true;
        };
        level.music.name.to_lowercase().contains(query.as_str())
            || level
                .music
                .artists
                .iter()
                .any(|artist| artist.to_lowercase().contains(query.as_str()))
    }
}

/// Display order for levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, IntoStaticStr, Display)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortKey {
    #[default]
    Difficulty,
    Name,
    Id,
    Contribution,
}

impl SortKey {
    fn compare(&self, a: &Level, b: &Level, snapshot: &ProgressSnapshot) -> Ordering {
        let contribution = |level: &Level| {
            snapshot
                .get(level.id)
                .map(|progress| progress.contribution)
                .unwrap_or(0.0)
        };

        let primary = match self {
            Self::Difficulty => a.difficulty.total_cmp(&b.difficulty),
            Self::Name => a
                .music
                .name
                .to_lowercase()
                .cmp(&b.music.name.to_lowercase()),
            Self::Id => Ordering::Equal,
            Self::Contribution => contribution(a).total_cmp(&contribution(b)),
        };
        primary.then(a.id.cmp(&b.id))
    }
}

/// Levels passing `filter`, ordered ascending by `sort`
pub fn select_levels<'a>(
    levels: &'a [Level],
    snapshot: &ProgressSnapshot,
    filter: &LevelFilter,
    sort: SortKey,
) -> Vec<&'a Level> {
    let mut selected: Vec<&Level> = levels
        .iter()
        .filter(|level| filter.matches(level, snapshot))
        .collect();
    selected.sort_by(|a, b| sort.compare(a, b, snapshot));
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    use crate::level::Music;
    use crate::progress::{LevelProgress, ProgressState};

    fn level(id: u32, name: &str, artists: &[&str], difficulty: f64) -> Level {
        Level {
            id,
            workshop_url: format!("?id={id}"),
            music: Music {
                name: name.to_string(),
                artists: artists.iter().map(|a| a.to_string()).collect(),
            },
            difficulty,
        }
    }

    fn catalog() -> Vec<Level> {
        vec![
            level(1, "Fastest Crash", &["Camellia"], 20.0),
            level(2, "Bad Apple", &["Alstroemeria Records"], 8.0),
            level(3, "Ghost", &["Camellia", "Someone"], 8.0),
        ]
    }

    fn snapshot() -> ProgressSnapshot {
        let mut snapshot = ProgressSnapshot::new();
        snapshot.insert(
            1,
            LevelProgress {
                state: ProgressState::Completed(0.5),
                contribution: 5.0,
            },
        );
        snapshot.insert(
            2,
            LevelProgress {
                state: ProgressState::Flawless,
                contribution: 8.0,
            },
        );
        snapshot
    }

    fn ids(levels: &[&Level]) -> Vec<u32> {
        levels.iter().map(|level| level.id).collect()
    }

    #[test]
    fn test_default_filter_shows_everything() {
        let levels = catalog();
        let selected = select_levels(&levels, &snapshot(), &LevelFilter::default(), SortKey::Id);
        assert_eq!(ids(&selected), vec![1, 2, 3]);
    }

    #[test]
    fn test_filter_by_kind_treats_missing_as_not_played() {
        let levels = catalog();
        let filter = LevelFilter::with_kinds([ProgressKind::NotPlayed]);
        let selected = select_levels(&levels, &snapshot(), &filter, SortKey::Id);
        assert_eq!(ids(&selected), vec![3]);

        let filter = LevelFilter::with_kinds([ProgressKind::Completed, ProgressKind::Flawless]);
        let selected = select_levels(&levels, &snapshot(), &filter, SortKey::Id);
        assert_eq!(ids(&selected), vec![1, 2]);
    }

    #[test]
    fn test_search_matches_name_or_artist() {
        let levels = catalog();
        let filter = LevelFilter::default().query("camellia");
        let selected = select_levels(&levels, &snapshot(), &filter, SortKey::Id);
        assert_eq!(ids(&selected), vec![1, 3]);

        let filter = LevelFilter::default().query("APPLE");
        let selected = select_levels(&levels, &snapshot(), &filter, SortKey::Id);
        assert_eq!(ids(&selected), vec![2]);

        let filter = LevelFilter::default().query("   ");
        assert!(filter.query.is_none());
    }

    #[test]
    fn test_sort_keys() {
        let levels = catalog();
        let filter = LevelFilter::default();

        let by_difficulty = select_levels(&levels, &snapshot(), &filter, SortKey::Difficulty);
        assert_eq!(ids(&by_difficulty), vec![2, 3, 1]);

        let by_name = select_levels(&levels, &snapshot(), &filter, SortKey::Name);
        assert_eq!(ids(&by_name), vec![2, 1, 3]);

        let by_contribution = select_levels(&levels, &snapshot(), &filter, SortKey::Contribution);
        assert_eq!(ids(&by_contribution), vec![3, 1, 2]);
    }

    #[test]
    fn test_sort_key_parse() {
        assert_eq!(SortKey::from_str("name").unwrap(), SortKey::Name);
        assert_eq!(SortKey::from_str("Difficulty").unwrap(), SortKey::Difficulty);
        assert!(SortKey::from_str("artist").is_err());
    }
}
