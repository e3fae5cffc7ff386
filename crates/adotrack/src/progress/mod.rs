//! Per-level play progress derived from the game save file.

mod rating;
mod resolver;
mod save_data;

pub use rating::*;
pub use resolver::*;
pub use save_data::*;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, FromRepr, IntoStaticStr};

/// Play state of a level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum ProgressState {
    NotPlayed,
    /// Completion fraction in [0, 1)
    InProgress(f64),
    /// Accuracy fraction below 1
    Completed(f64),
    Flawless,
}

impl ProgressState {
    pub fn kind(&self) -> ProgressKind {
        match self {
            Self::NotPlayed => ProgressKind::NotPlayed,
            Self::InProgress(_) => ProgressKind::InProgress,
            Self::Completed(_) => ProgressKind::Completed,
            Self::Flawless => ProgressKind::Flawless,
        }
    }

    /// Completion or accuracy as a percentage, when the state carries one
    pub fn percentage(&self) -> Option<f64> {
        match self {
            Self::InProgress(value) | Self::Completed(value) => Some(value * 100.0),
            Self::NotPlayed | Self::Flawless => None,
        }
    }
}

/// Payload-free classification of a ProgressState, used for filtering
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Default,
    FromRepr,
    EnumIter,
    EnumString,
    IntoStaticStr,
    Display,
)]
#[repr(u8)]
#[strum(ascii_case_insensitive)]
pub enum ProgressKind {
    #[default]
    #[strum(to_string = "NOT PLAYED", serialize = "not-played")]
    NotPlayed = 0,
    #[strum(to_string = "IN PROGRESS", serialize = "in-progress")]
    InProgress = 1,
    #[strum(to_string = "COMPLETED", serialize = "completed")]
    Completed = 2,
    #[strum(to_string = "FLAWLESS", serialize = "flawless")]
    Flawless = 3,
}

impl ProgressKind {
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::from_repr(value)
    }

    pub fn short_name(&self) -> &'static str {
        self.into()
    }
}

/// Resolved state and skill rating contribution of one level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelProgress {
    pub state: ProgressState,
    pub contribution: f64,
}

impl LevelProgress {
    pub fn not_played() -> Self {
        Self {
            state: ProgressState::NotPlayed,
            contribution: 0.0,
        }
    }

    pub fn kind(&self) -> ProgressKind {
        self.state.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_progress_kind_from_u8() {
        assert_eq!(ProgressKind::from_u8(0), Some(ProgressKind::NotPlayed));
        assert_eq!(ProgressKind::from_u8(3), Some(ProgressKind::Flawless));
        assert_eq!(ProgressKind::from_u8(4), None);
    }

    #[test]
    fn test_progress_kind_parse_and_display() {
        assert_eq!(
            ProgressKind::from_str("in-progress").unwrap(),
            ProgressKind::InProgress
        );
        assert_eq!(
            ProgressKind::from_str("FLAWLESS").unwrap(),
            ProgressKind::Flawless
        );
        assert_eq!(
            ProgressKind::from_str("Not Played").unwrap(),
            ProgressKind::NotPlayed
        );
        assert!(ProgressKind::from_str("cleared").is_err());
        assert_eq!(ProgressKind::Completed.to_string(), "COMPLETED");
        assert_eq!(ProgressKind::NotPlayed.short_name(), "NOT PLAYED");
    }

    #[test]
    fn test_progress_kind_ordering() {
        assert!(ProgressKind::Flawless > ProgressKind::Completed);
        assert!(ProgressKind::InProgress > ProgressKind::NotPlayed);
    }

    #[test]
    fn test_state_percentage() {
        assert_eq!(ProgressState::InProgress(0.5).percentage(), Some(50.0));
        assert_eq!(ProgressState::Completed(0.25).percentage(), Some(25.0));
        assert_eq!(ProgressState::Flawless.percentage(), None);
        assert_eq!(ProgressState::NotPlayed.percentage(), None);
    }

    #[test]
    fn test_state_serialization() {
        let json = serde_json::to_value(ProgressState::Completed(0.5)).unwrap();
        assert_eq!(json, serde_json::json!({"state": "completed", "value": 0.5}));

        let json = serde_json::to_value(ProgressState::Flawless).unwrap();
        assert_eq!(json, serde_json::json!({"state": "flawless"}));
    }
}
