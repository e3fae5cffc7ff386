use tracing::debug;

use super::{LevelProgress, ProgressState, SaveData, skill_contribution};
use crate::fingerprint::Fingerprint;

/// Classify a level from its save data entries.
///
/// Decision order (first match wins):
/// 1. no completion value -> NotPlayed
/// 2. completion < 1 -> InProgress(completion)
/// 3. accuracy >= 1 -> Flawless, contributing the full difficulty
/// 4. otherwise -> Completed(accuracy), contributing difficulty * accuracy²
///
/// A cleared level without an accuracy value is treated as accuracy 0.
pub fn resolve(fingerprint: &Fingerprint, save: &SaveData, difficulty: f64) -> LevelProgress {
    let Some(completion) = save.completion(fingerprint) else {
        return LevelProgress::not_played();
    };

    if completion < 1.0 {
        return LevelProgress {
            state: ProgressState::InProgress(completion),
            contribution: 0.0,
        };
    }

    let x_accuracy = save.x_accuracy(fingerprint).unwrap_or_else(|| {
        debug!("Cleared level {} has no accuracy value", fingerprint);
        0.0
    });

    let state = if x_accuracy >= 1.0 {
        ProgressState::Flawless
    } else {
        ProgressState::Completed(x_accuracy)
    };

    LevelProgress {
        state,
        contribution: skill_contribution(difficulty, x_accuracy),
    }
}
