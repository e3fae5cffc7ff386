//! Skill rating calculation.

/// Number of best levels averaged into the skill rating
pub const DEFAULT_RATING_TOP_N: usize = 20;

/// Contribution of a cleared level: full difficulty when flawless,
/// otherwise difficulty scaled by accuracy squared.
pub fn skill_contribution(difficulty: f64, x_accuracy: f64) -> f64 {
    if x_accuracy >= 1.0 {
        difficulty
    } else {
        difficulty * x_accuracy * x_accuracy
    }
}

/// Average of the `top_n` largest contributions.
///
/// Always divides by `top_n`, so a player with fewer cleared levels than
/// `top_n` is rated as if the remaining slots were zero.
pub fn skill_rating<I>(contributions: I, top_n: usize) -> f64
where
    I: IntoIterator<Item = f64>,
{
    if top_n == 0 {
        return 0.0;
    }

    let mut values: Vec<f64> = contributions.into_iter().collect();
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(|a, b| b.total_cmp(a));
    values.iter().take(top_n).sum::<f64>() / top_n as f64
}
