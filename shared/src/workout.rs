//! Derived stats for a finished workout session
//!
//! The calorie figure is a flat heuristic (5 kcal per minute plus 20 kcal per
//! exercise), not a physiological estimate.

use serde::{Deserialize, Serialize};

/// Calories credited per minute of session time
pub const CALORIES_PER_MINUTE: u32 = 5;

/// Calories credited per exercise in the session
pub const CALORIES_PER_EXERCISE: u32 = 20;

/// Duration and calories computed when a session is finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub duration_minutes: u32,
    pub calories_burned: u32,
}

/// Whole minutes, rounded up, never below 1
pub fn session_duration_minutes(elapsed_secs: u64) -> u32 {
    let minutes = elapsed_secs.div_ceil(60).max(1);
    u32::try_from(minutes).unwrap_or(u32::MAX)
}

/// floor(duration × 5 + exercises × 20)
pub fn session_calories(duration_minutes: u32, exercise_count: usize) -> u32 {
    let exercises = u32::try_from(exercise_count).unwrap_or(u32::MAX);
    duration_minutes
        .saturating_mul(CALORIES_PER_MINUTE)
        .saturating_add(exercises.saturating_mul(CALORIES_PER_EXERCISE))
}

/// Stats for a session that ran `elapsed_secs` with `exercise_count` exercises
pub fn finished_session_stats(elapsed_secs: u64, exercise_count: usize) -> SessionStats {
    let duration_minutes = session_duration_minutes(elapsed_secs);
    SessionStats {
        duration_minutes,
        calories_burned: session_calories(duration_minutes, exercise_count),
    }
}
