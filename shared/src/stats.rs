//! Daily and weekly aggregation over the session store
//!
//! Days are UTC calendar dates.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::health_metrics::daily_calorie_target;
use crate::models::{MacroNutrients, MealLog, UserProfile, WorkoutSession};

/// Number of days in the weekly activity window
pub const WEEK_DAYS: u64 = 7;

/// Dashboard numbers for a single day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub workouts: usize,
    pub calories_burned: u32,
    pub calories_consumed: f64,
    pub macros: MacroNutrients,
    pub calorie_target: i64,
    /// target + burned - consumed
    pub calories_remaining: f64,
    pub steps: u32,
    pub step_goal: u32,
}

impl DailySummary {
    /// Fraction of the step goal reached, capped at 1.0
    pub fn step_progress(&self) -> f64 {
        if self.step_goal == 0 {
            return 1.0;
        }
        (self.steps as f64 / self.step_goal as f64).min(1.0)
    }
}

/// Workout totals for one day of the weekly chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyActivity {
    pub date: NaiveDate,
    pub workouts: usize,
    pub duration_minutes: u32,
    pub calories_burned: u32,
}

/// Summarize one day
///
/// `steps` comes from the caller; there is no sensor behind it.
pub fn daily_summary(
    profile: &UserProfile,
    workouts: &[WorkoutSession],
    meals: &[MealLog],
    date: NaiveDate,
    steps: u32,
    step_goal: u32,
) -> DailySummary {
    let activity = activity_on(workouts, date);

    let macros = meals
        .iter()
        .filter(|meal| meal.day() == date)
        .fold(MacroNutrients::default(), |total, meal| total + meal.macros);

    let calorie_target = daily_calorie_target(profile);

    DailySummary {
        date,
        workouts: activity.workouts,
        calories_burned: activity.calories_burned,
        calories_consumed: macros.calories,
        macros,
        calorie_target,
        calories_remaining: calorie_target as f64 + activity.calories_burned as f64
            - macros.calories,
        steps,
        step_goal,
    }
}

/// Workout totals for a single day
pub fn activity_on(workouts: &[WorkoutSession], date: NaiveDate) -> DailyActivity {
    workouts
        .iter()
        .filter(|session| session.day() == date)
        .fold(
            DailyActivity {
                date,
                workouts: 0,
                duration_minutes: 0,
                calories_burned: 0,
            },
            |mut day, session| {
                day.workouts += 1;
                day.duration_minutes += session.duration_minutes;
                day.calories_burned += session.calories_burned;
                day
            },
        )
}

/// The seven days ending `today`, oldest first
pub fn weekly_activity(workouts: &[WorkoutSession], today: NaiveDate) -> Vec<DailyActivity> {
    (0..WEEK_DAYS)
        .rev()
        .filter_map(|offset| today.checked_sub_days(Days::new(offset)))
        .map(|date| activity_on(workouts, date))
        .collect()
}
