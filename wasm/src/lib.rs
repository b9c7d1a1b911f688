//! FitCoach WASM Module
//!
//! Browser bindings for the calculations the dashboard renders: calorie
//! target, BMI, streak and finished-session stats. Dates are UTC.

use chrono::{DateTime, NaiveDate, Utc};
use fitcoach_shared::{
    bmi_reading, classify_bmi, daily_calorie_target as calorie_target, finished_session_stats,
    ActivityLevel, FitnessGoal, Gender, UserProfile,
};
use wasm_bindgen::prelude::*;

/// Daily calorie target in kcal
///
/// `undefined` when `gender` or `activity_level` is not recognised. `goal`
/// is free text; "Lose Weight" and "Build Muscle" adjust the target.
#[wasm_bindgen]
pub fn daily_calorie_target(
    weight_kg: f64,
    height_cm: f64,
    age_years: u32,
    gender: &str,
    activity_level: &str,
    goal: &str,
) -> Option<f64> {
    let profile = UserProfile {
        name: String::new(),
        gender: gender.parse::<Gender>().ok()?,
        age: age_years,
        weight_kg,
        height_cm,
        goal: FitnessGoal::from(goal.to_string()),
        activity_level: activity_level.parse::<ActivityLevel>().ok()?,
        weight_history: Vec::new(),
    };
    Some(calorie_target(&profile) as f64)
}

/// BMI rounded to one decimal, `undefined` for a non-positive height
#[wasm_bindgen]
pub fn bmi(weight_kg: f64, height_cm: f64) -> Option<f64> {
    bmi_reading(weight_kg, height_cm).map(|reading| reading.value)
}

/// Category label ("Underweight", "Healthy", "Overweight", "Obese")
#[wasm_bindgen]
pub fn bmi_category(bmi: f64) -> String {
    classify_bmi(bmi).label().to_string()
}

fn utc_day(timestamp_ms: f64) -> Option<NaiveDate> {
    if !timestamp_ms.is_finite() {
        return None;
    }
    DateTime::<Utc>::from_timestamp_millis(timestamp_ms as i64).map(|dt| dt.date_naive())
}

/// Current workout streak from session timestamps (epoch milliseconds)
#[wasm_bindgen]
pub fn workout_streak(timestamps_ms: &[f64], now_ms: f64) -> u32 {
    let Some(today) = utc_day(now_ms) else {
        return 0;
    };
    fitcoach_shared::workout_streak(timestamps_ms.iter().filter_map(|&ms| utc_day(ms)), today)
}

/// Minutes recorded for a session that ran `elapsed_secs`
#[wasm_bindgen]
pub fn session_duration_minutes(elapsed_secs: u32) -> u32 {
    finished_session_stats(u64::from(elapsed_secs), 0).duration_minutes
}

/// Calories recorded for a finished session
#[wasm_bindgen]
pub fn session_calories(elapsed_secs: u32, exercise_count: u32) -> u32 {
    finished_session_stats(u64::from(elapsed_secs), exercise_count as usize).calories_burned
}
