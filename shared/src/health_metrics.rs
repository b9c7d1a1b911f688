//! Health metrics calculations module
//!
//! Provides calculations for BMI, BMR/TDEE and the daily calorie target based
//! on user profile data.
//!
//! # Design Principles
//!
//! 1. **Pure Functions**: All calculations are pure, no side effects
//! 2. **Never Fail**: Degenerate inputs produce degenerate numbers, not errors
//! 3. **Type Safety**: Profile enums instead of free strings

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::UserProfile;

/// Fixed daily step goal
pub const DAILY_STEP_GOAL: u32 = 10_000;

/// Calorie deficit applied for a weight-loss goal
pub const WEIGHT_LOSS_DEFICIT_KCAL: f64 = 500.0;

/// Calorie surplus applied for a muscle-building goal
pub const MUSCLE_GAIN_SURPLUS_KCAL: f64 = 300.0;

// ============================================================================
// User Profile Types
// ============================================================================

/// Gender as entered at onboarding
///
/// Only `Male` changes the BMR constant; every other value uses the female
/// constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Activity level for TDEE calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ActivityLevel {
    /// Little or no exercise
    Sedentary,
    /// Light exercise 1-3 days/week
    #[default]
    #[serde(rename = "Lightly Active")]
    LightlyActive,
    /// Moderate exercise 3-5 days/week
    #[serde(rename = "Moderately Active")]
    ModeratelyActive,
    /// Hard exercise 6-7 days/week
    #[serde(rename = "Very Active")]
    VeryActive,
}

impl ActivityLevel {
    /// Get the activity multiplier for TDEE calculation
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::LightlyActive => 1.375,
            ActivityLevel::ModeratelyActive => 1.55,
            ActivityLevel::VeryActive => 1.725,
        }
    }

    /// Display label, matching the serialized form
    pub fn label(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "Sedentary",
            ActivityLevel::LightlyActive => "Lightly Active",
            ActivityLevel::ModeratelyActive => "Moderately Active",
            ActivityLevel::VeryActive => "Very Active",
        }
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for ActivityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['_', '-'], " ").as_str() {
            "sedentary" => Ok(ActivityLevel::Sedentary),
            "lightly active" => Ok(ActivityLevel::LightlyActive),
            "moderately active" => Ok(ActivityLevel::ModeratelyActive),
            "very active" => Ok(ActivityLevel::VeryActive),
            _ => Err(format!("Unknown activity level: {}", s)),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        };
        f.write_str(label)
    }
}

impl std::str::FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            "other" => Ok(Gender::Other),
            _ => Err(format!("Unknown gender: {}", s)),
        }
    }
}

/// Fitness goal
///
/// Free text in the profile; two values adjust the calorie target. Stored and
/// serialized as its label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FitnessGoal {
    LoseWeight,
    BuildMuscle,
    Maintain,
    Custom(String),
}

impl FitnessGoal {
    pub fn label(&self) -> &str {
        match self {
            FitnessGoal::LoseWeight => "Lose Weight",
            FitnessGoal::BuildMuscle => "Build Muscle",
            FitnessGoal::Maintain => "Maintain",
            FitnessGoal::Custom(text) => text,
        }
    }

    /// Calories added to TDEE for this goal
    pub fn calorie_adjustment(&self) -> f64 {
        match self {
            FitnessGoal::LoseWeight => -WEIGHT_LOSS_DEFICIT_KCAL,
            FitnessGoal::BuildMuscle => MUSCLE_GAIN_SURPLUS_KCAL,
            FitnessGoal::Maintain | FitnessGoal::Custom(_) => 0.0,
        }
    }
}

impl From<String> for FitnessGoal {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Lose Weight" => FitnessGoal::LoseWeight,
            "Build Muscle" => FitnessGoal::BuildMuscle,
            "Maintain" => FitnessGoal::Maintain,
            _ => FitnessGoal::Custom(value),
        }
    }
}

impl From<&str> for FitnessGoal {
    fn from(value: &str) -> Self {
        FitnessGoal::from(value.to_string())
    }
}

impl From<FitnessGoal> for String {
    fn from(goal: FitnessGoal) -> Self {
        match goal {
            FitnessGoal::Custom(text) => text,
            other => other.label().to_string(),
        }
    }
}

impl fmt::Display for FitnessGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// BMI Calculations
// ============================================================================

/// BMI category classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BmiCategory {
    Underweight,
    Healthy,
    Overweight,
    Obese,
}

impl BmiCategory {
    /// Get the BMI range for this category (closed-open)
    pub fn range(&self) -> (f64, f64) {
        match self {
            BmiCategory::Underweight => (0.0, 18.5),
            BmiCategory::Healthy => (18.5, 25.0),
            BmiCategory::Overweight => (25.0, 30.0),
            BmiCategory::Obese => (30.0, f64::INFINITY),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BmiCategory::Underweight => "Underweight",
            BmiCategory::Healthy => "Healthy",
            BmiCategory::Overweight => "Overweight",
            BmiCategory::Obese => "Obese",
        }
    }
}

/// BMI reading for display
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BmiReading {
    /// BMI rounded to one decimal place
    pub value: f64,
    pub category: BmiCategory,
    /// Healthy weight range in kg for this height
    pub healthy_weight_range_kg: (f64, f64),
}

/// Calculate BMI from weight and height
///
/// Formula: BMI = weight(kg) / height(m)²
pub fn calculate_bmi(weight_kg: f64, height_cm: f64) -> f64 {
    let height_m = height_cm / 100.0;
    weight_kg / (height_m * height_m)
}

/// Classify BMI into category
pub fn classify_bmi(bmi: f64) -> BmiCategory {
    if bmi < 18.5 {
        BmiCategory::Underweight
    } else if bmi < 25.0 {
        BmiCategory::Healthy
    } else if bmi < 30.0 {
        BmiCategory::Overweight
    } else {
        BmiCategory::Obese
    }
}

/// Calculate healthy weight range for a given height
///
/// Based on BMI 18.5-25 (healthy range)
pub fn healthy_weight_range_kg(height_cm: f64) -> (f64, f64) {
    let height_m = height_cm / 100.0;
    let height_m_sq = height_m * height_m;
    (18.5 * height_m_sq, 25.0 * height_m_sq)
}

/// Round to one decimal place
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Calculate the displayed BMI reading
///
/// The category is taken from the rounded value the user sees. Returns `None`
/// for a non-positive height.
pub fn bmi_reading(weight_kg: f64, height_cm: f64) -> Option<BmiReading> {
    if !(height_cm > 0.0) {
        return None;
    }
    let value = round_one_decimal(calculate_bmi(weight_kg, height_cm));
    Some(BmiReading {
        value,
        category: classify_bmi(value),
        healthy_weight_range_kg: healthy_weight_range_kg(height_cm),
    })
}

// ============================================================================
// BMR and TDEE Calculations
// ============================================================================

/// Calculate Basal Metabolic Rate using Mifflin-St Jeor equation
///
/// Men: BMR = 10 × weight(kg) + 6.25 × height(cm) - 5 × age(y) + 5
/// Everyone else: BMR = 10 × weight(kg) + 6.25 × height(cm) - 5 × age(y) - 161
pub fn calculate_bmr_mifflin(weight_kg: f64, height_cm: f64, age_years: u32, gender: Gender) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * age_years as f64;
    match gender {
        Gender::Male => base + 5.0,
        Gender::Female | Gender::Other => base - 161.0,
    }
}

/// Calculate Total Daily Energy Expenditure
///
/// TDEE = BMR × Activity Multiplier
pub fn calculate_tdee(profile: &UserProfile) -> f64 {
    calculate_bmr_mifflin(profile.weight_kg, profile.height_cm, profile.age, profile.gender)
        * profile.activity_level.multiplier()
}

/// Calorie target with breakdown
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalorieBreakdown {
    pub bmr: f64,
    pub tdee: f64,
    pub activity_multiplier: f64,
    /// Applied goal adjustment (-500, +300 or 0)
    pub goal_adjustment: f64,
    /// TDEE plus adjustment, rounded to the nearest kcal
    pub daily_target: i64,
}

/// Calculate the calorie breakdown for a profile
pub fn calorie_breakdown(profile: &UserProfile) -> CalorieBreakdown {
    let bmr = calculate_bmr_mifflin(profile.weight_kg, profile.height_cm, profile.age, profile.gender);
    let activity_multiplier = profile.activity_level.multiplier();
    let tdee = bmr * activity_multiplier;
    let goal_adjustment = profile.goal.calorie_adjustment();

    CalorieBreakdown {
        bmr,
        tdee,
        activity_multiplier,
        goal_adjustment,
        daily_target: (tdee + goal_adjustment).round() as i64,
    }
}

/// Daily calorie target, rounded to the nearest kcal
pub fn daily_calorie_target(profile: &UserProfile) -> i64 {
    calorie_breakdown(profile).daily_target
}
