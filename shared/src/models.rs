//! Domain entities held by the FitCoach client
//!
//! Everything here lives for the process lifetime only. Ids are random v4
//! UUIDs, timestamps are UTC.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};
use uuid::Uuid;
use validator::Validate;

use crate::health_metrics::{ActivityLevel, FitnessGoal, Gender};

/// A dated body-weight measurement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightEntry {
    pub date: NaiveDate,
    pub weight_kg: f64,
}

/// User profile captured at onboarding
///
/// Replaced wholesale on edit; there is no partial update path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub gender: Gender,
    #[validate(range(min = 1, max = 150))]
    pub age: u32,
    #[validate(range(min = 20.0, max = 500.0))]
    pub weight_kg: f64,
    #[validate(range(min = 50.0, max = 300.0))]
    pub height_cm: f64,
    pub goal: FitnessGoal,
    pub activity_level: ActivityLevel,
    /// Oldest first
    #[serde(default)]
    pub weight_history: Vec<WeightEntry>,
}

impl UserProfile {
    /// Weight of the first recorded history entry, if any
    pub fn starting_weight_kg(&self) -> Option<f64> {
        self.weight_history.first().map(|entry| entry.weight_kg)
    }

    /// Kilograms lost since the first history entry (negative when gained)
    pub fn weight_lost_kg(&self) -> Option<f64> {
        self.starting_weight_kg().map(|start| start - self.weight_kg)
    }
}

/// One exercise inside a workout session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: Uuid,
    pub name: String,
    pub sets: u32,
    pub reps: u32,
    /// 0 means bodyweight
    pub weight_kg: f64,
    pub completed: bool,
}

impl Exercise {
    pub fn new(name: impl Into<String>, sets: u32, reps: u32, weight_kg: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            sets,
            reps,
            weight_kg: weight_kg.max(0.0),
            completed: false,
        }
    }

    /// Lifted volume: weight × reps × sets
    pub fn volume_kg(&self) -> f64 {
        self.weight_kg * self.reps as f64 * self.sets as f64
    }
}

/// A finished workout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutSession {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub name: String,
    pub exercises: Vec<Exercise>,
    pub duration_minutes: u32,
    pub calories_burned: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_achieved: Option<bool>,
}

impl WorkoutSession {
    /// Total lifted volume across all exercises
    pub fn volume_kg(&self) -> f64 {
        self.exercises.iter().map(Exercise::volume_kg).sum()
    }

    /// Calendar date of the session (UTC)
    pub fn day(&self) -> NaiveDate {
        self.date.date_naive()
    }
}

/// Macro nutrient estimate
///
/// `calories` is an independent estimate and need not match the energy
/// implied by the three macros.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MacroNutrients {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

impl Add for MacroNutrients {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            calories: self.calories + rhs.calories,
            protein: self.protein + rhs.protein,
            carbs: self.carbs + rhs.carbs,
            fat: self.fat + rhs.fat,
        }
    }
}

impl AddAssign for MacroNutrients {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

/// A logged meal, created from an accepted photo analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealLog {
    pub id: Uuid,
    pub name: String,
    pub timestamp: DateTime<Utc>,
    pub macros: MacroNutrients,
    /// Displayable handle for the photo, stored as given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
}

impl MealLog {
    pub fn day(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}

/// Author of a chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

impl ChatRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Model => "model",
        }
    }
}

/// A single turn of the coaching conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: ChatRole,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn new(role: ChatRole, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(ChatRole::User, text)
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::new(ChatRole::Model, text)
    }
}
