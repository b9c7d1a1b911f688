//! Structured AI responses
//!
//! The service is asked for JSON matching a schema but does not guarantee
//! it. Every field is required: a missing number is a failure, never zero.

use std::sync::OnceLock;

use fitcoach_shared::validation::validate_macros;
use fitcoach_shared::MacroNutrients;
use regex_lite::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::AiError;

/// Food photo estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodAnalysis {
    pub name: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub description: String,
}

impl FoodAnalysis {
    pub fn macros(&self) -> MacroNutrients {
        MacroNutrients {
            calories: self.calories,
            protein: self.protein,
            carbs: self.carbs,
            fat: self.fat,
        }
    }

    /// Gemini `responseSchema` for food analysis
    pub fn schema() -> Value {
        json!({
            "type": "OBJECT",
            "properties": {
                "name": {"type": "STRING", "description": "Short name of the dish"},
                "calories": {"type": "NUMBER"},
                "protein": {"type": "NUMBER", "description": "grams"},
                "carbs": {"type": "NUMBER", "description": "grams"},
                "fat": {"type": "NUMBER", "description": "grams"},
                "description": {"type": "STRING"}
            },
            "required": ["name", "calories", "protein", "carbs", "fat", "description"]
        })
    }

    fn validate(self) -> Result<Self, AiError> {
        if self.name.trim().is_empty() {
            return Err(AiError::Malformed("food name is empty".to_string()));
        }
        validate_macros(&self.macros()).map_err(AiError::Malformed)?;
        Ok(self)
    }
}

/// An exercise suggested by a generated plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedExercise {
    pub name: String,
    pub sets: u32,
    pub reps: u32,
    /// Kilograms; 0 means bodyweight
    pub weight_suggestion: u32,
}

/// Generated workout plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPlan {
    pub workout_name: String,
    pub strategy: String,
    pub exercises: Vec<PlannedExercise>,
}

impl WorkoutPlan {
    /// Gemini `responseSchema` for plan generation
    pub fn schema() -> Value {
        json!({
            "type": "OBJECT",
            "properties": {
                "workoutName": {"type": "STRING"},
                "strategy": {"type": "STRING", "description": "One or two sentences on the focus of the session"},
                "exercises": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "name": {"type": "STRING"},
                            "sets": {"type": "INTEGER"},
                            "reps": {"type": "INTEGER"},
                            "weightSuggestion": {"type": "INTEGER", "description": "kg, 0 for bodyweight"}
                        },
                        "required": ["name", "sets", "reps", "weightSuggestion"]
                    }
                }
            },
            "required": ["workoutName", "strategy", "exercises"]
        })
    }

    /// Plan used whenever generation fails
    pub fn fallback() -> Self {
        let bodyweight = |name: &str, sets, reps| PlannedExercise {
            name: name.to_string(),
            sets,
            reps,
            weight_suggestion: 0,
        };

        Self {
            workout_name: "Full Body Bodyweight Circuit".to_string(),
            strategy: "A simple full-body circuit you can do anywhere while your coach is offline."
                .to_string(),
            exercises: vec![
                bodyweight("Push-ups", 3, 12),
                bodyweight("Bodyweight Squats", 3, 15),
                bodyweight("Walking Lunges", 3, 10),
            ],
        }
    }

    fn validate(self) -> Result<Self, AiError> {
        if self.workout_name.trim().is_empty() {
            return Err(AiError::Malformed("workout name is empty".to_string()));
        }
        if self.exercises.is_empty() {
            return Err(AiError::Malformed("plan has no exercises".to_string()));
        }
        if self.exercises.iter().any(|e| e.name.trim().is_empty()) {
            return Err(AiError::Malformed("exercise name is empty".to_string()));
        }
        Ok(self)
    }
}

/// Strip a surrounding Markdown code fence, if any
fn strip_code_fence(text: &str) -> &str {
    static FENCE: OnceLock<Option<Regex>> = OnceLock::new();
    let fence = FENCE.get_or_init(|| Regex::new(r"(?s)^\s*```[A-Za-z]*\s*\n(.*?)\n?\s*```\s*$").ok());

    fence
        .as_ref()
        .and_then(|re| re.captures(text))
        .and_then(|caps| caps.get(1))
        .map_or(text.trim(), |m| m.as_str().trim())
}

fn parse_structured<T: DeserializeOwned>(text: &str) -> Result<T, AiError> {
    Ok(serde_json::from_str(strip_code_fence(text))?)
}

/// Parse and validate a food analysis answer
pub fn parse_food_analysis(text: &str) -> Result<FoodAnalysis, AiError> {
    parse_structured::<FoodAnalysis>(text)?.validate()
}

/// Parse and validate a workout plan answer
pub fn parse_workout_plan(text: &str) -> Result<WorkoutPlan, AiError> {
    parse_structured::<WorkoutPlan>(text)?.validate()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const FOOD: &str = r#"{"name": "Oatmeal", "calories": 310, "protein": 11.5, "carbs": 54, "fat": 6, "description": "Oats with banana"}"#;

    #[test]
    fn test_parse_food_analysis() {
        let food = parse_food_analysis(FOOD).unwrap();
        assert_eq!(food.name, "Oatmeal");
        assert_eq!(food.macros().protein, 11.5);
    }

    #[test]
    fn test_parse_fenced_json() {
        let fenced = format!("```json\n{}\n```", FOOD);
        assert_eq!(parse_food_analysis(&fenced).unwrap().calories, 310.0);
    }

    #[rstest]
    #[case::missing_fat(r#"{"name": "Toast", "calories": 80, "protein": 3, "carbs": 15, "description": "x"}"#)]
    #[case::string_number(r#"{"name": "Toast", "calories": "80", "protein": 3, "carbs": 15, "fat": 1, "description": "x"}"#)]
    #[case::negative(r#"{"name": "Toast", "calories": 80, "protein": -3, "carbs": 15, "fat": 1, "description": "x"}"#)]
    #[case::blank_name(r#"{"name": " ", "calories": 80, "protein": 3, "carbs": 15, "fat": 1, "description": "x"}"#)]
    #[case::not_json("Looks like toast to me!")]
    fn test_bad_food_answers_are_malformed(#[case] text: &str) {
        assert!(matches!(parse_food_analysis(text), Err(AiError::Malformed(_))));
    }

    #[test]
    fn test_parse_workout_plan() {
        let plan = parse_workout_plan(
            r#"{"workoutName": "Push Day", "strategy": "Chest focus",
                "exercises": [{"name": "Bench Press", "sets": 4, "reps": 8, "weightSuggestion": 60}]}"#,
        )
        .unwrap();
        assert_eq!(plan.exercises[0].weight_suggestion, 60);
    }

    #[rstest]
    #[case::no_exercises(r#"{"workoutName": "Rest", "strategy": "x", "exercises": []}"#)]
    #[case::missing_weight(r#"{"workoutName": "A", "strategy": "x", "exercises": [{"name": "Row", "sets": 3, "reps": 10}]}"#)]
    #[case::fractional_sets(r#"{"workoutName": "A", "strategy": "x", "exercises": [{"name": "Row", "sets": 2.5, "reps": 10, "weightSuggestion": 0}]}"#)]
    fn test_bad_plans_are_malformed(#[case] text: &str) {
        assert!(matches!(parse_workout_plan(text), Err(AiError::Malformed(_))));
    }

    #[test]
    fn test_fallback_plan() {
        let plan = WorkoutPlan::fallback();
        let names: Vec<_> = plan.exercises.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Push-ups", "Bodyweight Squats", "Walking Lunges"]);
        assert!(plan.exercises.iter().all(|e| e.weight_suggestion == 0));
    }
}
