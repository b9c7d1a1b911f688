//! Input validation functions
//!
//! This module provides validation utilities for user input.
//! Uses both custom validators and the `validator` crate for derive macros.

use validator::Validate;

use crate::errors::ProfileError;
use crate::models::{MacroNutrients, UserProfile, WeightEntry};

/// Validate weight value (in kg)
pub fn validate_weight(weight_kg: f64) -> Result<(), String> {
    if weight_kg.is_nan() || weight_kg.is_infinite() {
        return Err("Weight must be a valid number".to_string());
    }
    if weight_kg < 20.0 {
        return Err("Weight must be at least 20 kg".to_string());
    }
    if weight_kg > 500.0 {
        return Err("Weight must be at most 500 kg".to_string());
    }
    Ok(())
}

/// Validate height value (in cm)
/// Valid range: 50-300 cm
pub fn validate_height_cm(height_cm: f64) -> Result<(), String> {
    if height_cm.is_nan() || height_cm.is_infinite() {
        return Err("Height must be a valid number".to_string());
    }
    if height_cm < 50.0 {
        return Err("Height must be at least 50 cm".to_string());
    }
    if height_cm > 300.0 {
        return Err("Height must be at most 300 cm".to_string());
    }
    Ok(())
}

/// Validate age in years
pub fn validate_age(age: u32) -> Result<(), String> {
    if age < 1 {
        return Err("Age must be at least 1 year".to_string());
    }
    if age > 150 {
        return Err("Age cannot exceed 150 years".to_string());
    }
    Ok(())
}

/// Validate that history weights are positive and dates never go backwards
pub fn validate_weight_history(history: &[WeightEntry]) -> Result<(), ProfileError> {
    for entry in history {
        if !(entry.weight_kg > 0.0) || entry.weight_kg.is_infinite() {
            return Err(ProfileError::NonPositiveWeight { date: entry.date });
        }
    }
    if let Some(pair) = history.windows(2).find(|pair| pair[1].date < pair[0].date) {
        return Err(ProfileError::UnorderedHistory { date: pair[1].date });
    }
    Ok(())
}

/// Validate a macro estimate: every field finite and non-negative
pub fn validate_macros(macros: &MacroNutrients) -> Result<(), String> {
    let fields = [
        ("calories", macros.calories),
        ("protein", macros.protein),
        ("carbs", macros.carbs),
        ("fat", macros.fat),
    ];
    for (name, value) in fields {
        if !value.is_finite() {
            return Err(format!("{} must be a valid number", name));
        }
        if value < 0.0 {
            return Err(format!("{} cannot be negative", name));
        }
    }
    Ok(())
}

/// Validate a complete profile before it replaces the held one
pub fn validate_profile(profile: &UserProfile) -> Result<(), ProfileError> {
    if profile.name.trim().is_empty() {
        return Err(ProfileError::invalid(
            get_field_display_label("name"),
            "cannot be empty",
        ));
    }

    if let Err(errors) = profile.validate() {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));
        if let Some((field, field_errors)) = fields.into_iter().next() {
            let message = field_errors
                .first()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("failed {} check", e.code))
                })
                .unwrap_or_else(|| "is invalid".to_string());
            return Err(ProfileError::invalid(get_field_display_label(&field), message));
        }
    }

    validate_age(profile.age).map_err(|m| ProfileError::invalid(get_field_display_label("age"), m))?;
    validate_weight(profile.weight_kg)
        .map_err(|m| ProfileError::invalid(get_field_display_label("weight_kg"), m))?;
    validate_height_cm(profile.height_cm)
        .map_err(|m| ProfileError::invalid(get_field_display_label("height_cm"), m))?;
    validate_weight_history(&profile.weight_history)
}

// ============================================================================
// User-Friendly Field Labels
// ============================================================================

/// Map technical field names to user-friendly display labels
pub fn get_field_display_label(field_name: &str) -> &str {
    match field_name {
        "name" => "Name",
        "age" => "Age",
        "weight" | "weight_kg" => "Current Weight",
        "height" | "height_cm" => "Height",
        "gender" => "Gender",
        "goal" => "Goal",
        "activity_level" => "Activity Level",
        "weight_history" => "Weight History",
        _ => field_name,
    }
}
