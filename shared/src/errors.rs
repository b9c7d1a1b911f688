//! Error types for the FitCoach domain

use chrono::NaiveDate;
use thiserror::Error;

/// Profile validation failures
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProfileError {
    #[error("{field}: {message}")]
    InvalidField { field: String, message: String },

    #[error("Weight history is not chronological at {date}")]
    UnorderedHistory { date: NaiveDate },

    #[error("Weight history entry on {date} must be positive")]
    NonPositiveWeight { date: NaiveDate },
}

impl ProfileError {
    pub fn invalid(field: &str, message: impl Into<String>) -> Self {
        ProfileError::InvalidField {
            field: field.to_string(),
            message: message.into(),
        }
    }
}
