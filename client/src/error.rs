//! Client error handling
//!
//! Every generation failure, whether the service was unreachable or answered
//! with something unusable, is an [`AiError`]. Callers treat all variants the
//! same way; the variants only make the logs useful.

use fitcoach_shared::ProfileError;
use thiserror::Error;
use uuid::Uuid;

/// A failed call to the generation service
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AiError {
    #[error("Generation service is not configured: {0}")]
    NotConfigured(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Generation service error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Generation service returned no text")]
    EmptyResponse,

    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for AiError {
    fn from(err: reqwest::Error) -> Self {
        AiError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for AiError {
    fn from(err: serde_json::Error) -> Self {
        AiError::Malformed(err.to_string())
    }
}

/// Food photo analysis failed; nothing was logged
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Could not analyze the photo, please try again")]
pub struct AnalysisError {
    #[source]
    pub cause: AiError,
}

impl From<AiError> for AnalysisError {
    fn from(cause: AiError) -> Self {
        Self { cause }
    }
}

/// Misuse of the workout logging flow
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoggingError {
    #[error("No workout is being logged")]
    NotLogging,

    #[error("A workout is already being logged")]
    AlreadyLogging,

    #[error("Give the workout a name before finishing")]
    MissingName,

    #[error("Add at least one exercise before finishing")]
    NoExercises,

    #[error("Exercise not found: {0}")]
    UnknownExercise(Uuid),
}

/// Top-level application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid profile: {0}")]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    Logging(#[from] LoggingError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("Configuration error: {0}")]
    Config(#[from] anyhow::Error),

    #[error("Complete onboarding first")]
    MissingProfile,
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
