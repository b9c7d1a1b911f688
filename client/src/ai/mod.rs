//! AI orchestration layer
//!
//! The generation service is an external collaborator reached through the
//! [`GenerationService`] trait. [`GeminiClient`] talks to the hosted Gemini
//! API; tests plug in scripted implementations.
//!
//! [`CoachService`] shapes the four requests the app makes (food photo
//! analysis, coaching chat, dashboard insight, workout plan), validates the
//! structured answers and applies the fallback policy:
//!
//! | Operation | On failure |
//! |---|---|
//! | food analysis | `AnalysisError` to the caller |
//! | coaching reply | fixed fallback reply |
//! | dashboard insight | fixed fallback sentence |
//! | workout plan | fixed bodyweight circuit |

pub mod coach;
pub mod gemini;
pub mod prompts;
pub mod structured;

use async_trait::async_trait;
use fitcoach_shared::{ChatMessage, ChatRole};
use serde_json::Value;

use crate::error::AiError;

pub use coach::{ActivitySnapshot, CoachService};
pub use gemini::GeminiClient;
pub use structured::{FoodAnalysis, PlannedExercise, WorkoutPlan};

/// A piece of request content
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    Text(String),
    InlineImage { mime_type: String, data: Vec<u8> },
}

/// A prior conversation turn
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub role: ChatRole,
    pub text: String,
}

impl From<&ChatMessage> for Turn {
    fn from(message: &ChatMessage) -> Self {
        Self {
            role: message.role,
            text: message.text.clone(),
        }
    }
}

/// One call to the generation service
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub model: String,
    /// Content of the current user turn
    pub parts: Vec<Part>,
    /// When set, the answer text must be a JSON document matching it
    pub response_schema: Option<Value>,
    pub system_instruction: Option<String>,
    /// Turns preceding `parts`, oldest first
    pub history: Vec<Turn>,
}

impl GenerationRequest {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            parts: Vec::new(),
            response_schema: None,
            system_instruction: None,
            history: Vec::new(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.parts.push(Part::Text(text.into()));
        self
    }

    pub fn with_image(mut self, mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        self.parts.push(Part::InlineImage {
            mime_type: mime_type.into(),
            data,
        });
        self
    }

    pub fn with_schema(mut self, schema: Value) -> Self {
        self.response_schema = Some(schema);
        self
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    pub fn with_history(mut self, history: Vec<Turn>) -> Self {
        self.history = history;
        self
    }
}

/// The service's answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResponse {
    pub text: String,
}

/// Text/vision generation backend
///
/// Implementations report every failure, transport or otherwise, as an
/// [`AiError`]. Conformance to `response_schema` is not guaranteed by the
/// service; callers validate.
#[async_trait]
pub trait GenerationService: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, AiError>;
}
