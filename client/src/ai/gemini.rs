//! # Gemini Client
//!
//! [`GenerationService`] implementation for Google's Generative Language API
//! (`models/{model}:generateContent`).
//!
//! ## Configuration
//!
//! The API key comes from `ai.api_key` or the `GEMINI_API_KEY` environment
//! variable. Without a key every call fails with
//! [`AiError::NotConfigured`], which the orchestration layer turns into its
//! usual fallbacks.

use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use super::{GenerationRequest, GenerationResponse, GenerationService, Part, Turn};
use crate::config::AiConfig;
use crate::error::AiError;
use fitcoach_shared::ChatRole;

/// Header carrying the API key
const API_KEY_HEADER: &str = "x-goog-api-key";

// ============================================================================
// API Request/Response Types
// ============================================================================

/// Gemini API request structure
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

/// Content structure for Gemini API
#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<ContentPart>,
}

/// Part of content (text or inline image)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum ContentPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    /// Anything else the model may emit (thoughts, function calls)
    Other(serde_json::Value),
}

/// Base64 image payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

/// Structured output configuration
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: serde_json::Value,
}

/// Gemini API response structure
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<GeminiError>,
}

/// Response candidate
#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<GeminiContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

/// API error response from Gemini
#[derive(Debug, Deserialize)]
struct GeminiError {
    message: String,
}

// ============================================================================
// Client Implementation
// ============================================================================

/// Google Gemini generation client
pub struct GeminiClient {
    api_key: Option<SecretString>,
    client: Client,
    base_url: String,
}

impl GeminiClient {
    /// Create a client from configuration
    pub fn from_config(config: &AiConfig) -> Result<Self, AiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            api_key: config.api_key.clone(),
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build the API URL for a model
    fn build_url(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }

    /// Gemini names the assistant role "model"
    fn convert_role(role: ChatRole) -> &'static str {
        match role {
            ChatRole::User => "user",
            ChatRole::Model => "model",
        }
    }

    fn convert_part(part: &Part) -> ContentPart {
        match part {
            Part::Text(text) => ContentPart::Text { text: text.clone() },
            Part::InlineImage { mime_type, data } => ContentPart::InlineData {
                inline_data: InlineData {
                    mime_type: mime_type.clone(),
                    data: BASE64.encode(data),
                },
            },
        }
    }

    /// Convert history to Gemini contents
    ///
    /// Conversations must open with a user turn, so leading model turns
    /// (e.g. a canned greeting) are dropped.
    fn convert_history(history: &[Turn]) -> Vec<GeminiContent> {
        history
            .iter()
            .skip_while(|turn| turn.role == ChatRole::Model)
            .map(|turn| GeminiContent {
                role: Some(Self::convert_role(turn.role).to_string()),
                parts: vec![ContentPart::Text {
                    text: turn.text.clone(),
                }],
            })
            .collect()
    }

    /// Build a Gemini API request from a `GenerationRequest`
    fn build_gemini_request(request: &GenerationRequest) -> GeminiRequest {
        let mut contents = Self::convert_history(&request.history);
        contents.push(GeminiContent {
            role: Some("user".to_string()),
            parts: request.parts.iter().map(Self::convert_part).collect(),
        });

        GeminiRequest {
            contents,
            system_instruction: request.system_instruction.as_ref().map(|text| GeminiContent {
                role: None,
                parts: vec![ContentPart::Text { text: text.clone() }],
            }),
            generation_config: request.response_schema.as_ref().map(|schema| GenerationConfig {
                response_mime_type: "application/json",
                response_schema: schema.clone(),
            }),
        }
    }

    /// Concatenate the text parts of the first candidate
    fn extract_text(response: &GeminiResponse) -> Result<String, AiError> {
        let candidate = response
            .candidates
            .as_ref()
            .and_then(|c| c.first())
            .ok_or(AiError::EmptyResponse)?;

        let text: String = candidate
            .content
            .as_ref()
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| match part {
                        ContentPart::Text { text } => Some(text.as_str()),
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            debug!(finish_reason = ?candidate.finish_reason, "Candidate carried no text");
            return Err(AiError::EmptyResponse);
        }
        Ok(text)
    }

    /// Map API error status to an error, preferring Gemini's own message
    fn map_api_error(status: u16, response_text: &str) -> AiError {
        let message = serde_json::from_str::<GeminiResponse>(response_text)
            .ok()
            .and_then(|r| r.error)
            .map_or_else(|| response_text.to_string(), |e| e.message);
        AiError::Api { status, message }
    }
}

#[async_trait]
impl GenerationService for GeminiClient {
    #[instrument(skip(self, request), fields(model = %request.model))]
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, AiError> {
        let api_key = self
            .api_key
            .as_ref()
            .ok_or_else(|| AiError::NotConfigured("no Gemini API key".to_string()))?;

        let url = self.build_url(&request.model);
        let gemini_request = Self::build_gemini_request(&request);

        debug!(
            structured = request.response_schema.is_some(),
            history = request.history.len(),
            "Sending request to Gemini API"
        );

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, api_key.expose_secret().as_str())
            .json(&gemini_request)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            error!(status = %status, "Gemini API error");
            return Err(Self::map_api_error(status.as_u16(), &response_text));
        }

        let gemini_response: GeminiResponse = serde_json::from_str(&response_text)?;

        if let Some(error) = gemini_response.error {
            return Err(AiError::Api {
                status: status.as_u16(),
                message: error.message,
            });
        }

        let text = Self::extract_text(&gemini_response)?;
        debug!("Received response from Gemini");
        Ok(GenerationResponse { text })
    }
}
