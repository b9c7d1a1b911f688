//! AI coach orchestration
//!
//! Each operation has a `try_` form returning the raw outcome and, where a
//! fallback exists, a plain form that substitutes it. Food analysis has no
//! fallback.

use std::sync::Arc;

use fitcoach_shared::{ChatMessage, ChatRole, UserProfile, WorkoutSession};
use tracing::{debug, instrument, warn};

use super::prompts;
use super::structured::{parse_food_analysis, parse_workout_plan, FoodAnalysis, WorkoutPlan};
use super::{GeminiClient, GenerationRequest, GenerationService, Turn};
use crate::config::AiConfig;
use crate::error::{AiError, AnalysisError};
use crate::telemetry::{outcome, record_ai_request};

pub const FALLBACK_COACH_REPLY: &str =
    "I'm having trouble connecting right now. Please try again in a moment.";

pub const FALLBACK_INSIGHT: &str = "Every step counts. Keep moving toward your goal today!";

const FOOD_ANALYSIS: &str = "food_analysis";
const COACHING_REPLY: &str = "coaching_reply";
const DASHBOARD_INSIGHT: &str = "dashboard_insight";
const WORKOUT_PLAN: &str = "workout_plan";

/// Today's numbers for the dashboard insight
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ActivitySnapshot {
    pub calories_burned: u32,
    pub calories_consumed: f64,
    pub steps: u32,
}

/// Shapes requests for the generation service and applies fallbacks
#[derive(Clone)]
pub struct CoachService {
    generator: Arc<dyn GenerationService>,
    model: String,
}

impl CoachService {
    pub fn new(generator: Arc<dyn GenerationService>, model: impl Into<String>) -> Self {
        Self {
            generator,
            model: model.into(),
        }
    }

    /// Coach backed by the Gemini API
    pub fn from_config(config: &AiConfig) -> Result<Self, AiError> {
        let client = GeminiClient::from_config(config)?;
        Ok(Self::new(Arc::new(client), config.model.clone()))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request(&self) -> GenerationRequest {
        GenerationRequest::new(self.model.clone())
    }

    /// Log and count a fallback substitution
    fn fall_back(operation: &'static str, err: &AiError) {
        warn!(operation, error = %err, "AI call failed, using fallback");
        record_ai_request(operation, outcome::FALLBACK);
    }

    /// Estimate name and macros of the food in a photo
    #[instrument(skip(self, image), fields(bytes = image.len()))]
    pub async fn analyze_food_image(
        &self,
        image: &[u8],
        mime_type: &str,
    ) -> Result<FoodAnalysis, AnalysisError> {
        debug!(operation = FOOD_ANALYSIS, "Requesting food analysis");
        let request = self
            .request()
            .with_image(mime_type, image.to_vec())
            .with_text(prompts::FOOD_ANALYSIS_PROMPT)
            .with_schema(FoodAnalysis::schema());

        let result = match self.generator.generate(request).await {
            Ok(response) => parse_food_analysis(&response.text),
            Err(err) => Err(err),
        };

        match result {
            Ok(analysis) => {
                record_ai_request(FOOD_ANALYSIS, outcome::SUCCESS);
                Ok(analysis)
            }
            Err(err) => {
                warn!(operation = FOOD_ANALYSIS, error = %err, "Food analysis failed");
                record_ai_request(FOOD_ANALYSIS, outcome::ERROR);
                Err(err.into())
            }
        }
    }

    /// Coaching reply to the latest user turn
    ///
    /// `Ok(None)` when the last history entry is not from the user; no call
    /// is made in that case.
    #[instrument(skip_all, fields(turns = history.len()))]
    pub async fn try_coaching_reply(
        &self,
        history: &[ChatMessage],
        profile: &UserProfile,
        workouts: &[WorkoutSession],
    ) -> Result<Option<String>, AiError> {
        let Some((last, earlier)) = history.split_last() else {
            return Ok(None);
        };
        if last.role != ChatRole::User {
            return Ok(None);
        }

        debug!(operation = COACHING_REPLY, "Requesting coaching reply");
        let request = self
            .request()
            .with_history(earlier.iter().map(Turn::from).collect())
            .with_system_instruction(prompts::coaching_context(profile, workouts))
            .with_text(last.text.clone());

        let response = self.generator.generate(request).await?;
        Ok(Some(response.text.trim().to_string()))
    }

    /// Coaching reply, or the fixed fallback reply on failure
    pub async fn coaching_reply(
        &self,
        history: &[ChatMessage],
        profile: &UserProfile,
        workouts: &[WorkoutSession],
    ) -> Option<String> {
        match self.try_coaching_reply(history, profile, workouts).await {
            Ok(Some(reply)) => {
                record_ai_request(COACHING_REPLY, outcome::SUCCESS);
                Some(reply)
            }
            Ok(None) => None,
            Err(err) => {
                Self::fall_back(COACHING_REPLY, &err);
                Some(FALLBACK_COACH_REPLY.to_string())
            }
        }
    }

    /// One motivating sentence for the dashboard
    #[instrument(skip_all)]
    pub async fn try_dashboard_insight(
        &self,
        profile: &UserProfile,
        snapshot: &ActivitySnapshot,
    ) -> Result<String, AiError> {
        debug!(operation = DASHBOARD_INSIGHT, "Requesting dashboard insight");
        let request = self.request().with_text(prompts::dashboard_insight_prompt(
            profile,
            snapshot.calories_burned,
            snapshot.calories_consumed,
            snapshot.steps,
        ));

        let response = self.generator.generate(request).await?;
        Ok(response.text.trim().to_string())
    }

    pub async fn dashboard_insight(&self, profile: &UserProfile, snapshot: &ActivitySnapshot) -> String {
        match self.try_dashboard_insight(profile, snapshot).await {
            Ok(insight) => {
                record_ai_request(DASHBOARD_INSIGHT, outcome::SUCCESS);
                insight
            }
            Err(err) => {
                Self::fall_back(DASHBOARD_INSIGHT, &err);
                FALLBACK_INSIGHT.to_string()
            }
        }
    }

    /// Generate the next workout from the profile and recent sessions
    #[instrument(skip_all, fields(recent = workouts.len()))]
    pub async fn try_workout_plan(
        &self,
        profile: &UserProfile,
        workouts: &[WorkoutSession],
    ) -> Result<WorkoutPlan, AiError> {
        debug!(operation = WORKOUT_PLAN, "Requesting workout plan");
        let request = self
            .request()
            .with_text(prompts::workout_plan_prompt(profile, workouts))
            .with_schema(WorkoutPlan::schema());

        let response = self.generator.generate(request).await?;
        parse_workout_plan(&response.text)
    }

    /// Generated plan, or [`WorkoutPlan::fallback`] on failure
    pub async fn workout_plan(&self, profile: &UserProfile, workouts: &[WorkoutSession]) -> WorkoutPlan {
        match self.try_workout_plan(profile, workouts).await {
            Ok(plan) => {
                record_ai_request(WORKOUT_PLAN, outcome::SUCCESS);
                plan
            }
            Err(err) => {
                Self::fall_back(WORKOUT_PLAN, &err);
                WorkoutPlan::fallback()
            }
        }
    }
}
