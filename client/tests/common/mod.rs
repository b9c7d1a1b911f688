//! Common test utilities for integration tests
//!
//! `TestApp` wires an `AppState` to a scripted in-process generation
//! service, so the full orchestration runs without network access.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use fitcoach_client::ai::{CoachService, GenerationRequest, GenerationResponse, GenerationService};
use fitcoach_client::error::AiError;
use fitcoach_client::AppState;
use fitcoach_shared::{ActivityLevel, FitnessGoal, Gender, UserProfile};

/// Replays queued answers in order; an empty queue answers with a transport error
#[derive(Default)]
pub struct ScriptedGenerator {
    answers: Mutex<VecDeque<Result<String, AiError>>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedGenerator {
    pub fn reply(&self, text: &str) {
        self.answers.lock().unwrap().push_back(Ok(text.to_string()));
    }

    pub fn fail(&self, error: AiError) {
        self.answers.lock().unwrap().push_back(Err(error));
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationService for ScriptedGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, AiError> {
        self.requests.lock().unwrap().push(request);
        let answer = self
            .answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AiError::Transport("connection refused".to_string())));
        answer.map(|text| GenerationResponse { text })
    }
}

/// Test application wrapper
pub struct TestApp {
    pub state: AppState,
    pub generator: Arc<ScriptedGenerator>,
}

impl TestApp {
    /// App without a profile
    pub fn new() -> Self {
        let generator = Arc::new(ScriptedGenerator::default());
        let coach = CoachService::new(generator.clone(), "gemini-2.5-flash");
        Self {
            state: AppState::new(coach, 10_000),
            generator,
        }
    }

    /// App that finished onboarding on `today()`
    pub fn onboarded() -> Self {
        let mut app = Self::new();
        app.state
            .complete_onboarding(test_profile(), today())
            .expect("valid test profile");
        app
    }
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
}

pub fn test_profile() -> UserProfile {
    UserProfile {
        name: "Alex".to_string(),
        gender: Gender::Male,
        age: 30,
        weight_kg: 80.0,
        height_cm: 180.0,
        goal: FitnessGoal::LoseWeight,
        activity_level: ActivityLevel::Sedentary,
        weight_history: vec![],
    }
}

pub const SALAD_JSON: &str = r#"{"name": "Chicken Salad", "calories": 420, "protein": 35, "carbs": 12, "fat": 24, "description": "Grilled chicken over greens"}"#;
