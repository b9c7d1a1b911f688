//! Application state
//!
//! [`AppState`] owns everything the client holds for the process lifetime:
//! the profile, the session store, the coaching conversation and the
//! workout being logged. Its methods are the only write path.

use chrono::{DateTime, NaiveDate, Utc};
use fitcoach_shared::validation::validate_profile;
use fitcoach_shared::{
    bmi_reading, calorie_breakdown, daily_summary, evaluate_badges, session_streak, weekly_activity,
    BadgeContext, BadgeStatus, BmiReading, CalorieBreakdown, ChatMessage, DailyActivity,
    DailySummary, MealLog, ProfileError, UserProfile, WeightEntry, WorkoutSession,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::ai::{ActivitySnapshot, CoachService, FoodAnalysis, WorkoutPlan};
use crate::config::AppConfig;
use crate::error::{AnalysisError, AppError, AppResult, LoggingError};
use crate::store::SessionStore;
use crate::telemetry::{MEALS_LOGGED_TOTAL, WORKOUTS_FINISHED_TOTAL};
use crate::tracker::WorkoutTracker;

/// Today's UTC calendar date
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

pub struct AppState {
    profile: Option<UserProfile>,
    store: SessionStore,
    chat: Vec<ChatMessage>,
    tracker: WorkoutTracker,
    coach: CoachService,
    step_goal: u32,
}

impl AppState {
    pub fn new(coach: CoachService, step_goal: u32) -> Self {
        Self {
            profile: None,
            store: SessionStore::new(),
            chat: Vec::new(),
            tracker: WorkoutTracker::new(),
            coach,
            step_goal,
        }
    }

    /// State backed by the configured Gemini model
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let coach = CoachService::from_config(&config.ai).map_err(anyhow::Error::from)?;
        Ok(Self::new(coach, config.goals.daily_step_goal))
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    fn require_profile(&self) -> AppResult<&UserProfile> {
        self.profile.as_ref().ok_or(AppError::MissingProfile)
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    pub fn chat(&self) -> &[ChatMessage] {
        &self.chat
    }

    pub fn tracker(&self) -> &WorkoutTracker {
        &self.tracker
    }

    /// In-session edits go straight to the tracker
    pub fn tracker_mut(&mut self) -> &mut WorkoutTracker {
        &mut self.tracker
    }

    pub fn step_goal(&self) -> u32 {
        self.step_goal
    }

    // ------------------------------------------------------------------
    // Profile
    // ------------------------------------------------------------------

    /// Accept the onboarding profile
    ///
    /// An empty weight history is seeded with the current weight on `today`.
    pub fn complete_onboarding(&mut self, mut profile: UserProfile, today: NaiveDate) -> AppResult<()> {
        if profile.weight_history.is_empty() {
            profile.weight_history.push(WeightEntry {
                date: today,
                weight_kg: profile.weight_kg,
            });
        }
        self.update_profile(profile)?;
        info!("Onboarding complete");
        Ok(())
    }

    /// Replace the profile wholesale
    pub fn update_profile(&mut self, profile: UserProfile) -> AppResult<()> {
        validate_profile(&profile)?;
        self.profile = Some(profile);
        Ok(())
    }

    /// Log a weigh-in: updates the current weight and appends to the history
    ///
    /// Entries are never rewritten, so the first one stays the starting
    /// weight even when later weigh-ins share its date.
    pub fn record_weight(&mut self, date: NaiveDate, weight_kg: f64) -> AppResult<()> {
        let mut profile = self.require_profile()?.clone();

        if let Some(last) = profile.weight_history.last() {
            if date < last.date {
                return Err(ProfileError::UnorderedHistory { date }.into());
            }
        }
        profile.weight_history.push(WeightEntry { date, weight_kg });
        profile.weight_kg = weight_kg;

        self.update_profile(profile)?;
        info!(%date, weight_kg, "Recorded weight");
        Ok(())
    }

    // ------------------------------------------------------------------
    // Workouts
    // ------------------------------------------------------------------

    pub fn start_workout(&mut self) -> AppResult<()> {
        Ok(self.tracker.start_manual()?)
    }

    /// Start a session from a generated plan (or the fallback plan)
    pub async fn start_generated_workout(&mut self) -> AppResult<WorkoutPlan> {
        if self.tracker.is_logging() {
            return Err(LoggingError::AlreadyLogging.into());
        }
        let profile = self.profile.as_ref().ok_or(AppError::MissingProfile)?;
        let plan = self.coach.workout_plan(profile, self.store.workouts()).await;
        self.tracker.start_from_plan(&plan)?;
        Ok(plan)
    }

    /// Finish the session and store it
    pub fn finish_workout(&mut self, now: DateTime<Utc>) -> AppResult<WorkoutSession> {
        let session = self.tracker.finish(now)?;
        self.store.add_workout(session.clone());
        metrics::counter!(WORKOUTS_FINISHED_TOTAL).increment(1);
        Ok(session)
    }

    pub fn cancel_workout(&mut self) -> AppResult<()> {
        Ok(self.tracker.cancel()?)
    }

    /// Mark a stored workout's goal as achieved or not
    ///
    /// Returns `false` when no workout has that id.
    pub fn set_goal_achieved(&mut self, id: Uuid, achieved: bool) -> bool {
        let Some(mut workout) = self.store.workout(id).cloned() else {
            return false;
        };
        workout.goal_achieved = Some(achieved);
        self.store.update_workout(workout)
    }

    // ------------------------------------------------------------------
    // Meals
    // ------------------------------------------------------------------

    /// Analyze a food photo without logging anything
    pub async fn analyze_meal(&self, image: &[u8], mime_type: &str) -> Result<FoodAnalysis, AnalysisError> {
        self.coach.analyze_food_image(image, mime_type).await
    }

    /// Commit an accepted analysis as a meal
    pub fn accept_meal(
        &mut self,
        analysis: &FoodAnalysis,
        image_ref: Option<String>,
        now: DateTime<Utc>,
    ) -> MealLog {
        let meal = MealLog {
            id: Uuid::new_v4(),
            name: analysis.name.clone(),
            timestamp: now,
            macros: analysis.macros(),
            image_ref,
        };
        self.store.add_meal(meal.clone());
        metrics::counter!(MEALS_LOGGED_TOTAL).increment(1);
        info!(meal = %meal.name, calories = meal.macros.calories, "Logged meal");
        meal
    }

    /// Analyze and, only on success, log the meal
    #[instrument(skip(self, image, image_ref))]
    pub async fn log_meal_from_photo(
        &mut self,
        image: &[u8],
        mime_type: &str,
        image_ref: Option<String>,
    ) -> AppResult<MealLog> {
        let analysis = self.analyze_meal(image, mime_type).await?;
        Ok(self.accept_meal(&analysis, image_ref, Utc::now()))
    }

    // ------------------------------------------------------------------
    // Coaching
    // ------------------------------------------------------------------

    /// Send a chat message and append the coach's reply
    ///
    /// The reply is the fallback text when the service fails. Replies are
    /// appended as they resolve.
    pub async fn send_chat_message(&mut self, text: impl Into<String>) -> AppResult<Option<ChatMessage>> {
        let profile = self.profile.as_ref().ok_or(AppError::MissingProfile)?;
        self.chat.push(ChatMessage::user(text));

        let reply = self
            .coach
            .coaching_reply(&self.chat, profile, self.store.workouts())
            .await
            .map(ChatMessage::model);

        if let Some(message) = &reply {
            self.chat.push(message.clone());
        }
        Ok(reply)
    }

    /// One-sentence insight for today's dashboard
    pub async fn dashboard_insight(&self, steps: u32) -> AppResult<String> {
        let profile = self.require_profile()?;
        let summary = self.daily_summary(today(), steps)?;
        let snapshot = ActivitySnapshot {
            calories_burned: summary.calories_burned,
            calories_consumed: summary.calories_consumed,
            steps,
        };
        Ok(self.coach.dashboard_insight(profile, &snapshot).await)
    }

    // ------------------------------------------------------------------
    // Derived views
    // ------------------------------------------------------------------

    pub fn daily_summary(&self, date: NaiveDate, steps: u32) -> AppResult<DailySummary> {
        let profile = self.require_profile()?;
        Ok(daily_summary(
            profile,
            self.store.workouts(),
            self.store.meals(),
            date,
            steps,
            self.step_goal,
        ))
    }

    pub fn weekly_activity(&self, today: NaiveDate) -> Vec<DailyActivity> {
        weekly_activity(self.store.workouts(), today)
    }

    pub fn streak(&self, today: NaiveDate) -> u32 {
        session_streak(self.store.workouts(), today)
    }

    pub fn badges(&self, today: NaiveDate) -> AppResult<Vec<BadgeStatus>> {
        let ctx = BadgeContext {
            profile: self.require_profile()?,
            workouts: self.store.workouts(),
            today,
        };
        Ok(evaluate_badges(&ctx))
    }

    /// `None` without a profile or with a non-positive height
    pub fn bmi(&self) -> Option<BmiReading> {
        self.profile
            .as_ref()
            .and_then(|p| bmi_reading(p.weight_kg, p.height_cm))
    }

    pub fn calorie_breakdown(&self) -> AppResult<CalorieBreakdown> {
        Ok(calorie_breakdown(self.require_profile()?))
    }
}
