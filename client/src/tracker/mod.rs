//! Workout logging state machine
//!
//! `Idle` while no [`ActiveWorkout`] is held, `Logging` otherwise. A session
//! becomes a [`WorkoutSession`] only on a successful finish; cancel discards
//! it.

pub mod timer;

use chrono::{DateTime, Utc};
use fitcoach_shared::{finished_session_stats, Exercise, WorkoutSession};
use tracing::{debug, info};
use uuid::Uuid;

use crate::ai::WorkoutPlan;
use crate::error::LoggingError;

pub use timer::SessionTimer;

/// The in-progress session
#[derive(Debug)]
pub struct ActiveWorkout {
    pub name: String,
    /// Set when the session came from a generated plan
    pub strategy: Option<String>,
    pub goal: Option<String>,
    pub exercises: Vec<Exercise>,
    pub started_at: DateTime<Utc>,
    timer: SessionTimer,
}

impl ActiveWorkout {
    fn new(name: String, strategy: Option<String>, exercises: Vec<Exercise>) -> Self {
        Self {
            name,
            strategy,
            goal: None,
            exercises,
            started_at: Utc::now(),
            timer: SessionTimer::started(),
        }
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.timer.elapsed_secs()
    }

    pub fn is_timer_running(&self) -> bool {
        self.timer.is_running()
    }

    /// Whole-second elapsed updates for a live clock display
    pub fn elapsed_updates(&self) -> tokio::sync::watch::Receiver<u64> {
        self.timer.subscribe()
    }
}

/// Holds at most one workout being logged
#[derive(Debug, Default)]
pub struct WorkoutTracker {
    active: Option<ActiveWorkout>,
}

impl WorkoutTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_logging(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&ActiveWorkout> {
        self.active.as_ref()
    }

    fn active_mut(&mut self) -> Result<&mut ActiveWorkout, LoggingError> {
        self.active.as_mut().ok_or(LoggingError::NotLogging)
    }

    fn begin(&mut self, workout: ActiveWorkout) -> Result<(), LoggingError> {
        if self.active.is_some() {
            return Err(LoggingError::AlreadyLogging);
        }
        self.active = Some(workout);
        Ok(())
    }

    /// Start an empty session
    pub fn start_manual(&mut self) -> Result<(), LoggingError> {
        self.begin(ActiveWorkout::new(String::new(), None, Vec::new()))?;
        info!("Started manual workout");
        Ok(())
    }

    /// Start a session pre-filled from a plan
    pub fn start_from_plan(&mut self, plan: &WorkoutPlan) -> Result<(), LoggingError> {
        let exercises = plan
            .exercises
            .iter()
            .map(|e| Exercise::new(e.name.clone(), e.sets, e.reps, f64::from(e.weight_suggestion)))
            .collect();

        self.begin(ActiveWorkout::new(
            plan.workout_name.clone(),
            Some(plan.strategy.clone()),
            exercises,
        ))?;
        info!(workout = %plan.workout_name, "Started workout from plan");
        Ok(())
    }

    pub fn add_exercise(&mut self, exercise: Exercise) -> Result<Uuid, LoggingError> {
        let active = self.active_mut()?;
        let id = exercise.id;
        debug!(exercise = %exercise.name, "Added exercise");
        active.exercises.push(exercise);
        Ok(id)
    }

    /// Flip `completed` and return the new value
    pub fn toggle_exercise(&mut self, id: Uuid) -> Result<bool, LoggingError> {
        let exercise = self
            .active_mut()?
            .exercises
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(LoggingError::UnknownExercise(id))?;
        exercise.completed = !exercise.completed;
        Ok(exercise.completed)
    }

    pub fn rename(&mut self, name: impl Into<String>) -> Result<(), LoggingError> {
        self.active_mut()?.name = name.into();
        Ok(())
    }

    /// Set the optional goal text; blank clears it
    pub fn set_goal(&mut self, goal: Option<String>) -> Result<(), LoggingError> {
        self.active_mut()?.goal = goal.filter(|g| !g.trim().is_empty());
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), LoggingError> {
        self.active_mut()?.timer.pause();
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), LoggingError> {
        self.active_mut()?.timer.resume();
        Ok(())
    }

    /// Discard the session
    pub fn cancel(&mut self) -> Result<(), LoggingError> {
        let workout = self.active.take().ok_or(LoggingError::NotLogging)?;
        info!(elapsed_secs = workout.elapsed_secs(), "Cancelled workout");
        Ok(())
    }

    /// Close the session into a [`WorkoutSession`] dated `now`
    ///
    /// Rejected without a name or exercises; the session stays open then.
    pub fn finish(&mut self, now: DateTime<Utc>) -> Result<WorkoutSession, LoggingError> {
        let active = self.active.as_ref().ok_or(LoggingError::NotLogging)?;
        if active.name.trim().is_empty() {
            return Err(LoggingError::MissingName);
        }
        if active.exercises.is_empty() {
            return Err(LoggingError::NoExercises);
        }

        let ActiveWorkout {
            name,
            goal,
            exercises,
            timer,
            ..
        } = self.active.take().ok_or(LoggingError::NotLogging)?;

        let stats = finished_session_stats(timer.stop(), exercises.len());
        info!(
            workout = %name,
            duration_minutes = stats.duration_minutes,
            calories_burned = stats.calories_burned,
            "Finished workout"
        );

        Ok(WorkoutSession {
            id: Uuid::new_v4(),
            date: now,
            name: name.trim().to_string(),
            exercises,
            duration_minutes: stats.duration_minutes,
            calories_burned: stats.calories_burned,
            goal_achieved: goal.as_ref().map(|_| false),
            goal,
        })
    }
}
