//! In-memory session store
//!
//! Newest entries first. Nothing is persisted; there are no deletes.

use fitcoach_shared::{MealLog, WorkoutSession};
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    workouts: Vec<WorkoutSession>,
    meals: Vec<MealLog>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend a finished workout
    pub fn add_workout(&mut self, workout: WorkoutSession) {
        debug!(workout_id = %workout.id, "Storing workout");
        self.workouts.insert(0, workout);
    }

    /// Replace the workout with the same id in place
    ///
    /// Returns `false` and changes nothing when no workout has that id.
    pub fn update_workout(&mut self, workout: WorkoutSession) -> bool {
        match self.workouts.iter_mut().find(|w| w.id == workout.id) {
            Some(slot) => {
                *slot = workout;
                true
            }
            None => {
                debug!(workout_id = %workout.id, "Update for unknown workout ignored");
                false
            }
        }
    }

    pub fn workout(&self, id: Uuid) -> Option<&WorkoutSession> {
        self.workouts.iter().find(|w| w.id == id)
    }

    /// Prepend a meal
    pub fn add_meal(&mut self, meal: MealLog) {
        debug!(meal_id = %meal.id, "Storing meal");
        self.meals.insert(0, meal);
    }

    pub fn workouts(&self) -> &[WorkoutSession] {
        &self.workouts
    }

    pub fn meals(&self) -> &[MealLog] {
        &self.meals
    }
}
