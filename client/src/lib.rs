//! FitCoach client core
//!
//! Everything below the presentation layer: configuration, the in-memory
//! session store, the workout logging flow, and the AI coach backed by a
//! hosted generation service. Pure calculations live in `fitcoach_shared`.

pub mod ai;
pub mod config;
pub mod error;
pub mod state;
pub mod store;
pub mod telemetry;
pub mod tracker;

pub use error::{AppError, AppResult};
pub use state::AppState;
