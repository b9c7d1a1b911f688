//! FitCoach Shared Library
//!
//! This crate contains the domain entities and the pure calculations used
//! across the client core and the WASM bindings: calorie targets, BMI,
//! streaks, badges and daily/weekly aggregation.

pub mod achievements;
pub mod errors;
pub mod health_metrics;
pub mod models;
pub mod stats;
pub mod validation;
pub mod workout;

// Re-export commonly used items
pub use achievements::*;
pub use errors::*;
pub use health_metrics::*;
pub use models::*;
pub use stats::*;
pub use workout::*;
