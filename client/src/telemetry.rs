//! Tracing setup and metric names
//!
//! The library never installs a subscriber or a metrics recorder on its own;
//! the host calls [`init_tracing`] once and may install any `metrics`
//! exporter it likes.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// AI calls, labelled by `operation` and `outcome`
pub const AI_REQUESTS_TOTAL: &str = "fitcoach_ai_requests_total";

/// Workouts committed to the session store
pub const WORKOUTS_FINISHED_TOTAL: &str = "fitcoach_workouts_finished_total";

/// Meals committed to the session store
pub const MEALS_LOGGED_TOTAL: &str = "fitcoach_meals_logged_total";

/// Outcome label values for [`AI_REQUESTS_TOTAL`]
pub mod outcome {
    pub const SUCCESS: &str = "success";
    pub const FALLBACK: &str = "fallback";
    pub const ERROR: &str = "error";
}

/// Record one AI call
pub fn record_ai_request(operation: &'static str, outcome: &'static str) {
    metrics::counter!(AI_REQUESTS_TOTAL, "operation" => operation, "outcome" => outcome).increment(1);
}

/// Initialize tracing/logging
///
/// `RUST_LOG` wins over the configured filter. Fails if a global subscriber
/// is already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), tracing_subscriber::util::TryInitError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter));

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if config.json {
        // JSON logging for production (better for log aggregation)
        subscriber
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        // Pretty logging for development
        subscriber
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init()
    }
}
