//! Error types for the dashboard host binary.
//!
//! [`AppError`] is the top-level error type that wraps all possible
//! failure modes during startup and the render loop.

/// Top-level error for the dashboard host.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: impact_core::config::ConfigError,
    },

    /// The dashboard service stopped unexpectedly.
    #[error("dashboard service error: {source}")]
    Service {
        /// The underlying service error.
        #[from]
        source: impact_core::service::ServiceError,
    },

    /// The dashboard service task panicked or was cancelled.
    #[error("dashboard task failed: {source}")]
    Join {
        /// The underlying join error.
        #[from]
        source: tokio::task::JoinError,
    },

    /// The tracing subscriber could not be installed.
    #[error("logging error: {message}")]
    Logging {
        /// Description of the logging failure.
        message: String,
    },
}
