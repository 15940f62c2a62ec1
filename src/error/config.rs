//! Configuration failures.

use thiserror::Error;

/// Configuration could not be loaded or applied.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required variable is unset.
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),
    /// A variable is set but could not be parsed.
    #[error("Invalid value for environment variable {var}: {reason}")]
    InvalidEnvValue {
        /// Variable name.
        var: String,
        /// Why the value was rejected.
        reason: String,
    },
    /// The HTTP client rejected the configuration.
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}
