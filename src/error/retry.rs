//! Mapping from errors to retry decisions.

use super::{Error, StoreError};

/// Strategy for handling errors in a retry context
pub enum ErrorRetryStrategy {
    /// Retry with exponential backoff (network, truncated content)
    Retry,
    /// Failed permanently
    Fail,
}

impl Error {
    /// Determine error retry strategy based upon application Error type
    pub fn to_retry_strategy(&self) -> ErrorRetryStrategy {
        match self {
            Self::StoreError(store_error) => match store_error {
                // Connectivity, timeouts, 429, and 5xx - the store may recover
                StoreError::TransientNetwork(_) => ErrorRetryStrategy::Retry,

                // Truncated or partially delivered payloads can succeed on a re-read
                StoreError::MalformedContent(_) => ErrorRetryStrategy::Retry,

                // Stale credentials will never succeed, the caller must re-authenticate
                StoreError::Unauthorized(_) | StoreError::Forbidden(_) => ErrorRetryStrategy::Fail,

                // Retrying with the same version token cannot win the race
                StoreError::VersionConflict { .. } => ErrorRetryStrategy::Fail,

                StoreError::NotFound(_) => ErrorRetryStrategy::Fail,
                StoreError::UnexpectedStatus { .. } => ErrorRetryStrategy::Fail,
            },

            // Validation and missing entities are decided by the input, not by timing
            Self::ValidationError(_) => ErrorRetryStrategy::Fail,
            Self::MemberNotFound(_) => ErrorRetryStrategy::Fail,
            Self::RegistrationNotFound(_) => ErrorRetryStrategy::Fail,

            // Already retried
            Self::RetriesExhausted { .. } => ErrorRetryStrategy::Fail,

            // Replaying could commit the same change twice
            Self::UnconfirmedWrite { .. } => ErrorRetryStrategy::Fail,

            Self::ConfigError(_) => ErrorRetryStrategy::Fail,
            Self::JobCancelled(_) => ErrorRetryStrategy::Fail,
        }
    }
}
