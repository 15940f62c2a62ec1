//! Error types for the roster document core.
//!
//! Each concern gets its own `thiserror` enum (store access, input validation, configuration)
//! and they are aggregated into [`Error`] so `?` works across layers. [`Error::kind`] collapses
//! everything into the small taxonomy the presentation layer branches on: re-authenticate,
//! retry after a conflict, or show a generic failure.

pub mod config;
pub mod retry;
pub mod store;
pub mod validation;

use thiserror::Error;

pub use config::ConfigError;
pub use retry::ErrorRetryStrategy;
pub use store::StoreError;
pub use validation::ValidationError;

/// Main error type for the roster document core.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error (missing or invalid environment variables).
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
    /// Failure reported by the document store client.
    #[error(transparent)]
    StoreError(#[from] StoreError),
    /// Caller-supplied input violates field constraints. Never reaches the store.
    #[error(transparent)]
    ValidationError(#[from] ValidationError),
    /// No member with this id exists in the latest document.
    #[error("Member not found: {0}")]
    MemberNotFound(i64),
    /// No registration application with this id exists in the latest document.
    #[error("Registration application not found: {0}")]
    RegistrationNotFound(i64),
    /// A retryable failure persisted through every attempt.
    #[error("Gave up after {attempts} attempt(s): {source}")]
    RetriesExhausted {
        /// Number of attempts made, including the first.
        attempts: u32,
        /// Last failure observed.
        #[source]
        source: Box<Error>,
    },
    /// A write may have committed before its response was lost; the outcome is unknown.
    #[error("Write \"{message}\" may have committed before its response was lost: {source}")]
    UnconfirmedWrite {
        /// Commit message of the write whose outcome is unknown.
        message: String,
        /// Failure observed when the write was retried.
        #[source]
        source: Box<Error>,
    },
    /// The queued write was cleared, shut down, or panicked before producing a result.
    #[error("Queued write was cancelled before it completed: {0}")]
    JobCancelled(String),
}

/// Coarse classification of [`Error`] used to decide user-visible behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Credential missing, invalid, or expired.
    Unauthorized,
    /// Credential lacks permission for the operation.
    Forbidden,
    /// Another writer committed first; resubmit against fresh data.
    VersionConflict,
    /// Missing document or missing entity id.
    NotFound,
    /// Payload could not be decoded or violates the document schema.
    MalformedContent,
    /// Connectivity failure, timeout, rate limiting, or server error.
    TransientNetwork,
    /// Input rejected before any store access.
    ValidationFailed,
    /// A write may have committed even though it reported a failure; reload and check before
    /// resubmitting.
    UnconfirmedWrite,
    /// Anything else (configuration, cancelled jobs, unexpected responses).
    Internal,
}

impl Error {
    /// Classify this error, looking through retry exhaustion to the last observed failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::StoreError(err) => err.kind(),
            Self::ValidationError(_) => ErrorKind::ValidationFailed,
            Self::MemberNotFound(_) | Self::RegistrationNotFound(_) => ErrorKind::NotFound,
            Self::RetriesExhausted { source, .. } => source.kind(),
            Self::UnconfirmedWrite { .. } => ErrorKind::UnconfirmedWrite,
            Self::ConfigError(_) | Self::JobCancelled(_) => ErrorKind::Internal,
        }
    }

    /// True when the caller should discard its cached credential and prompt for a new one.
    pub fn requires_reauthentication(&self) -> bool {
        matches!(self.kind(), ErrorKind::Unauthorized | ErrorKind::Forbidden)
    }

    /// True when the operation lost the optimistic race and may be resubmitted.
    pub fn is_conflict(&self) -> bool {
        self.kind() == ErrorKind::VersionConflict
    }

    /// Number of attempts made when retries were exhausted, otherwise `None`.
    pub fn attempts(&self) -> Option<u32> {
        match self {
            Self::RetriesExhausted { attempts, .. } => Some(*attempts),
            _ => None,
        }
    }
}
