//! Errors reported by document store clients.

use thiserror::Error;

use super::ErrorKind;

/// Failure reported by a [`DocumentStore`](crate::store::DocumentStore).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// 401, or a protected operation attempted without a credential.
    #[error("Authentication expired or invalid, please log in again: {0}")]
    Unauthorized(String),
    /// 403, the credential is valid but not allowed to perform the operation.
    #[error("Credential is not permitted to perform this operation: {0}")]
    Forbidden(String),
    /// The supplied version token no longer matches the store's current version.
    #[error("Document was changed by someone else since version {expected} was read, please retry")]
    VersionConflict {
        /// Version token the write was conditioned on.
        expected: String,
    },
    /// The backing document does not exist.
    #[error("Document not found: {0}")]
    NotFound(String),
    /// Envelope, base64, UTF-8, JSON, or schema failure.
    #[error("Document content is malformed: {0}")]
    MalformedContent(String),
    /// Connectivity failure, timeout, rate limiting, or 5xx.
    #[error("Temporary network failure: {0}")]
    TransientNetwork(String),
    /// Any other non-success response.
    #[error("Store rejected the request with status {status}: {message}")]
    UnexpectedStatus {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body, if any.
        message: String,
    },
}

impl StoreError {
    /// Classify into the crate-wide taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::Forbidden(_) => ErrorKind::Forbidden,
            Self::VersionConflict { .. } => ErrorKind::VersionConflict,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::MalformedContent(_) => ErrorKind::MalformedContent,
            Self::TransientNetwork(_) => ErrorKind::TransientNetwork,
            Self::UnexpectedStatus { .. } => ErrorKind::Internal,
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::MalformedContent(err.to_string())
        } else {
            Self::TransientNetwork(err.to_string())
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedContent(err.to_string())
    }
}

impl From<base64::DecodeError> for StoreError {
    fn from(err: base64::DecodeError) -> Self {
        Self::MalformedContent(format!("invalid base64 content: {}", err))
    }
}

impl From<std::string::FromUtf8Error> for StoreError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        Self::MalformedContent(format!("content is not UTF-8: {}", err))
    }
}
