//! Wire envelope of the repository contents API.

use serde::{Deserialize, Serialize};

/// Response of `GET /repos/{owner}/{repo}/contents/{path}`.
#[derive(Debug, Deserialize)]
pub struct ContentsFile {
    /// Blob sha, used as the version token.
    pub sha: String,
    /// Base64 payload, wrapped with newlines every 60 characters.
    pub content: String,
    /// Payload encoding, `base64` for regular files.
    #[serde(default)]
    pub encoding: Option<String>,
}

/// Body of `PUT /repos/{owner}/{repo}/contents/{path}`.
#[derive(Debug, Serialize)]
pub struct UpdateContentsRequest<'a> {
    /// Change description recorded with the new version.
    pub message: &'a str,
    /// Base64 of the full new document.
    pub content: String,
    /// Sha of the blob being replaced; the write fails if it is no longer current.
    pub sha: &'a str,
    /// Target branch; the default branch when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<&'a str>,
}

/// Response of a successful contents write.
#[derive(Debug, Deserialize)]
pub struct UpdateContentsResponse {
    /// The blob that was written.
    pub content: ContentsRef,
}

/// Blob reference inside a write response.
#[derive(Debug, Deserialize)]
pub struct ContentsRef {
    /// Sha of the new blob, the next version token.
    pub sha: String,
}

/// Error body returned alongside non-success statuses.
#[derive(Debug, Default, Deserialize)]
pub struct ApiErrorBody {
    /// Human readable reason.
    #[serde(default)]
    pub message: String,
}

/// Response of `GET /rate_limit`.
#[derive(Debug, Deserialize)]
pub struct RateLimitResponse {
    /// Core API budget.
    pub rate: RateLimit,
}

/// Core API request budget for the current credential (or client IP when anonymous).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimit {
    /// Requests allowed per window.
    pub limit: u32,
    /// Requests left in the current window.
    pub remaining: u32,
    /// Requests spent in the current window.
    #[serde(default)]
    pub used: u32,
    /// Unix timestamp at which the window resets.
    pub reset: i64,
}
