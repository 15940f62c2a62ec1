//! Join requests reviewed by officers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Review state of a [`RegistrationApplication`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    /// Awaiting review. Every application starts here.
    Pending,
    /// Accepted by an officer. Does not add the applicant to the roster.
    Approved,
    /// Rejected by an officer.
    Declined,
}

impl std::fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Declined => "declined",
        };
        f.write_str(label)
    }
}

/// A pending or reviewed join request. Usernames are not unique here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationApplication {
    /// Assigned at submission.
    pub id: i64,
    /// Applicant name as submitted, trimmed.
    pub username: String,
    /// Reported car power.
    pub car_power: u64,
    /// Reported tower level.
    pub tower_level: u8,
    /// Reported daily contribution.
    pub daily_points: u64,
    /// Previous alliances, free text.
    #[serde(default)]
    pub ex_alliances: String,
    /// Why the applicant left them.
    #[serde(default)]
    pub why_left: String,
    /// Why the applicant wants to join.
    pub why_join: String,
    /// Expected activity.
    pub motivation: String,
    /// Review state.
    pub status: RegistrationStatus,
    /// Submission time.
    pub submitted_at: DateTime<Utc>,
    /// Present iff `status != Pending`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,
}
