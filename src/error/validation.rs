//! Input validation failures.

use thiserror::Error;

use crate::model::RegistrationStatus;

/// Caller input that violates a field constraint.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Blank or longer than 50 characters.
    #[error("Username must be between 1 and 50 characters after trimming")]
    InvalidUsername,
    /// Car power outside `1..=999_999_999`.
    #[error("Car power must be between 1 and 999,999,999, got {0}")]
    CarPowerOutOfRange(u64),
    /// Tower level outside `1..=33`.
    #[error("Tower level must be between 1 and 33, got {0}")]
    TowerLevelOutOfRange(u8),
    /// Not `UTC` or `UTC±N`.
    #[error("Unrecognized timezone label: {0:?}")]
    InvalidTimezone(String),
    /// A required field is absent or blank.
    #[error("Required field is missing or blank: {0}")]
    MissingField(&'static str),
    /// Inserting a member needs both stats.
    #[error("New member {username:?} requires both car power and tower level")]
    IncompleteNewMember {
        /// Username as submitted.
        username: String,
    },
    /// The submission carries no change.
    #[error("Submission for {username:?} has no availability, car power, or tower level to save")]
    NothingToUpdate {
        /// Username as submitted.
        username: String,
    },
    /// Applications can only be reviewed into approved or declined.
    #[error("Registration applications cannot be reviewed into status {0:?}")]
    InvalidReviewStatus(RegistrationStatus),
}
