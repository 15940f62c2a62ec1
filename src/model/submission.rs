//! Caller-supplied input for the mutation operations.
//!
//! Submissions are validated before anything is queued, so invalid input never costs a
//! network round-trip.

use serde::{Deserialize, Serialize};

use crate::{
    error::ValidationError,
    model::member::Availability,
    util::timezone::is_valid_timezone_label,
};

/// Upper bound for car power.
pub const MAX_CAR_POWER: u64 = 999_999_999;
/// Lowest tower level.
pub const MIN_TOWER_LEVEL: u8 = 1;
/// Highest tower level.
pub const MAX_TOWER_LEVEL: u8 = 33;
/// Longest accepted username after trimming, in characters.
pub const MAX_USERNAME_LEN: usize = 50;

/// Member info submitted from the roster form.
///
/// With no availability selected this is a quick update of car power and tower level; with
/// any slot selected it replaces the member's availability.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberSubmission {
    /// Matched against existing members after normalization.
    pub username: String,
    /// New car power; required for a new member.
    pub car_power: Option<u64>,
    /// New tower level; required for a new member.
    pub tower_level: Option<u8>,
    /// Offset label; required for a new member.
    pub timezone: Option<String>,
    /// Weekly slots; empty means a quick update.
    #[serde(default)]
    pub availability: Availability,
}

impl MemberSubmission {
    /// Create a submission for `username` with nothing else set.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            ..Default::default()
        }
    }

    /// Set car power.
    pub fn car_power(mut self, car_power: u64) -> Self {
        self.car_power = Some(car_power);
        self
    }

    /// Set tower level.
    pub fn tower_level(mut self, tower_level: u8) -> Self {
        self.tower_level = Some(tower_level);
        self
    }

    /// Set the member's timezone label.
    pub fn timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }

    /// Set the selected availability.
    pub fn availability(mut self, availability: Availability) -> Self {
        self.availability = availability;
        self
    }

    /// Whether this submission carries any time-slot selection.
    pub fn has_availability(&self) -> bool {
        !self.availability.is_empty()
    }

    /// Check field constraints that do not depend on the document.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_username(&self.username)?;

        if let Some(car_power) = self.car_power {
            validate_car_power(car_power)?;
        }
        if let Some(tower_level) = self.tower_level {
            validate_tower_level(tower_level)?;
        }
        if let Some(timezone) = &self.timezone {
            if !is_valid_timezone_label(timezone) {
                return Err(ValidationError::InvalidTimezone(timezone.clone()));
            }
        }

        if !self.has_availability() && self.car_power.is_none() && self.tower_level.is_none() {
            return Err(ValidationError::NothingToUpdate {
                username: self.username.clone(),
            });
        }

        Ok(())
    }
}

/// Join request submitted from the registration form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationSubmission {
    /// Applicant name.
    pub username: String,
    /// Reported car power.
    pub car_power: u64,
    /// Reported tower level.
    pub tower_level: u8,
    /// Reported daily contribution.
    pub daily_points: u64,
    /// Previous alliances, optional.
    #[serde(default)]
    pub ex_alliances: String,
    /// Why the applicant left them, optional.
    #[serde(default)]
    pub why_left: String,
    /// Why the applicant wants to join.
    pub why_join: String,
    /// Expected activity.
    pub motivation: String,
}

impl RegistrationSubmission {
    /// Check required profile fields.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_username(&self.username)?;
        validate_car_power(self.car_power)?;
        validate_tower_level(self.tower_level)?;

        if self.why_join.trim().is_empty() {
            return Err(ValidationError::MissingField("whyJoin"));
        }
        if self.motivation.trim().is_empty() {
            return Err(ValidationError::MissingField("motivation"));
        }

        Ok(())
    }
}

fn validate_username(username: &str) -> Result<(), ValidationError> {
    let len = username.trim().chars().count();
    if len == 0 || len > MAX_USERNAME_LEN {
        return Err(ValidationError::InvalidUsername);
    }
    Ok(())
}

fn validate_car_power(car_power: u64) -> Result<(), ValidationError> {
    if car_power == 0 || car_power > MAX_CAR_POWER {
        return Err(ValidationError::CarPowerOutOfRange(car_power));
    }
    Ok(())
}

fn validate_tower_level(tower_level: u8) -> Result<(), ValidationError> {
    if !(MIN_TOWER_LEVEL..=MAX_TOWER_LEVEL).contains(&tower_level) {
        return Err(ValidationError::TowerLevelOutOfRange(tower_level));
    }
    Ok(())
}
