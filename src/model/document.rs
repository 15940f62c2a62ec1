//! The single shared JSON document.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::StoreError,
    model::{
        member::Member,
        registration::{RegistrationApplication, RegistrationStatus},
    },
    util::username::normalize_username,
};

/// Static settings stored alongside the roster. Read-only for this crate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentConfig {
    /// Allowed timezone labels offered to members.
    #[serde(default)]
    pub timezones: Vec<String>,
}

/// Roster, registration applications, and configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Roster; usernames are unique after normalization.
    pub members: Vec<Member>,
    /// Join requests in submission order.
    #[serde(default)]
    pub registrations: Vec<RegistrationApplication>,
    /// Shared settings.
    #[serde(default)]
    pub config: DocumentConfig,
    /// Set by every successful write.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl Document {
    /// Parse and validate a document.
    ///
    /// Beyond the serde schema this checks the identity invariants: at most one member per
    /// normalized username and `reviewedAt` present exactly when an application was reviewed.
    ///
    /// # Returns
    /// - `Ok(Document)` - Well-formed document
    /// - `Err(StoreError::MalformedContent)` - JSON or schema violation
    pub fn from_json(bytes: &[u8]) -> Result<Self, StoreError> {
        let document: Document = serde_json::from_slice(bytes)?;
        document.validate()?;

        Ok(document)
    }

    /// Serialize with two-space indentation, the layout stored remotely.
    pub fn to_json_pretty(&self) -> Result<String, StoreError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| StoreError::MalformedContent(format!("failed to encode document: {}", e)))
    }

    fn validate(&self) -> Result<(), StoreError> {
        let mut seen = HashSet::with_capacity(self.members.len());
        for member in &self.members {
            if !seen.insert(member.normalized_username()) {
                return Err(StoreError::MalformedContent(format!(
                    "duplicate member username {:?}",
                    member.username
                )));
            }
        }

        for app in &self.registrations {
            let reviewed = app.status != RegistrationStatus::Pending;
            if reviewed != app.reviewed_at.is_some() {
                return Err(StoreError::MalformedContent(format!(
                    "registration {} has status {} but reviewedAt is {}",
                    app.id,
                    app.status,
                    if app.reviewed_at.is_some() { "set" } else { "missing" }
                )));
            }
        }

        Ok(())
    }

    /// Find a member by username under normalization.
    pub fn member_by_username(&self, username: &str) -> Option<&Member> {
        self.member_index(username).map(|i| &self.members[i])
    }

    pub(crate) fn member_index(&self, username: &str) -> Option<usize> {
        let normalized = normalize_username(username);
        self.members
            .iter()
            .position(|m| m.normalized_username() == normalized)
    }

    /// Find a member by id.
    pub fn member_by_id(&self, id: i64) -> Option<&Member> {
        self.members.iter().find(|m| m.id == id)
    }

    /// Applications still awaiting review, in submission order.
    pub fn pending_registrations(&self) -> impl Iterator<Item = &RegistrationApplication> {
        self.registrations
            .iter()
            .filter(|app| app.status == RegistrationStatus::Pending)
    }

    /// Members in roster display order, strongest car power first.
    pub fn members_by_power(&self) -> Vec<&Member> {
        let mut members: Vec<&Member> = self.members.iter().collect();
        members.sort_by(|a, b| b.car_power.cmp(&a.car_power));
        members
    }

    /// Every id in use by members and applications.
    pub(crate) fn used_ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.members
            .iter()
            .map(|m| m.id)
            .chain(self.registrations.iter().map(|r| r.id))
    }
}
