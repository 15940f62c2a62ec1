//! Pure document mutations.
//!
//! Each function transforms a freshly fetched [`Document`] in place and returns the logical
//! result plus the change message for the write. They never touch the network, so the
//! [`DocumentWriter`](crate::service::DocumentWriter) can run them again against a newer
//! document when reapplying after a conflict. Every successful mutation stamps `lastUpdated`.


use chrono::{DateTime, Utc};

use crate::{
    error::{Error, ValidationError},
    model::{
        Document, Member, MemberSubmission, RegistrationApplication, RegistrationStatus,
        RegistrationSubmission,
    },
    service::writer::Applied,
    util::id::next_id,
};

/// Which branch of upsert-member was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertKind {
    /// No member had this normalized username; a new record was appended.
    Inserted,
    /// Existing member, no availability submitted: only the provided stats changed.
    QuickUpdated,
    /// Existing member, availability submitted: the record was replaced.
    FullyUpdated,
}

impl UpsertKind {
    /// Whether a new member was created.
    pub fn is_insert(self) -> bool {
        self == Self::Inserted
    }
}

/// Outcome of [`upsert_member`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertOutcome {
    /// Branch taken.
    pub kind: UpsertKind,
    /// Member record as written.
    pub member: Member,
}

/// Insert or update a member matched by normalized username.
pub fn upsert_member(
    document: &mut Document,
    submission: &MemberSubmission,
    now: DateTime<Utc>,
) -> Result<Applied<UpsertOutcome>, Error> {
    submission.validate()?;

    let outcome = match document.member_index(&submission.username) {
        None => {
            let (Some(car_power), Some(tower_level)) = (submission.car_power, submission.tower_level)
            else {
                return Err(ValidationError::IncompleteNewMember {
                    username: submission.username.clone(),
                }
                .into());
            };
            let timezone = submission
                .timezone
                .clone()
                .ok_or(ValidationError::MissingField("timezone"))?;

            let member = Member {
                id: next_id(now, document.used_ids())?,
                username: submission.username.trim().to_string(),
                car_power,
                tower_level,
                timezone,
                availability: submission.availability.clone().compact(),
                submitted_at: now,
            };
            document.members.push(member.clone());

            UpsertOutcome {
                kind: UpsertKind::Inserted,
                member,
            }
        }
        Some(index) if !submission.has_availability() => {
            let existing = &mut document.members[index];
            if let Some(car_power) = submission.car_power {
                existing.car_power = car_power;
            }
            if let Some(tower_level) = submission.tower_level {
                existing.tower_level = tower_level;
            }
            existing.submitted_at = now;

            UpsertOutcome {
                kind: UpsertKind::QuickUpdated,
                member: existing.clone(),
            }
        }
        Some(index) => {
            let existing = &document.members[index];
            let member = Member {
                id: existing.id,
                username: existing.username.clone(),
                car_power: submission.car_power.unwrap_or(existing.car_power),
                tower_level: submission.tower_level.unwrap_or(existing.tower_level),
                timezone: submission
                    .timezone
                    .clone()
                    .unwrap_or_else(|| existing.timezone.clone()),
                availability: submission.availability.clone().compact(),
                submitted_at: now,
            };
            document.members[index] = member.clone();

            UpsertOutcome {
                kind: UpsertKind::FullyUpdated,
                member,
            }
        }
    };

    document.last_updated = Some(now);

    let message = match outcome.kind {
        UpsertKind::Inserted => format!("Add member: {}", outcome.member.username),
        UpsertKind::QuickUpdated | UpsertKind::FullyUpdated => {
            format!("Update member: {}", outcome.member.username)
        }
    };

    Ok(Applied {
        value: outcome,
        message,
    })
}

/// Remove the member with `id`, returning the removed record.
pub fn delete_member(
    document: &mut Document,
    id: i64,
    now: DateTime<Utc>,
) -> Result<Applied<Member>, Error> {
    let index = document
        .members
        .iter()
        .position(|m| m.id == id)
        .ok_or(Error::MemberNotFound(id))?;

    let removed = document.members.remove(index);
    document.last_updated = Some(now);

    Ok(Applied {
        message: format!("Remove member: {}", removed.username),
        value: removed,
    })
}

/// Append a new pending registration application.
pub fn append_registration(
    document: &mut Document,
    submission: &RegistrationSubmission,
    now: DateTime<Utc>,
) -> Result<Applied<RegistrationApplication>, Error> {
    submission.validate()?;

    let application = RegistrationApplication {
        id: next_id(now, document.used_ids())?,
        username: submission.username.trim().to_string(),
        car_power: submission.car_power,
        tower_level: submission.tower_level,
        daily_points: submission.daily_points,
        ex_alliances: submission.ex_alliances.trim().to_string(),
        why_left: submission.why_left.trim().to_string(),
        why_join: submission.why_join.trim().to_string(),
        motivation: submission.motivation.trim().to_string(),
        status: RegistrationStatus::Pending,
        submitted_at: now,
        reviewed_at: None,
    };
    document.registrations.push(application.clone());
    document.last_updated = Some(now);

    Ok(Applied {
        message: format!("New registration: {}", application.username),
        value: application,
    })
}

/// Mark a registration application approved or declined.
///
/// Approval only flips the status; the applicant is not added to the roster.
pub fn set_registration_status(
    document: &mut Document,
    id: i64,
    status: RegistrationStatus,
    now: DateTime<Utc>,
) -> Result<Applied<RegistrationApplication>, Error> {
    if status == RegistrationStatus::Pending {
        return Err(ValidationError::InvalidReviewStatus(status).into());
    }

    let application = document
        .registrations
        .iter_mut()
        .find(|app| app.id == id)
        .ok_or(Error::RegistrationNotFound(id))?;

    application.status = status;
    application.reviewed_at = Some(now);
    let application = application.clone();
    document.last_updated = Some(now);

    let verb = match status {
        RegistrationStatus::Approved => "Approve",
        RegistrationStatus::Declined | RegistrationStatus::Pending => "Decline",
    };

    Ok(Applied {
        message: format!("{} registration application: {}", verb, application.username),
        value: application,
    })
}
