//! Alliance members and their weekly availability.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::util::username::normalize_username;

/// Day of the week as stored in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    /// All days in display order.
    pub const ALL: [Day; 7] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];
}

/// Two-hour block of a day, `slot1` = 00:00-02:00 through `slot12` = 22:00-24:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum TimeSlot {
    #[serde(rename = "slot1")]
    Slot1,
    #[serde(rename = "slot2")]
    Slot2,
    #[serde(rename = "slot3")]
    Slot3,
    #[serde(rename = "slot4")]
    Slot4,
    #[serde(rename = "slot5")]
    Slot5,
    #[serde(rename = "slot6")]
    Slot6,
    #[serde(rename = "slot7")]
    Slot7,
    #[serde(rename = "slot8")]
    Slot8,
    #[serde(rename = "slot9")]
    Slot9,
    #[serde(rename = "slot10")]
    Slot10,
    #[serde(rename = "slot11")]
    Slot11,
    #[serde(rename = "slot12")]
    Slot12,
}

/// Selected time slots per day, in the member's own timezone.
///
/// Days without any selected slot are never stored, so an empty availability is exactly
/// "no selection".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Availability(BTreeMap<Day, BTreeSet<TimeSlot>>);

impl Availability {
    /// Empty availability.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a slot selection.
    pub fn with_slot(mut self, day: Day, slot: TimeSlot) -> Self {
        self.insert(day, slot);
        self
    }

    /// Add a slot selection in place.
    pub fn insert(&mut self, day: Day, slot: TimeSlot) {
        self.0.entry(day).or_default().insert(slot);
    }

    /// Whether any slot is selected on any day.
    pub fn is_empty(&self) -> bool {
        self.0.values().all(BTreeSet::is_empty)
    }

    /// Total selected slots across the week.
    pub fn slot_count(&self) -> usize {
        self.0.values().map(BTreeSet::len).sum()
    }

    /// Slots selected on `day`.
    pub fn slots(&self, day: Day) -> impl Iterator<Item = TimeSlot> + '_ {
        self.0.get(&day).into_iter().flatten().copied()
    }

    /// Whether `slot` is selected on `day`.
    pub fn contains(&self, day: Day, slot: TimeSlot) -> bool {
        self.0.get(&day).is_some_and(|slots| slots.contains(&slot))
    }

    /// Drop days with no selected slot.
    pub(crate) fn compact(mut self) -> Self {
        self.0.retain(|_, slots| !slots.is_empty());
        self
    }
}

/// One alliance participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// Assigned at creation, never reassigned.
    pub id: i64,
    /// Display form, preserved from the original submission.
    pub username: String,
    /// Combat power, `1..=999_999_999`.
    pub car_power: u64,
    /// Tower level, `1..=33`.
    pub tower_level: u8,
    /// Self-reported offset label, e.g. `UTC+3`.
    pub timezone: String,
    /// Weekly slots the member can play.
    #[serde(default)]
    pub availability: Availability,
    /// Time of the last submission for this member.
    pub submitted_at: DateTime<Utc>,
}

impl Member {
    /// Username used for identity comparison.
    pub fn normalized_username(&self) -> String {
        normalize_username(&self.username)
    }
}
