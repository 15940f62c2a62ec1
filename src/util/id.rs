//! Entity id assignment.
//!
//! Ids are wall-clock derived (milliseconds since the Unix epoch) so they increase with time,
//! but two entities created within the same millisecond, or a clock that stepped backwards,
//! must still get distinct ids within one document.

use chrono::{DateTime, Utc};

use crate::error::StoreError;

/// Next id for a new member or application: `max(now_ms, highest existing id + 1)`.
///
/// Fails with `MalformedContent` when the document already holds `i64::MAX`, since no larger
/// id exists.
pub fn next_id(
    now: DateTime<Utc>,
    existing: impl IntoIterator<Item = i64>,
) -> Result<i64, StoreError> {
    let now_ms = now.timestamp_millis();

    match existing.into_iter().max() {
        Some(highest) if highest >= now_ms => highest.checked_add(1).ok_or_else(|| {
            StoreError::MalformedContent(format!("no id left after existing id {}", highest))
        }),
        _ => Ok(now_ms),
    }
}
