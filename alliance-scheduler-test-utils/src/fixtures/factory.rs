//! Factory functions for JSON documents as stored in the repository.
//!
//! Fixtures are built as raw JSON rather than typed values so tests exercise the same parsing
//! path as real payloads.

use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::{json, Value};

use crate::constant::TEST_DATA_PATH;

/// Width at which the API wraps base64 content.
const BASE64_LINE_WIDTH: usize = 60;

/// Member record with Monday evening availability.
///
/// # Arguments
/// - `id` - Member id
/// - `username` - Display username
/// - `car_power` - Car power
/// - `tower_level` - Tower level
pub fn mock_member(id: i64, username: &str, car_power: u64, tower_level: u8) -> Value {
    json!({
        "id": id,
        "username": username,
        "carPower": car_power,
        "towerLevel": tower_level,
        "timezone": "UTC+2",
        "availability": {
            "monday": ["slot10", "slot11"],
        },
        "submittedAt": "2024-05-01T18:30:00Z",
    })
}

/// Registration application; reviewed statuses get a `reviewedAt` timestamp.
pub fn mock_registration(id: i64, username: &str, status: &str) -> Value {
    let mut registration = json!({
        "id": id,
        "username": username,
        "carPower": 3_400_000,
        "towerLevel": 18,
        "dailyPoints": 900,
        "exAlliances": "",
        "whyLeft": "",
        "whyJoin": "Friends play here",
        "motivation": "Every event",
        "status": status,
        "submittedAt": "2024-05-02T09:00:00Z",
    });

    if status != "pending" {
        registration["reviewedAt"] = json!("2024-05-03T12:00:00Z");
    }

    registration
}

/// Complete document with the standard timezone list.
pub fn mock_document(members: Vec<Value>, registrations: Vec<Value>) -> Value {
    json!({
        "members": members,
        "registrations": registrations,
        "config": {
            "timezones": ["UTC-5", "UTC", "UTC+1", "UTC+2", "UTC+3"],
        },
        "lastUpdated": "2024-05-03T12:00:00Z",
    })
}

/// Pretty-print `document` and base64 encode it with line wrapping, as the API returns it.
pub fn encode_content(document: &Value) -> String {
    let raw = serde_json::to_string_pretty(document).unwrap_or_default();
    let encoded = STANDARD.encode(raw);

    encoded
        .as_bytes()
        .chunks(BASE64_LINE_WIDTH)
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect::<Vec<_>>()
        .join("\n")
        + "\n"
}

/// Contents API response for a read of `document` at version `sha`.
pub fn contents_response(document: &Value, sha: &str) -> Value {
    json!({
        "type": "file",
        "encoding": "base64",
        "name": TEST_DATA_PATH,
        "path": TEST_DATA_PATH,
        "sha": sha,
        "content": encode_content(document),
    })
}

/// Contents API response for a successful write creating version `sha`.
pub fn write_response(sha: &str) -> Value {
    json!({
        "content": {
            "name": TEST_DATA_PATH,
            "path": TEST_DATA_PATH,
            "sha": sha,
        },
        "commit": {
            "sha": "c0ffee00c0ffee00c0ffee00c0ffee00c0ffee00",
        },
    })
}

