//! Placeholder repository coordinates and credentials used across tests.
//!
//! None of these are real credentials.

/// Repository owner in mocked contents API paths.
pub static TEST_OWNER: &str = "iron-wolves";

/// Repository name in mocked contents API paths.
pub static TEST_REPO: &str = "alliance-data";

/// Path of the document inside the mocked repository.
pub static TEST_DATA_PATH: &str = "data.json";

/// Branch holding the document, sent as the `ref` query parameter on reads.
pub static TEST_BRANCH: &str = "data";

/// Officer bearer token.
pub static TEST_TOKEN: &str = "officer_test_token";

/// Token configured for public registration submissions.
pub static TEST_REGISTRATION_TOKEN: &str = "registration_test_token";

/// User agent for test clients.
pub static TEST_USER_AGENT: &str = "alliance-scheduler-tests/1.0";

/// Version token of the document served by default.
pub static TEST_SHA: &str = "3f786850e387550fdab836ed7e6dc881de23001b";

/// Version token returned by a successful mocked write.
pub static TEST_NEXT_SHA: &str = "89e6c98d92887913cadf06b2adb97f26cde4849b";
