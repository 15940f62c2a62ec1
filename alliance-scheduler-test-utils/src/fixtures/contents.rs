//! Contents API mock endpoint creation utilities.
//!
//! Each method registers a mock on the setup's server that verifies it was called exactly
//! `expected_requests` times.

use mockito::{Matcher, Mock};
use serde_json::{json, Value};

use crate::{
    constant::TEST_BRANCH,
    fixtures::{
        factory::{contents_response, write_response},
        ContentsFixtures,
    },
};

impl<'a> ContentsFixtures<'a> {
    /// Create a mock GET endpoint serving `document` at version `sha`.
    pub fn create_document_endpoint(
        &mut self,
        document: &Value,
        sha: &str,
        expected_requests: usize,
    ) -> Mock {
        let path = self.setup.contents_path();

        self.setup
            .server
            .mock("GET", path.as_str())
            .match_query(Matcher::UrlEncoded("ref".into(), TEST_BRANCH.into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(contents_response(document, sha).to_string())
            .expect(expected_requests)
            .create()
    }

    /// Create a mock PUT endpoint accepting writes based on `expected_sha` and answering with
    /// version `new_sha`.
    pub fn create_write_endpoint(
        &mut self,
        expected_sha: &str,
        new_sha: &str,
        expected_requests: usize,
    ) -> Mock {
        let path = self.setup.contents_path();

        self.setup
            .server
            .mock("PUT", path.as_str())
            .match_body(Matcher::PartialJson(json!({
                "sha": expected_sha,
                "branch": TEST_BRANCH,
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(write_response(new_sha).to_string())
            .expect(expected_requests)
            .create()
    }

    /// Create a mock PUT endpoint rejecting writes based on `stale_sha` with 409 Conflict.
    pub fn create_conflict_endpoint(&mut self, stale_sha: &str, expected_requests: usize) -> Mock {
        let path = self.setup.contents_path();

        self.setup
            .server
            .mock("PUT", path.as_str())
            .match_body(Matcher::PartialJson(json!({ "sha": stale_sha })))
            .with_status(409)
            .with_header("content-type", "application/json")
            .with_body(
                json!({ "message": format!("{} does not match", stale_sha) }).to_string(),
            )
            .expect(expected_requests)
            .create()
    }

    /// Create a mock endpoint for the document answering every `method` request with
    /// `status` and an API error message.
    pub fn create_status_endpoint(
        &mut self,
        method: &str,
        status: usize,
        expected_requests: usize,
    ) -> Mock {
        let path = self.setup.contents_path();

        self.setup
            .server
            .mock(method, path.as_str())
            .match_query(Matcher::Any)
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(json!({ "message": format!("mocked status {}", status) }).to_string())
            .expect(expected_requests)
            .create()
    }

    /// Create a mock GET `/user` endpoint answering with `status`.
    pub fn create_user_endpoint(&mut self, status: usize, expected_requests: usize) -> Mock {
        let body = if status == 200 {
            json!({ "login": "officer", "id": 1 })
        } else {
            json!({ "message": "Bad credentials" })
        };

        self.setup
            .server
            .mock("GET", "/user")
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .expect(expected_requests)
            .create()
    }

    /// Create a mock GET `/rate_limit` endpoint reporting `remaining` of 5000 requests left.
    pub fn create_rate_limit_endpoint(&mut self, remaining: u64, expected_requests: usize) -> Mock {
        let body = json!({
            "resources": {},
            "rate": {
                "limit": 5000,
                "remaining": remaining,
                "used": 5000 - remaining,
                "reset": 1_717_243_200,
            },
        });

        self.setup
            .server
            .mock("GET", "/rate_limit")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body.to_string())
            .expect(expected_requests)
            .create()
    }
}
