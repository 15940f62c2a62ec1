//! Declarative test builder.
//!
//! This module provides the `TestBuilder` API for configuring the mock contents API before a
//! test runs. Endpoints are queued by the chained methods and registered during `build()`.

use mockito::Mock;
use serde_json::Value;

use crate::TestSetup;

/// Builder for declarative mock server initialization.
pub struct TestBuilder {
    mock_builders: Vec<Box<dyn FnOnce(&mut mockito::ServerGuard) -> Mock>>,

    document_endpoints: Vec<(Value, String, usize)>,  // (document, sha, expected_requests)
    write_endpoints: Vec<(String, String, usize)>,    // (expected_sha, new_sha, expected_requests)
    conflict_endpoints: Vec<(String, usize)>,         // (stale_sha, expected_requests)
    status_endpoints: Vec<(&'static str, usize, usize)>, // (method, status, expected_requests)
    user_endpoints: Vec<(usize, usize)>,              // (status, expected_requests)
    rate_limit_endpoints: Vec<(u64, usize)>,          // (remaining, expected_requests)
}

impl TestBuilder {
    /// Create a new TestBuilder with no endpoints configured.
    pub fn new() -> Self {
        Self {
            mock_builders: Vec::new(),
            document_endpoints: Vec::new(),
            write_endpoints: Vec::new(),
            conflict_endpoints: Vec::new(),
            status_endpoints: Vec::new(),
            user_endpoints: Vec::new(),
            rate_limit_endpoints: Vec::new(),
        }
    }

    /// Serve `document` at version `sha` on reads.
    pub fn with_document_endpoint(
        mut self,
        document: Value,
        sha: impl Into<String>,
        expected_requests: usize,
    ) -> Self {
        self.document_endpoints
            .push((document, sha.into(), expected_requests));
        self
    }

    /// Accept writes based on `expected_sha`, answering with version `new_sha`.
    pub fn with_write_endpoint(
        mut self,
        expected_sha: impl Into<String>,
        new_sha: impl Into<String>,
        expected_requests: usize,
    ) -> Self {
        self.write_endpoints
            .push((expected_sha.into(), new_sha.into(), expected_requests));
        self
    }

    /// Reject writes based on `stale_sha` with 409 Conflict.
    pub fn with_conflict_endpoint(
        mut self,
        stale_sha: impl Into<String>,
        expected_requests: usize,
    ) -> Self {
        self.conflict_endpoints
            .push((stale_sha.into(), expected_requests));
        self
    }

    /// Answer every `method` request for the document with `status`.
    pub fn with_status_endpoint(
        mut self,
        method: &'static str,
        status: usize,
        expected_requests: usize,
    ) -> Self {
        self.status_endpoints
            .push((method, status, expected_requests));
        self
    }

    /// Answer credential checks with `status`.
    pub fn with_user_endpoint(mut self, status: usize, expected_requests: usize) -> Self {
        self.user_endpoints.push((status, expected_requests));
        self
    }

    /// Report `remaining` requests left in the rate limit window.
    pub fn with_rate_limit_endpoint(mut self, remaining: u64, expected_requests: usize) -> Self {
        self.rate_limit_endpoints
            .push((remaining, expected_requests));
        self
    }

    /// Register a custom mock endpoint.
    ///
    /// Custom endpoints are created before the shortcuts above so a test can stack several
    /// mocks on the same path (e.g. an error followed by a success).
    pub fn with_mock_endpoint<F>(mut self, setup: F) -> Self
    where
        F: FnOnce(&mut mockito::ServerGuard) -> Mock + 'static,
    {
        self.mock_builders.push(Box::new(setup));
        self
    }

    /// Start the mock server and register every queued endpoint.
    pub async fn build(self) -> TestSetup {
        let mut setup = TestSetup::new().await;
        let mut mocks = Vec::new();

        for builder in self.mock_builders {
            mocks.push(builder(&mut setup.server));
        }

        for (document, sha, expected) in self.document_endpoints {
            mocks.push(
                setup
                    .contents()
                    .create_document_endpoint(&document, &sha, expected),
            );
        }

        for (expected_sha, new_sha, expected) in self.write_endpoints {
            mocks.push(
                setup
                    .contents()
                    .create_write_endpoint(&expected_sha, &new_sha, expected),
            );
        }

        for (stale_sha, expected) in self.conflict_endpoints {
            mocks.push(setup.contents().create_conflict_endpoint(&stale_sha, expected));
        }

        for (method, status, expected) in self.status_endpoints {
            mocks.push(setup.contents().create_status_endpoint(method, status, expected));
        }

        for (status, expected) in self.user_endpoints {
            mocks.push(setup.contents().create_user_endpoint(status, expected));
        }

        for (remaining, expected) in self.rate_limit_endpoints {
            mocks.push(setup.contents().create_rate_limit_endpoint(remaining, expected));
        }

        // Mocks must live as long as the test
        setup.mocks = mocks;

        setup
    }
}

impl Default for TestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
