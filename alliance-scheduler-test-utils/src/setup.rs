use mockito::{Mock, Server, ServerGuard};

use crate::constant::{TEST_DATA_PATH, TEST_OWNER, TEST_REPO};

/// Running mock API server and the mocks registered on it.
pub struct TestSetup {
    pub server: ServerGuard,
    pub mocks: Vec<Mock>,
}

impl TestSetup {
    pub async fn new() -> Self {
        let server = Server::new_async().await;

        TestSetup {
            server,
            mocks: Vec::new(),
        }
    }

    /// Base URL to configure as the client's API URL.
    pub fn url(&self) -> String {
        self.server.url()
    }

    /// Request path of the test document.
    pub fn contents_path(&self) -> String {
        format!("/repos/{}/{}/contents/{}", TEST_OWNER, TEST_REPO, TEST_DATA_PATH)
    }

    /// Assert all mock endpoints were called as expected.
    ///
    /// Verifies that every mock endpoint created during setup was called the expected number
    /// of times. Panics with the mockito mismatch report otherwise.
    pub fn assert_mocks(&self) {
        for mock in &self.mocks {
            mock.assert();
        }
    }
}
