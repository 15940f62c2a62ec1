//! Document fixtures and mock contents API endpoints.
//!
//! - `factory` - JSON members, registrations, documents, and the base64 content envelope
//! - `contents` - mockito endpoints for reads, writes, conflicts, and credential checks

pub mod contents;
pub mod factory;

use crate::TestSetup;

/// Endpoint fixtures bound to a running [`TestSetup`].
pub struct ContentsFixtures<'a> {
    setup: &'a mut TestSetup,
}

impl TestSetup {
    /// Access contents API endpoint fixtures.
    pub fn contents(&mut self) -> ContentsFixtures<'_> {
        ContentsFixtures { setup: self }
    }
}
