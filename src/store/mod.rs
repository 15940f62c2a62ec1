//! Document store clients.
//!
//! A [`DocumentStore`] reads the current document together with its [`VersionToken`] and writes
//! a complete new document conditioned on that token. It holds no business logic and never keeps
//! the document past the call; caching belongs to [`LocalState`](crate::state::LocalState).

pub mod contents;
pub mod memory;

use std::fmt;

use async_trait::async_trait;

use crate::{error::StoreError, model::Document};

pub use contents::ContentsApiStore;
pub use memory::MemoryStore;

/// Opaque revision identifier assigned by the store.
///
/// Only store implementations interpret it; everything else just carries it from a read to the
/// matching write.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionToken(String);

impl VersionToken {
    /// Wrap a store-assigned revision identifier.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Raw identifier, for store implementations.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Bearer credential attached to store requests.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a bearer token. Surrounding whitespace is removed.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into().trim().to_string())
    }

    /// Raw token, for request headers.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// A document together with the version it was read at.
#[derive(Debug, Clone)]
pub struct VersionedDocument {
    /// Parsed document.
    pub document: Document,
    /// Version the document was read at.
    pub version: VersionToken,
}

/// Remote versioned storage for the single shared document.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch the current document and its version token.
    ///
    /// # Returns
    /// - `Ok(VersionedDocument)` - Latest document and version
    /// - `Err(StoreError::NotFound)` - The backing object does not exist
    /// - `Err(StoreError::Unauthorized | Forbidden)` - Credential invalid or missing
    /// - `Err(StoreError::TransientNetwork)` - Connectivity, timeout, or 5xx
    /// - `Err(StoreError::MalformedContent)` - Payload could not be decoded or parsed
    async fn fetch_document(
        &self,
        credential: Option<&Credential>,
    ) -> Result<VersionedDocument, StoreError>;

    /// Replace the whole document, provided `expected` is still the current version.
    ///
    /// # Returns
    /// - `Ok(VersionToken)` - Version of the newly written document
    /// - `Err(StoreError::VersionConflict)` - Another writer committed since `expected` was read
    /// - Same auth, network, and content failures as [`DocumentStore::fetch_document`]
    async fn write_document(
        &self,
        document: &Document,
        expected: &VersionToken,
        message: &str,
        credential: &Credential,
    ) -> Result<VersionToken, StoreError>;

    /// Check that `credential` is accepted by the store.
    async fn verify_credential(&self, credential: &Credential) -> Result<(), StoreError>;
}
