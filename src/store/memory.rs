//! In-process versioned store.
//!
//! Holds the document in its serialized form and enforces the same compare-and-swap rule as the
//! remote store, which makes it a drop-in backend for tests and offline use. Several
//! [`Scheduler`](crate::Scheduler)s sharing one `Arc<MemoryStore>` behave like independent
//! clients racing on the same remote document.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    error::StoreError,
    model::Document,
    store::{Credential, DocumentStore, VersionToken, VersionedDocument},
};

struct Revision {
    number: u64,
    content: Vec<u8>,
}

/// [`DocumentStore`] kept in memory.
pub struct MemoryStore {
    current: Mutex<Option<Revision>>,
    required_credential: Option<Credential>,
    fetches: AtomicU64,
    writes: AtomicU64,
}

impl MemoryStore {
    /// Store holding `document` at its first revision.
    pub fn new(document: &Document) -> Result<Self, StoreError> {
        let content = document.to_json_pretty()?.into_bytes();

        Ok(Self::from_revision(Some(Revision { number: 1, content })))
    }

    /// Store with no document; every fetch fails with `NotFound`.
    pub fn empty() -> Self {
        Self::from_revision(None)
    }

    /// Store holding raw bytes, which need not be a valid document.
    pub fn with_raw_content(content: impl Into<Vec<u8>>) -> Self {
        Self::from_revision(Some(Revision {
            number: 1,
            content: content.into(),
        }))
    }

    /// Require `credential` for writes and credential checks.
    pub fn require_credential(mut self, credential: Credential) -> Self {
        self.required_credential = Some(credential);
        self
    }

    fn from_revision(current: Option<Revision>) -> Self {
        Self {
            current: Mutex::new(current),
            required_credential: None,
            fetches: AtomicU64::new(0),
            writes: AtomicU64::new(0),
        }
    }

    /// Number of fetch calls received, successful or not.
    pub fn fetch_count(&self) -> u64 {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Number of write calls received, successful or not.
    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    /// Version token of the current revision.
    pub async fn current_version(&self) -> Option<VersionToken> {
        self.current
            .lock()
            .await
            .as_ref()
            .map(|revision| version_token(revision.number))
    }

    /// Decoded current document, bypassing counters and credentials.
    pub async fn snapshot(&self) -> Result<Document, StoreError> {
        let current = self.current.lock().await;
        let revision = current
            .as_ref()
            .ok_or_else(|| StoreError::NotFound("memory store is empty".to_string()))?;

        Document::from_json(&revision.content)
    }

    fn authorize(&self, credential: &Credential) -> Result<(), StoreError> {
        match &self.required_credential {
            Some(required) if required != credential => {
                Err(StoreError::Unauthorized("Bad credentials".to_string()))
            }
            _ => Ok(()),
        }
    }
}

fn version_token(number: u64) -> VersionToken {
    VersionToken::new(format!("rev-{:08}", number))
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn fetch_document(
        &self,
        _credential: Option<&Credential>,
    ) -> Result<VersionedDocument, StoreError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        let current = self.current.lock().await;
        let revision = current
            .as_ref()
            .ok_or_else(|| StoreError::NotFound("memory store is empty".to_string()))?;

        Ok(VersionedDocument {
            document: Document::from_json(&revision.content)?,
            version: version_token(revision.number),
        })
    }

    async fn write_document(
        &self,
        document: &Document,
        expected: &VersionToken,
        _message: &str,
        credential: &Credential,
    ) -> Result<VersionToken, StoreError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.authorize(credential)?;

        let mut current = self.current.lock().await;
        let revision = current
            .as_mut()
            .ok_or_else(|| StoreError::NotFound("memory store is empty".to_string()))?;

        if version_token(revision.number) != *expected {
            return Err(StoreError::VersionConflict {
                expected: expected.to_string(),
            });
        }

        revision.number += 1;
        revision.content = document.to_json_pretty()?.into_bytes();

        Ok(version_token(revision.number))
    }

    async fn verify_credential(&self, credential: &Credential) -> Result<(), StoreError> {
        self.authorize(credential)
    }
}
