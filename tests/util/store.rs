//! Store wrappers that observe or disturb the calls a scheduler makes.

use std::{
    sync::atomic::{AtomicBool, AtomicUsize, Ordering},
    time::Duration,
};

use alliance_scheduler::{
    error::StoreError,
    model::Document,
    store::{Credential, DocumentStore, MemoryStore, VersionToken, VersionedDocument},
};
use async_trait::async_trait;

/// Records how many writes are in flight at once.
pub struct RecordingStore {
    pub inner: MemoryStore,
    write_delay: Duration,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl RecordingStore {
    pub fn new(inner: MemoryStore, write_delay: Duration) -> Self {
        Self {
            inner,
            write_delay,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DocumentStore for RecordingStore {
    async fn fetch_document(
        &self,
        credential: Option<&Credential>,
    ) -> Result<VersionedDocument, StoreError> {
        self.inner.fetch_document(credential).await
    }

    async fn write_document(
        &self,
        document: &Document,
        expected: &VersionToken,
        message: &str,
        credential: &Credential,
    ) -> Result<VersionToken, StoreError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(self.write_delay).await;
        let result = self
            .inner
            .write_document(document, expected, message, credential)
            .await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    async fn verify_credential(&self, credential: &Credential) -> Result<(), StoreError> {
        self.inner.verify_credential(credential).await
    }
}

/// Lets another client commit between this client's fetch and write.
///
/// Before forwarding each of the first `interferences` writes, the store applies `competing`
/// to the latest document and commits it, so the forwarded write is based on a superseded
/// version.
pub struct InterferingStore<F> {
    pub inner: MemoryStore,
    competing: F,
    interferences: AtomicUsize,
    interfered: AtomicBool,
}

impl<F> InterferingStore<F>
where
    F: Fn(&mut Document) + Send + Sync,
{
    pub fn new(inner: MemoryStore, interferences: usize, competing: F) -> Self {
        Self {
            inner,
            competing,
            interferences: AtomicUsize::new(interferences),
            interfered: AtomicBool::new(false),
        }
    }

    pub fn interfered(&self) -> bool {
        self.interfered.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl<F> DocumentStore for InterferingStore<F>
where
    F: Fn(&mut Document) + Send + Sync,
{
    async fn fetch_document(
        &self,
        credential: Option<&Credential>,
    ) -> Result<VersionedDocument, StoreError> {
        self.inner.fetch_document(credential).await
    }

    async fn write_document(
        &self,
        document: &Document,
        expected: &VersionToken,
        message: &str,
        credential: &Credential,
    ) -> Result<VersionToken, StoreError> {
        let remaining = self.interferences.load(Ordering::SeqCst);
        if remaining > 0 {
            self.interferences.store(remaining - 1, Ordering::SeqCst);
            self.interfered.store(true, Ordering::SeqCst);

            let VersionedDocument {
                mut document,
                version,
            } = self.inner.fetch_document(None).await?;
            (self.competing)(&mut document);
            self.inner
                .write_document(&document, &version, "competing write", credential)
                .await?;
        }

        self.inner
            .write_document(document, expected, message, credential)
            .await
    }

    async fn verify_credential(&self, credential: &Credential) -> Result<(), StoreError> {
        self.inner.verify_credential(credential).await
    }
}

/// Commits the first `lost` writes but answers them with a transient failure, as if the
/// response was dropped on the way back.
///
/// When `competing` is set, another client's change is committed right after each lost
/// response, so the document no longer matches what this client sent.
pub struct LostAckStore {
    pub inner: MemoryStore,
    lost: AtomicUsize,
    competing: Option<fn(&mut Document)>,
}

impl LostAckStore {
    pub fn new(inner: MemoryStore, lost: usize) -> Self {
        Self {
            inner,
            lost: AtomicUsize::new(lost),
            competing: None,
        }
    }

    pub fn with_competing_write(mut self, competing: fn(&mut Document)) -> Self {
        self.competing = Some(competing);
        self
    }
}

#[async_trait]
impl DocumentStore for LostAckStore {
    async fn fetch_document(
        &self,
        credential: Option<&Credential>,
    ) -> Result<VersionedDocument, StoreError> {
        self.inner.fetch_document(credential).await
    }

    async fn write_document(
        &self,
        document: &Document,
        expected: &VersionToken,
        message: &str,
        credential: &Credential,
    ) -> Result<VersionToken, StoreError> {
        let version = self
            .inner
            .write_document(document, expected, message, credential)
            .await?;

        let remaining = self.lost.load(Ordering::SeqCst);
        if remaining == 0 {
            return Ok(version);
        }
        self.lost.store(remaining - 1, Ordering::SeqCst);

        if let Some(competing) = self.competing {
            let mut latest = document.clone();
            competing(&mut latest);
            self.inner
                .write_document(&latest, &version, "competing write", credential)
                .await?;
        }

        Err(StoreError::TransientNetwork(
            "connection reset before response".to_string(),
        ))
    }

    async fn verify_credential(&self, credential: &Credential) -> Result<(), StoreError> {
        self.inner.verify_credential(credential).await
    }
}
