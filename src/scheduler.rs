//! The service object tying the store, retry policy, write queue, and local state together.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dioxus_logger::tracing;

use crate::{
    config::Config,
    error::{Error, StoreError, ValidationError},
    model::{
        Document, Member, MemberSubmission, RegistrationApplication, RegistrationStatus,
        RegistrationSubmission,
    },
    service::{
        mutation, Applied, Committed, DocumentWriter, RetryContext, UpsertOutcome,
    },
    state::LocalState,
    store::{ContentsApiStore, Credential, DocumentStore, VersionedDocument},
    worker::WriteQueue,
};

/// Whether [`Scheduler::load_document`] may answer from the local cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CachePolicy {
    /// Use the cached document unless it is missing or older than the configured max age.
    #[default]
    PreferCache,
    /// Always fetch from the store.
    Refresh,
}

/// Entry point for reading and mutating the shared document.
///
/// Cheap to clone; clones share the write queue and local state. Mutations are always applied
/// to the latest remote document through the write queue and never update the local state;
/// call [`Scheduler::load_document`] with [`CachePolicy::Refresh`] after a commit to observe it.
#[derive(Clone)]
pub struct Scheduler {
    inner: Arc<SchedulerRef>,
}

struct SchedulerRef {
    config: Config,
    store: Arc<dyn DocumentStore>,
    retry: RetryContext,
    queue: WriteQueue,
    state: LocalState,
    registration_credential: Option<Credential>,
}

impl Scheduler {
    /// Creates a new scheduler over `store`.
    pub fn new(config: Config, store: Arc<dyn DocumentStore>) -> Self {
        let retry = RetryContext::new(config.retry);
        let queue = WriteQueue::new(config.queue);
        let registration_credential = config
            .registration_token
            .as_deref()
            .map(Credential::new);

        Self {
            inner: Arc::new(SchedulerRef {
                config,
                store,
                retry,
                queue,
                state: LocalState::new(),
                registration_credential,
            }),
        }
    }

    /// Creates a scheduler talking to the contents API described by `config`.
    pub fn from_config(config: Config) -> Result<Self, Error> {
        let store = ContentsApiStore::new(&config)?;

        Ok(Self::new(config, Arc::new(store)))
    }

    /// Configuration this scheduler was built with.
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Observable cache and credential.
    pub fn state(&self) -> &LocalState {
        &self.inner.state
    }

    /// Read the document, from cache when allowed and fresh, otherwise from the store.
    ///
    /// A fetched document replaces the local state and is published to subscribers.
    ///
    /// # Returns
    /// - `Ok(Arc<Document>)` - Cached or freshly fetched document
    /// - `Err(Error)` - Fetch failed after retries; the cache is left unchanged
    pub async fn load_document(&self, policy: CachePolicy) -> Result<Arc<Document>, Error> {
        let state = &self.inner.state;

        if policy == CachePolicy::PreferCache
            && !state.is_stale(self.inner.config.cache_max_age).await
        {
            if let Some(document) = state.document().await {
                return Ok(document);
            }
        }

        let credential = match state.credential().await {
            Some(credential) => Some(credential),
            None => self.inner.registration_credential.clone(),
        };
        let credential = credential.as_ref();
        let store = self.inner.store.as_ref();

        let VersionedDocument { document, version } = self
            .inner
            .retry
            .execute_with_retry("document load", move || async move {
                store.fetch_document(credential).await.map_err(Error::from)
            })
            .await?;

        tracing::debug!("Loaded document version {}", version);

        Ok(state.set_document(document, version).await)
    }

    /// Verify an officer token with the store and keep it for mutations.
    ///
    /// The check is a single attempt; a rejected token is not stored.
    pub async fn authenticate(&self, token: &str) -> Result<(), Error> {
        let credential = Credential::new(token);
        if credential.expose().is_empty() {
            return Err(ValidationError::MissingField("token").into());
        }

        self.inner.store.verify_credential(&credential).await?;
        self.inner.state.set_credential(credential).await;

        tracing::info!("Officer credential verified");

        Ok(())
    }

    /// Forget the officer credential.
    pub async fn sign_out(&self) {
        self.inner.state.invalidate_credential().await;
    }

    /// Insert or update a member. Requires a signed-in officer.
    pub async fn upsert_member(
        &self,
        submission: MemberSubmission,
    ) -> Result<Committed<UpsertOutcome>, Error> {
        submission.validate()?;
        let credential = self.officer_credential().await?;

        self.commit(
            format!("upsert member {}", submission.username.trim()),
            credential,
            move |document, now| mutation::upsert_member(document, &submission, now),
        )
        .await
    }

    /// Remove a member by id. Requires a signed-in officer.
    pub async fn delete_member(&self, id: i64) -> Result<Committed<Member>, Error> {
        let credential = self.officer_credential().await?;

        self.commit(format!("delete member {}", id), credential, move |document, now| {
            mutation::delete_member(document, id, now)
        })
        .await
    }

    /// Submit a registration application.
    ///
    /// Uses the configured registration token, or the officer credential when none is
    /// configured.
    pub async fn submit_registration(
        &self,
        submission: RegistrationSubmission,
    ) -> Result<Committed<RegistrationApplication>, Error> {
        submission.validate()?;

        let credential = match &self.inner.registration_credential {
            Some(credential) => credential.clone(),
            None => self.officer_credential().await?,
        };

        self.commit(
            format!("register {}", submission.username.trim()),
            credential,
            move |document, now| mutation::append_registration(document, &submission, now),
        )
        .await
    }

    /// Approve or decline a registration application. Requires a signed-in officer.
    pub async fn set_registration_status(
        &self,
        id: i64,
        status: RegistrationStatus,
    ) -> Result<Committed<RegistrationApplication>, Error> {
        if status == RegistrationStatus::Pending {
            return Err(ValidationError::InvalidReviewStatus(status).into());
        }
        let credential = self.officer_credential().await?;

        self.commit(
            format!("{} registration {}", status, id),
            credential,
            move |document, now| mutation::set_registration_status(document, id, status, now),
        )
        .await
    }

    /// Number of mutations waiting behind the one in flight.
    pub async fn pending_writes(&self) -> usize {
        self.inner.queue.len().await
    }

    /// Cancel mutations that have not started; their callers get [`Error::JobCancelled`].
    pub async fn clear_pending_writes(&self) -> usize {
        self.inner.queue.clear().await
    }

    /// Stop accepting mutations and cancel the queued ones.
    pub async fn shutdown(&self) {
        self.inner.queue.shutdown().await;
    }

    async fn officer_credential(&self) -> Result<Credential, Error> {
        self.inner.state.credential().await.ok_or_else(|| {
            StoreError::Unauthorized("officer sign-in required".to_string()).into()
        })
    }

    async fn commit<R, M>(
        &self,
        description: String,
        credential: Credential,
        mutation: M,
    ) -> Result<Committed<R>, Error>
    where
        R: Send + 'static,
        M: Fn(&mut Document, DateTime<Utc>) -> Result<Applied<R>, Error> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);

        self.inner
            .queue
            .enqueue(description, move || async move {
                let writer = DocumentWriter::new(
                    inner.store.as_ref(),
                    inner.retry,
                    inner.config.conflict_policy,
                );

                writer.apply(&credential, mutation).await
            })
            .await
    }
}
