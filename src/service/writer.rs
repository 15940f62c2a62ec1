//! Read-modify-write driver.
//!
//! Every mutation runs against the latest remote document, never a cached copy:
//!
//! 1. Fetch the document and its version token (with retry).
//! 2. Apply the mutation to the fetched document.
//! 3. Write the full result conditioned on the token from step 1 (with retry).
//!
//! A version conflict on step 3 means another writer won the race. By default it is surfaced to
//! the caller; [`ConflictPolicy::Reapply`] instead repeats steps 1-3 with the same mutation a
//! bounded number of times. The driver never updates local state; callers reload after a commit.
//!
//! A conflict on a retried write is ambiguous: the earlier attempt may have committed before its
//! response was lost. The driver then refetches and compares the latest document with the one it
//! sent. A match is reported as committed; otherwise it fails with [`Error::UnconfirmedWrite`]
//! and never reapplies.

use std::sync::atomic::{AtomicU32, Ordering};

use chrono::{DateTime, Utc};
use dioxus_logger::tracing;

use crate::{
    error::Error,
    model::Document,
    service::retry::RetryContext,
    store::{Credential, DocumentStore, VersionToken, VersionedDocument},
};

/// What to do when the conditional write loses to another writer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// Fail with `VersionConflict` and let the user resubmit.
    #[default]
    Surface,
    /// Refetch, reapply the same mutation to the newer document, and write again, at most
    /// `max_reapplies` times before surfacing the conflict.
    Reapply {
        /// Extra read-modify-write cycles allowed after the first conflict.
        max_reapplies: u32,
    },
}

/// Result of a mutation function: its logical value plus the change description.
#[derive(Debug, Clone)]
pub struct Applied<R> {
    /// Value returned to the caller once the write commits.
    pub value: R,
    /// Message recorded with the new version.
    pub message: String,
}

/// A mutation that was written to the store.
#[derive(Debug, Clone)]
pub struct Committed<R> {
    /// Value produced by the mutation.
    pub value: R,
    /// Version created by the write.
    pub version: VersionToken,
}

/// Runs mutations against a [`DocumentStore`] with optimistic concurrency.
pub struct DocumentWriter<'a> {
    store: &'a dyn DocumentStore,
    retry: RetryContext,
    policy: ConflictPolicy,
}

impl<'a> DocumentWriter<'a> {
    /// Creates a new instance of [`DocumentWriter`]
    pub fn new(store: &'a dyn DocumentStore, retry: RetryContext, policy: ConflictPolicy) -> Self {
        Self {
            store,
            retry,
            policy,
        }
    }

    /// Apply `mutation` to the latest document and write it back.
    ///
    /// `mutation` receives the freshly fetched document and the timestamp of this cycle. It may
    /// run more than once under [`ConflictPolicy::Reapply`], each time against a newer document.
    /// An error from `mutation` aborts before any write.
    ///
    /// # Returns
    /// - `Ok(Committed<R>)` - Mutation result and the new version
    /// - `Err(Error)` - Fetch, mutation, or write failure; `VersionConflict` when another writer
    ///   committed first and the policy does not allow (further) reapplication
    /// - `Err(Error::UnconfirmedWrite)` - A retried write conflicted and the latest document no
    ///   longer shows whether the earlier attempt committed
    pub async fn apply<R, M>(&self, credential: &Credential, mutation: M) -> Result<Committed<R>, Error>
    where
        M: Fn(&mut Document, DateTime<Utc>) -> Result<Applied<R>, Error>,
    {
        let store = self.store;
        let mut reapplies = 0;

        loop {
            let VersionedDocument {
                mut document,
                version,
            } = self.fetch_latest(credential).await?;

            let applied = mutation(&mut document, Utc::now())?;

            let write_attempts = AtomicU32::new(0);
            let written = {
                let document = &document;
                let version = &version;
                let message = applied.message.as_str();
                let write_attempts = &write_attempts;

                self.retry
                    .execute_with_retry(&format!("document write ({})", message), move || async move {
                        write_attempts.fetch_add(1, Ordering::SeqCst);
                        store
                            .write_document(document, version, message, credential)
                            .await
                            .map_err(Error::from)
                    })
                    .await
            };

            match written {
                Ok(new_version) => {
                    tracing::info!(
                        "Committed \"{}\" as version {} (based on {})",
                        applied.message,
                        new_version,
                        version
                    );

                    return Ok(Committed {
                        value: applied.value,
                        version: new_version,
                    });
                }
                // An earlier attempt may have committed before its response was lost, in which
                // case the conflict is against our own write.
                Err(e) if e.is_conflict() && write_attempts.load(Ordering::SeqCst) > 1 => {
                    let new_version = self
                        .confirm_write(credential, &document, &applied.message, e)
                        .await?;

                    return Ok(Committed {
                        value: applied.value,
                        version: new_version,
                    });
                }
                Err(e) if e.is_conflict() => match self.policy {
                    ConflictPolicy::Reapply { max_reapplies } if reapplies < max_reapplies => {
                        reapplies += 1;
                        tracing::warn!(
                            "Version {} was superseded while writing \"{}\", reapplying ({}/{})",
                            version,
                            applied.message,
                            reapplies,
                            max_reapplies
                        );
                    }
                    _ => {
                        tracing::warn!(
                            "Version {} was superseded while writing \"{}\"",
                            version,
                            applied.message
                        );
                        return Err(e);
                    }
                },
                Err(e) => return Err(e),
            }
        }
    }

    async fn fetch_latest(&self, credential: &Credential) -> Result<VersionedDocument, Error> {
        let store = self.store;

        self.retry
            .execute_with_retry("document fetch", move || async move {
                store
                    .fetch_document(Some(credential))
                    .await
                    .map_err(Error::from)
            })
            .await
    }

    /// Decide whether an unacknowledged write committed by comparing the latest document with
    /// the one that was sent.
    ///
    /// # Returns
    /// - `Ok(VersionToken)` - The latest document is the written one; its version
    /// - `Err(Error::UnconfirmedWrite)` - The document has moved on and the outcome is unknown
    async fn confirm_write(
        &self,
        credential: &Credential,
        written: &Document,
        message: &str,
        conflict: Error,
    ) -> Result<VersionToken, Error> {
        let latest = self.fetch_latest(credential).await?;

        if latest.document.to_json_pretty()? == written.to_json_pretty()? {
            tracing::info!(
                "Write \"{}\" was committed as version {} although its response was lost",
                message,
                latest.version
            );
            return Ok(latest.version);
        }

        tracing::warn!(
            "Write \"{}\" lost its response and the document has changed since; not reapplying",
            message
        );

        Err(Error::UnconfirmedWrite {
            message: message.to_string(),
            source: Box::new(conflict),
        })
    }
}
