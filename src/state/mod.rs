//! Observable client-side state.
//!
//! Holds the last successfully loaded document, its version, when it was fetched, and the
//! officer credential. Changes are published on a broadcast channel so any number of views can
//! follow them. Nothing here is ever used as the base of a write.

use std::{sync::Arc, time::Duration};

use dioxus_logger::tracing;
use tokio::{
    sync::{broadcast, RwLock},
    time::Instant,
};

use crate::{
    model::Document,
    store::{Credential, VersionToken},
};

const EVENT_CAPACITY: usize = 64;

/// Change notification published by [`LocalState`].
#[derive(Debug, Clone)]
pub enum StateEvent {
    /// The officer credential was stored or cleared.
    AuthChanged {
        /// Whether a credential is now stored.
        authenticated: bool,
    },
    /// A newer document snapshot was loaded.
    DocumentChanged {
        /// The loaded document.
        document: Arc<Document>,
        /// Its version.
        version: VersionToken,
    },
}

#[derive(Debug, Clone)]
struct Snapshot {
    document: Arc<Document>,
    version: VersionToken,
    fetched_at: Instant,
}

#[derive(Default)]
struct StateInner {
    credential: Option<Credential>,
    snapshot: Option<Snapshot>,
}

/// Cached document and credential with change notification.
pub struct LocalState {
    inner: RwLock<StateInner>,
    events: broadcast::Sender<StateEvent>,
}

impl LocalState {
    /// Empty state: no document, signed out.
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            inner: RwLock::new(StateInner::default()),
            events,
        }
    }

    /// Receive every event published after this call.
    ///
    /// A receiver that falls more than the channel capacity behind skips the oldest events.
    pub fn subscribe(&self) -> broadcast::Receiver<StateEvent> {
        self.events.subscribe()
    }

    /// Replace the cached document and notify subscribers.
    pub async fn set_document(&self, document: Document, version: VersionToken) -> Arc<Document> {
        let document = Arc::new(document);

        self.inner.write().await.snapshot = Some(Snapshot {
            document: Arc::clone(&document),
            version: version.clone(),
            fetched_at: Instant::now(),
        });

        self.publish(StateEvent::DocumentChanged {
            document: Arc::clone(&document),
            version,
        });

        document
    }

    /// Last loaded document, if any.
    pub async fn document(&self) -> Option<Arc<Document>> {
        self.inner
            .read()
            .await
            .snapshot
            .as_ref()
            .map(|s| Arc::clone(&s.document))
    }

    /// Version of the last loaded document, if any.
    pub async fn version(&self) -> Option<VersionToken> {
        self.inner
            .read()
            .await
            .snapshot
            .as_ref()
            .map(|s| s.version.clone())
    }

    /// Whether no document is cached or the cached one is older than `max_age`.
    pub async fn is_stale(&self, max_age: Duration) -> bool {
        match &self.inner.read().await.snapshot {
            Some(snapshot) => snapshot.fetched_at.elapsed() > max_age,
            None => true,
        }
    }

    /// Store the officer credential.
    pub async fn set_credential(&self, credential: Credential) {
        self.inner.write().await.credential = Some(credential);
        self.publish(StateEvent::AuthChanged {
            authenticated: true,
        });
    }

    /// Current officer credential, if signed in.
    pub async fn credential(&self) -> Option<Credential> {
        self.inner.read().await.credential.clone()
    }

    /// Whether an officer credential is stored.
    pub async fn is_authenticated(&self) -> bool {
        self.inner.read().await.credential.is_some()
    }

    /// Forget the officer credential, e.g. after the store rejected it.
    ///
    /// Returns whether a credential was present.
    pub async fn invalidate_credential(&self) -> bool {
        let removed = self.inner.write().await.credential.take().is_some();

        if removed {
            tracing::info!("Officer credential cleared");
            self.publish(StateEvent::AuthChanged {
                authenticated: false,
            });
        }

        removed
    }

    fn publish(&self, event: StateEvent) {
        // No receivers is not an error; views subscribe lazily.
        let _ = self.events.send(event);
    }
}

impl Default for LocalState {
    fn default() -> Self {
        Self::new()
    }
}
