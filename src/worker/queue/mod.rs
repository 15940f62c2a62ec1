//! Serialized FIFO write queue.
//!
//! This module provides the `WriteQueue` that runs one job at a time, in submission order, so a
//! client never has two store writes in flight at once. Jobs are queued in memory and picked up
//! by a single dispatcher task which is spawned on the first enqueue. Each job runs in its own
//! task so a panicking job only fails its own caller; the dispatcher then waits the configured
//! inter-job delay before starting the next one.
//!
//! Dropping the last `WriteQueue` handle aborts the dispatcher. Jobs still queued at that point
//! are dropped and their callers receive [`Error::JobCancelled`].

#[cfg(test)]
mod tests;

use std::{
    collections::VecDeque,
    future::Future,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, OnceLock,
    },
};

use dioxus_logger::tracing;
use futures::future::{BoxFuture, FutureExt};
use tokio::{
    sync::{oneshot, Mutex, Notify},
    task::JoinHandle,
};

use crate::{config::WriteQueueConfig, error::Error};

type JobFn = Box<dyn FnOnce() -> BoxFuture<'static, ()> + Send>;

struct QueuedJob {
    description: String,
    run: JobFn,
}

/// State shared between queue handles and the dispatcher task.
struct QueueShared {
    config: WriteQueueConfig,
    jobs: Mutex<VecDeque<QueuedJob>>,
    job_available: Notify,
    shutdown: Notify,
    closed: AtomicBool,
}

/// Owner of the dispatcher task; aborts it when the last queue handle goes away.
struct QueueRef {
    shared: Arc<QueueShared>,
    dispatcher: OnceLock<JoinHandle<()>>,
}

impl Drop for QueueRef {
    fn drop(&mut self) {
        if let Some(handle) = self.dispatcher.get() {
            handle.abort();
        }
    }
}

/// Serialized write queue.
///
/// Cheap to clone; all clones feed the same dispatcher.
#[derive(Clone)]
pub struct WriteQueue {
    inner: Arc<QueueRef>,
}

impl WriteQueue {
    /// Creates a new write queue.
    ///
    /// No task is spawned until the first job is enqueued, so this may be called outside a
    /// tokio runtime.
    pub fn new(config: WriteQueueConfig) -> Self {
        Self {
            inner: Arc::new(QueueRef {
                shared: Arc::new(QueueShared {
                    config,
                    jobs: Mutex::new(VecDeque::new()),
                    job_available: Notify::new(),
                    shutdown: Notify::new(),
                    closed: AtomicBool::new(false),
                }),
                dispatcher: OnceLock::new(),
            }),
        }
    }

    /// Queue `job` and wait for its result.
    ///
    /// The job starts only after every previously enqueued job has completed and the
    /// inter-job delay has elapsed.
    ///
    /// # Arguments
    /// - `description` - Label used in logs and in the cancellation error
    /// - `job` - Produces the future performing the write
    ///
    /// # Returns
    /// - `Ok(T)` / `Err(Error)` - Whatever the job returned
    /// - `Err(Error::JobCancelled)` - The job was cleared, the queue was shut down, or the job
    ///   panicked
    pub async fn enqueue<T, F, Fut>(&self, description: impl Into<String>, job: F) -> Result<T, Error>
    where
        T: Send + 'static,
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<T, Error>> + Send + 'static,
    {
        let description = description.into();
        let shared = &self.inner.shared;

        let (tx, rx) = oneshot::channel();
        let run: JobFn = Box::new(move || {
            async move {
                // The caller may have stopped waiting; the write still happened.
                let _ = tx.send(job().await);
            }
            .boxed()
        });

        {
            // `closed` only flips while the jobs lock is held, so a job pushed here is always
            // seen by the dispatcher or drained by `shutdown`.
            let mut jobs = shared.jobs.lock().await;
            if shared.closed.load(Ordering::SeqCst) {
                return Err(Error::JobCancelled(description));
            }
            jobs.push_back(QueuedJob {
                description: description.clone(),
                run,
            });
            tracing::debug!("Queued write \"{}\" ({} pending)", description, jobs.len());
        }

        self.ensure_dispatcher();
        shared.job_available.notify_one();

        rx.await.map_err(|_| Error::JobCancelled(description))?
    }

    /// Number of jobs waiting to start. The job currently running is not counted.
    pub async fn len(&self) -> usize {
        self.inner.shared.jobs.lock().await.len()
    }

    /// Whether no job is waiting to start.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drop every job that has not started yet and return how many were dropped.
    ///
    /// Their callers receive [`Error::JobCancelled`]. A job already running is unaffected.
    pub async fn clear(&self) -> usize {
        let dropped: Vec<QueuedJob> = self.inner.shared.jobs.lock().await.drain(..).collect();

        if !dropped.is_empty() {
            tracing::info!("Cleared {} pending write(s)", dropped.len());
        }

        dropped.len()
    }

    /// Stop accepting jobs, cancel queued ones, and stop the dispatcher.
    ///
    /// A job already running is allowed to finish. Idempotent.
    pub async fn shutdown(&self) {
        let shared = &self.inner.shared;

        let cancelled = {
            let mut jobs = shared.jobs.lock().await;
            if shared.closed.swap(true, Ordering::SeqCst) {
                tracing::debug!("Write queue is already shut down");
                return;
            }
            jobs.drain(..).count()
        };
        shared.shutdown.notify_one();

        tracing::info!(
            "Write queue shut down ({} queued write(s) cancelled)",
            cancelled
        );
    }

    fn ensure_dispatcher(&self) {
        self.inner.dispatcher.get_or_init(|| {
            let shared = Arc::clone(&self.inner.shared);
            tokio::spawn(Self::dispatch(shared))
        });
    }

    async fn dispatch(shared: Arc<QueueShared>) {
        tracing::debug!("Write queue dispatcher started");

        loop {
            let next = shared.jobs.lock().await.pop_front();

            let QueuedJob { description, run } = match next {
                Some(job) => job,
                None => {
                    tokio::select! {
                        biased;

                        _ = shared.shutdown.notified() => break,
                        _ = shared.job_available.notified() => {}
                    }
                    continue;
                }
            };

            tracing::debug!("Running queued write \"{}\"", description);

            match tokio::spawn(run()).await {
                Ok(()) => tracing::debug!("Queued write \"{}\" finished", description),
                Err(e) if e.is_panic() => {
                    tracing::error!("Queued write \"{}\" panicked", description)
                }
                Err(e) => tracing::warn!("Queued write \"{}\" was aborted: {:?}", description, e),
            }

            if shared.closed.load(Ordering::SeqCst) {
                break;
            }

            tokio::time::sleep(shared.config.inter_job_delay).await;
        }

        tracing::debug!("Write queue dispatcher stopped");
    }
}
