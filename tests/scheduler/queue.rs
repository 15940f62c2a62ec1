//! Tests for serialized execution of concurrent mutations.

use std::{sync::Arc, time::Duration};

use alliance_scheduler::{Error, Scheduler};
use alliance_scheduler_test_utils::prelude::*;

use crate::{
    scheduler::foo_store,
    util::{new_member, scheduler_with_store, store::RecordingStore},
};

async fn signed_in(store: Arc<RecordingStore>) -> Scheduler {
    let scheduler = scheduler_with_store(store);
    scheduler.authenticate(TEST_TOKEN).await.unwrap();
    scheduler
}

/// Tests that concurrent mutations from one client never write at the same time.
///
/// Expected: every mutation commits, at most one write in flight, no conflicts
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_mutations_write_one_at_a_time() {
    let store = Arc::new(RecordingStore::new(foo_store(), Duration::from_millis(15)));
    let scheduler = signed_in(store.clone()).await;

    let handles: Vec<_> = (0..6)
        .map(|i| {
            let scheduler = scheduler.clone();
            tokio::spawn(async move {
                scheduler
                    .upsert_member(new_member(&format!("Member {}", i), 1_000 + i))
                    .await
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(store.max_in_flight(), 1);
    assert_eq!(store.inner.write_count(), 6);
    assert_eq!(store.inner.snapshot().await.unwrap().members.len(), 7);
}

/// Tests that clearing pending writes cancels waiting mutations only.
///
/// Expected: running mutation commits, the two waiting ones get JobCancelled
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn clear_pending_writes_cancels_waiting_mutations() {
    let store = Arc::new(RecordingStore::new(foo_store(), Duration::from_millis(300)));
    let scheduler = signed_in(store.clone()).await;

    let running = tokio::spawn({
        let scheduler = scheduler.clone();
        async move { scheduler.upsert_member(new_member("Runner", 10)).await }
    });
    while store.inner.fetch_count() == 0 {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    let waiting: Vec<_> = ["Waiter A", "Waiter B"]
        .into_iter()
        .map(|name| {
            let scheduler = scheduler.clone();
            tokio::spawn(async move { scheduler.upsert_member(new_member(name, 20)).await })
        })
        .collect();
    while scheduler.pending_writes().await < 2 {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    assert_eq!(scheduler.clear_pending_writes().await, 2);

    assert!(running.await.unwrap().is_ok());
    for handle in waiting {
        assert!(matches!(handle.await.unwrap(), Err(Error::JobCancelled(_))));
    }
    assert_eq!(store.inner.write_count(), 1);
}

/// Tests that mutations after shutdown are refused.
///
/// Expected: Err(JobCancelled), no store access
#[tokio::test]
async fn shutdown_refuses_new_mutations() {
    let store = Arc::new(RecordingStore::new(foo_store(), Duration::ZERO));
    let scheduler = signed_in(store.clone()).await;

    scheduler.shutdown().await;
    let result = scheduler.delete_member(1).await;

    assert!(matches!(result, Err(Error::JobCancelled(_))));
    assert_eq!(store.inner.fetch_count(), 0);
}
