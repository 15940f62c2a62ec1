//! Tests for the serialized write queue.


use std::time::Duration;

use crate::{config::WriteQueueConfig, worker::queue::WriteQueue};

fn queue_with_delay(delay: Duration) -> WriteQueue {
    WriteQueue::new(WriteQueueConfig {
        inter_job_delay: delay,
    })
}

/// Yield until `queue` holds `expected` waiting jobs.
async fn wait_for_len(queue: &WriteQueue, expected: usize) {
    for _ in 0..1000 {
        if queue.len().await == expected {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("queue never reached {} pending jobs", expected);
}
