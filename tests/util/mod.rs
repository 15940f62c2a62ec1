pub mod store;

use std::{sync::Arc, time::Duration};

use alliance_scheduler::{
    config::{RepositoryConfig, RetryConfig, WriteQueueConfig},
    model::{Availability, Day, MemberSubmission, TimeSlot},
    store::DocumentStore,
    Config, Scheduler,
};
use alliance_scheduler_test_utils::{prelude::*, TestSetup};

/// Config pointed at the mock server with no backoff or inter-job delay.
pub fn test_config(api_url: &str) -> Config {
    let mut repository = RepositoryConfig::new(TEST_OWNER, TEST_REPO);
    repository.api_url = api_url.to_string();
    repository.path = TEST_DATA_PATH.to_string();
    repository.branch = Some(TEST_BRANCH.to_string());

    let mut config = Config::new(repository);
    config.user_agent = TEST_USER_AGENT.to_string();
    config.retry = RetryConfig {
        max_attempts: 3,
        initial_backoff: Duration::ZERO,
        attempt_timeout: Duration::from_secs(5),
    };
    config.queue = WriteQueueConfig {
        inter_job_delay: Duration::ZERO,
    };

    config
}

/// Scheduler talking to the mock contents API of `setup`.
pub fn http_scheduler(setup: &TestSetup) -> Scheduler {
    Scheduler::from_config(test_config(&setup.url())).expect("Failed to build scheduler")
}

/// Scheduler over any store, with test timings.
pub fn scheduler_with_store(store: Arc<dyn DocumentStore>) -> Scheduler {
    Scheduler::new(test_config("http://unused.invalid"), store)
}

/// Member submission with stats and timezone, creatable as a new member.
pub fn new_member(username: &str, car_power: u64) -> MemberSubmission {
    MemberSubmission::new(username)
        .car_power(car_power)
        .tower_level(10)
        .timezone("UTC+1")
        .availability(Availability::new().with_slot(Day::Wednesday, TimeSlot::Slot9))
}
