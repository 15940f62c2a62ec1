//! Tests for the scheduler's mutation operations.

use std::sync::Arc;

use alliance_scheduler::{
    model::{MemberSubmission, RegistrationStatus, RegistrationSubmission},
    service::UpsertKind,
    store::{MemoryStore, VersionToken},
    CachePolicy, Error, ErrorKind, Scheduler,
};
use alliance_scheduler_test_utils::{
    fixtures::factory::{mock_document, mock_member},
    prelude::*,
};

use crate::{
    scheduler::foo_store,
    util::{http_scheduler, new_member, scheduler_with_store, test_config},
};

async fn signed_in(store: Arc<MemoryStore>) -> Scheduler {
    let scheduler = scheduler_with_store(store);
    scheduler.authenticate(TEST_TOKEN).await.unwrap();
    scheduler
}

fn registration(username: &str) -> RegistrationSubmission {
    RegistrationSubmission {
        username: username.to_string(),
        car_power: 7_000_000,
        tower_level: 25,
        daily_points: 1_500,
        why_join: "Strong team".to_string(),
        motivation: "Daily".to_string(),
        ..Default::default()
    }
}

mod upsert_member {
    use super::*;

    /// Tests the full HTTP cycle of a quick update matched by normalized username.
    ///
    /// Expected: one GET, one PUT based on the fetched sha, the new sha returned, local state
    /// untouched
    #[tokio::test]
    async fn quick_update_over_http() {
        let document = mock_document(vec![mock_member(1, "Foo", 100, 5)], vec![]);
        let setup = TestBuilder::new()
            .with_user_endpoint(200, 1)
            .with_document_endpoint(document, TEST_SHA, 1)
            .with_write_endpoint(TEST_SHA, TEST_NEXT_SHA, 1)
            .build()
            .await;
        let scheduler = http_scheduler(&setup);
        scheduler.authenticate(TEST_TOKEN).await.unwrap();

        let committed = scheduler
            .upsert_member(MemberSubmission::new("foo").car_power(200))
            .await
            .unwrap();

        assert_eq!(committed.version, VersionToken::new(TEST_NEXT_SHA));
        assert_eq!(committed.value.kind, UpsertKind::QuickUpdated);
        assert_eq!(committed.value.member.id, 1);
        assert_eq!(committed.value.member.username, "Foo");
        assert_eq!(committed.value.member.car_power, 200);
        assert_eq!(committed.value.member.tower_level, 5);
        assert!(scheduler.state().document().await.is_none());
        setup.assert_mocks();
    }

    /// Tests that the committed quick update is what a reload observes.
    ///
    /// Expected: stored member keeps id, username, and tower level
    #[tokio::test]
    async fn quick_update_is_visible_after_reload() {
        let store = Arc::new(foo_store());
        let scheduler = signed_in(store.clone()).await;

        scheduler
            .upsert_member(MemberSubmission::new("FOO").car_power(200))
            .await
            .unwrap();
        let reloaded = scheduler.load_document(CachePolicy::Refresh).await.unwrap();

        let foo = reloaded.member_by_id(1).unwrap();
        assert_eq!(foo.username, "Foo");
        assert_eq!(foo.car_power, 200);
        assert_eq!(foo.tower_level, 5);
        assert!(reloaded.last_updated.is_some());
        assert_eq!(store.write_count(), 1);
    }

    /// Tests that a new username is inserted with a fresh id.
    ///
    /// Expected: Inserted, two members stored
    #[tokio::test]
    async fn inserts_new_member() {
        let store = Arc::new(foo_store());
        let scheduler = signed_in(store.clone()).await;

        let committed = scheduler
            .upsert_member(new_member("Newcomer", 55_000))
            .await
            .unwrap();

        assert!(committed.value.kind.is_insert());
        assert_ne!(committed.value.member.id, 1);
        assert_eq!(store.current_version().await, Some(committed.version));
        assert_eq!(store.snapshot().await.unwrap().members.len(), 2);
    }

    /// Tests that invalid input is rejected before the store is touched.
    ///
    /// Expected: Err(ValidationFailed), no fetch
    #[tokio::test]
    async fn invalid_submission_never_reaches_store() {
        let store = Arc::new(foo_store());
        let scheduler = signed_in(store.clone()).await;

        let err = scheduler
            .upsert_member(MemberSubmission::new("Foo").tower_level(40))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
        assert_eq!(store.fetch_count(), 0);
    }

    /// Tests that an incomplete new member is rejected after the fetch, without a write.
    ///
    /// Expected: Err(ValidationFailed), one fetch, no write
    #[tokio::test]
    async fn incomplete_new_member_is_not_written() {
        let store = Arc::new(foo_store());
        let scheduler = signed_in(store.clone()).await;

        let err = scheduler
            .upsert_member(MemberSubmission::new("Stranger").car_power(10))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
        assert_eq!(store.fetch_count(), 1);
        assert_eq!(store.write_count(), 0);
    }
}

mod delete_member {
    use super::*;

    /// Tests that deleting the same id twice succeeds once.
    ///
    /// Expected: first Ok with the removed member, second Err(NotFound) without a write
    #[tokio::test]
    async fn second_delete_is_not_found() {
        let store = Arc::new(foo_store());
        let scheduler = signed_in(store.clone()).await;

        let first = scheduler.delete_member(1).await.unwrap();
        let second = scheduler.delete_member(1).await;

        assert_eq!(first.value.username, "Foo");
        assert!(matches!(second, Err(Error::MemberNotFound(1))));
        assert_eq!(store.write_count(), 1);
        assert!(store.snapshot().await.unwrap().members.is_empty());
    }
}

mod registration {
    use super::*;

    /// Tests that applicants submit with the registration token without signing in.
    ///
    /// Expected: pending application stored, no member added
    #[tokio::test]
    async fn submits_with_registration_token() {
        let store = Arc::new(foo_store());
        let mut config = test_config("http://unused.invalid");
        config.registration_token = Some(TEST_REGISTRATION_TOKEN.to_string());
        let scheduler = Scheduler::new(config, store.clone());

        let committed = scheduler
            .submit_registration(registration("Applicant"))
            .await
            .unwrap();

        assert_eq!(committed.value.status, RegistrationStatus::Pending);
        let stored = store.snapshot().await.unwrap();
        assert_eq!(stored.registrations.len(), 1);
        assert_eq!(stored.members.len(), 1);
    }

    /// Tests that without a registration token an officer credential is required.
    ///
    /// Expected: Err(Unauthorized), no fetch
    #[tokio::test]
    async fn requires_some_credential() {
        let store = Arc::new(foo_store());
        let scheduler = scheduler_with_store(store.clone());

        let err = scheduler
            .submit_registration(registration("Applicant"))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert_eq!(store.fetch_count(), 0);
    }

    /// Tests the review flow from submission to decline.
    ///
    /// Expected: status declined with reviewedAt, unknown ids NotFound, pending rejected early
    #[tokio::test]
    async fn officer_reviews_application() {
        let store = Arc::new(foo_store());
        let scheduler = signed_in(store.clone()).await;
        let id = scheduler
            .submit_registration(registration("Applicant"))
            .await
            .unwrap()
            .value
            .id;

        let declined = scheduler
            .set_registration_status(id, RegistrationStatus::Declined)
            .await
            .unwrap();
        let missing = scheduler
            .set_registration_status(id + 1, RegistrationStatus::Approved)
            .await;
        let writes_before = store.write_count();
        let pending = scheduler
            .set_registration_status(id, RegistrationStatus::Pending)
            .await;

        assert_eq!(declined.value.status, RegistrationStatus::Declined);
        assert!(declined.value.reviewed_at.is_some());
        assert!(matches!(missing, Err(Error::RegistrationNotFound(_))));
        assert_eq!(pending.unwrap_err().kind(), ErrorKind::ValidationFailed);
        assert_eq!(store.write_count(), writes_before);

        let stored = store.snapshot().await.unwrap();
        assert_eq!(stored.pending_registrations().count(), 0);
        assert_eq!(stored.members.len(), 1);
    }
}
