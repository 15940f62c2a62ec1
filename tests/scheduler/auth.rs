//! Tests for officer authentication and the no-retry rule for auth failures.

use std::sync::Arc;

use alliance_scheduler::{
    model::MemberSubmission, state::StateEvent, store::Credential, ErrorKind,
};
use alliance_scheduler_test_utils::{
    fixtures::factory::{mock_document, mock_member},
    prelude::*,
};

use crate::{
    scheduler::foo_store,
    util::{http_scheduler, scheduler_with_store},
};

mod authenticate {
    use super::*;

    /// Tests that a verified token is kept and announced.
    ///
    /// Expected: authenticated state and an AuthChanged event
    #[tokio::test]
    async fn stores_verified_credential() {
        let setup = TestBuilder::new().with_user_endpoint(200, 1).build().await;
        let scheduler = http_scheduler(&setup);
        let mut events = scheduler.state().subscribe();

        scheduler.authenticate(TEST_TOKEN).await.unwrap();

        assert!(scheduler.state().is_authenticated().await);
        assert!(matches!(
            events.recv().await.unwrap(),
            StateEvent::AuthChanged { authenticated: true }
        ));
        setup.assert_mocks();
    }

    /// Tests that a rejected token is checked once and not stored.
    ///
    /// Expected: Err(Unauthorized), one request, not authenticated
    #[tokio::test]
    async fn rejects_bad_token_without_retry() {
        let setup = TestBuilder::new().with_user_endpoint(401, 1).build().await;
        let scheduler = http_scheduler(&setup);

        let err = scheduler.authenticate("expired").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert!(err.requires_reauthentication());
        assert!(!scheduler.state().is_authenticated().await);
        setup.assert_mocks();
    }

    /// Tests that a blank token never reaches the store.
    ///
    /// Expected: Err(ValidationFailed), no request
    #[tokio::test]
    async fn rejects_blank_token() {
        let setup = TestBuilder::new().with_user_endpoint(200, 0).build().await;
        let scheduler = http_scheduler(&setup);

        let err = scheduler.authenticate("   ").await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
        setup.assert_mocks();
    }

    /// Tests that signing out clears the credential.
    ///
    /// Expected: not authenticated after sign out
    #[tokio::test]
    async fn sign_out_clears_credential() {
        let scheduler = scheduler_with_store(Arc::new(foo_store()));
        scheduler.authenticate(TEST_TOKEN).await.unwrap();

        scheduler.sign_out().await;

        assert!(!scheduler.state().is_authenticated().await);
        assert!(scheduler.state().credential().await.is_none());
    }
}

mod unauthorized {
    use super::*;

    /// Tests that officer mutations without a credential fail before any store call.
    ///
    /// Expected: Err(Unauthorized), zero fetches and writes
    #[tokio::test]
    async fn mutation_requires_sign_in() {
        let store = Arc::new(foo_store());
        let scheduler = scheduler_with_store(store.clone());

        let upsert = scheduler
            .upsert_member(MemberSubmission::new("Foo").car_power(200))
            .await;
        let delete = scheduler.delete_member(1).await;

        assert_eq!(upsert.unwrap_err().kind(), ErrorKind::Unauthorized);
        assert_eq!(delete.unwrap_err().kind(), ErrorKind::Unauthorized);
        assert_eq!(store.fetch_count(), 0);
        assert_eq!(store.write_count(), 0);
    }

    /// Tests that a write rejected with 401 is attempted exactly once.
    ///
    /// Expected: Err(Unauthorized), one GET and one PUT
    #[tokio::test]
    async fn write_rejection_is_not_retried() {
        let document = mock_document(vec![mock_member(1, "Foo", 100, 5)], vec![]);
        let setup = TestBuilder::new()
            .with_user_endpoint(200, 1)
            .with_document_endpoint(document, TEST_SHA, 1)
            .with_status_endpoint("PUT", 401, 1)
            .build()
            .await;
        let scheduler = http_scheduler(&setup);
        scheduler.authenticate(TEST_TOKEN).await.unwrap();

        let err = scheduler
            .upsert_member(MemberSubmission::new("foo").car_power(200))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert_eq!(err.attempts(), None);
        assert!(err.requires_reauthentication());
        setup.assert_mocks();
    }

    /// Tests that a read rejected with 403 is attempted exactly once.
    ///
    /// Expected: Err(Forbidden), one GET, no PUT
    #[tokio::test]
    async fn forbidden_fetch_is_not_retried() {
        let setup = TestBuilder::new()
            .with_user_endpoint(200, 1)
            .with_status_endpoint("GET", 403, 1)
            .with_status_endpoint("PUT", 200, 0)
            .build()
            .await;
        let scheduler = http_scheduler(&setup);
        scheduler.authenticate(TEST_TOKEN).await.unwrap();

        let err = scheduler.delete_member(1).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Forbidden);
        setup.assert_mocks();
    }

    /// Tests that a store requiring a different credential rejects the write.
    ///
    /// Expected: Err(Unauthorized) and the document unchanged
    #[tokio::test]
    async fn memory_store_rejects_wrong_credential() {
        let store = Arc::new(foo_store().require_credential(Credential::new("right")));
        let scheduler = scheduler_with_store(store.clone());
        assert!(scheduler.authenticate("wrong").await.is_err());

        assert_eq!(store.snapshot().await.unwrap().members.len(), 1);
        assert_eq!(store.write_count(), 0);
    }
}
