//! Tests for the dispute service.

use std::sync::Arc;

use rstest::rstest;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::MockDisputeRepository;
use crate::domain::test_fixtures::{caller, fixture_clock, fixture_timestamp};

fn dispute(raised_by_id: Uuid) -> Dispute {
    Dispute {
        id: Uuid::new_v4(),
        trip_id: None,
        load_id: None,
        raised_by_id,
        against_user_id: None,
        reason: "Late delivery".to_owned(),
        status: DisputeStatus::Open,
        resolution: None,
        created_at: fixture_timestamp(),
        updated_at: fixture_timestamp(),
    }
}

fn service(repo: MockDisputeRepository) -> DisputeService {
    DisputeService::new(Arc::new(repo), fixture_clock())
}

#[tokio::test]
async fn raised_dispute_is_open() {
    let mut repo = MockDisputeRepository::new();
    repo.expect_create_dispute().return_once(|_| Ok(()));

    let created = service(repo)
        .create_dispute(
            &caller(Role::Shipper),
            DisputeDraft {
                reason: "Damaged goods".to_owned(),
                trip_id: None,
                load_id: Some(Uuid::new_v4()),
                against_user_id: None,
            },
        )
        .await
        .expect("raised");

    assert_eq!(created.status, DisputeStatus::Open);
}

#[rstest]
#[case(Role::Admin)]
#[case(Role::Driver)]
#[tokio::test]
async fn listing_filter_depends_on_role(#[case] role: Role) {
    let user = caller(role);
    let user_id = user.id;
    let mut repo = MockDisputeRepository::new();
    repo.expect_list_disputes()
        .withf(move |filter| {
            if role == Role::Admin {
                filter.raised_by.is_none() && filter.status == Some(DisputeStatus::Open)
            } else {
                filter.raised_by == Some(user_id) && filter.status.is_none()
            }
        })
        .return_once(|_| Ok(Vec::new()));

    service(repo)
        .list_disputes(&user, Some(DisputeStatus::Open))
        .await
        .expect("listed");
}

#[tokio::test]
async fn other_users_dispute_is_forbidden() {
    let record = dispute(Uuid::new_v4());
    let id = record.id;
    let mut repo = MockDisputeRepository::new();
    repo.expect_find_dispute()
        .return_once(move |_| Ok(Some(record)));

    let err = service(repo)
        .get_dispute(&caller(Role::Driver), id)
        .await
        .expect_err("forbidden");

    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn resolution_requires_admin() {
    let mut repo = MockDisputeRepository::new();
    repo.expect_resolve_dispute().times(0);

    let err = service(repo)
        .resolve_dispute(
            &caller(Role::Shipper),
            Uuid::new_v4(),
            DisputeStatus::Resolved,
            None,
        )
        .await
        .expect_err("forbidden");

    assert_eq!(err.code(), ErrorCode::Forbidden);
}

#[tokio::test]
async fn resolving_missing_dispute_is_not_found() {
    let mut repo = MockDisputeRepository::new();
    repo.expect_resolve_dispute()
        .withf(|_, decision| {
            decision.status == DisputeStatus::Rejected && decision.at == fixture_timestamp()
        })
        .return_once(|_, _| Ok(None));

    let err = service(repo)
        .resolve_dispute(
            &caller(Role::Admin),
            Uuid::new_v4(),
            DisputeStatus::Rejected,
            Some("No evidence".to_owned()),
        )
        .await
        .expect_err("absent");

    assert_eq!(err.code(), ErrorCode::NotFound);
}
