//! Tests for the trip service.

use std::sync::Arc;

use rstest::rstest;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::MockTripRepository;
use crate::domain::test_fixtures::{caller, fixture_clock, fixture_timestamp};

fn trip(driver_id: Uuid, status: TripStatus) -> Trip {
    Trip {
        id: Uuid::new_v4(),
        load_id: Uuid::new_v4(),
        truck_id: Uuid::new_v4(),
        driver_id,
        start_time: None,
        pickup_time: None,
        delivery_time: None,
        status,
        created_at: fixture_timestamp(),
    }
}

fn service(repo: MockTripRepository) -> TripService {
    TripService::new(Arc::new(repo), fixture_clock())
}

#[rstest]
#[case(Role::Admin, true)]
#[case(Role::Driver, false)]
#[case(Role::FleetOwner, false)]
#[tokio::test]
async fn listing_scope_follows_role(#[case] role: Role, #[case] sees_all: bool) {
    let user = caller(role);
    let user_id = user.id;
    let mut repo = MockTripRepository::new();
    repo.expect_list_trips()
        .withf(move |scope| {
            if sees_all {
                *scope == TripScope::All
            } else {
                *scope == TripScope::Participant(user_id)
            }
        })
        .return_once(|_| Ok(Vec::new()));

    service(repo).list_trips(&user).await.expect("listed");
}

#[tokio::test]
async fn second_trip_for_load_conflicts() {
    let mut repo = MockTripRepository::new();
    repo.expect_create_trip()
        .return_once(|_| Err(TripRepositoryError::conflict("trips_load_id_key")));

    let err = service(repo)
        .create_trip(
            &caller(Role::Shipper),
            TripDraft {
                load_id: Uuid::new_v4(),
                truck_id: Uuid::new_v4(),
                driver_id: Uuid::new_v4(),
            },
        )
        .await
        .expect_err("conflict");

    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn driver_moves_own_trip_forward() {
    let driver = caller(Role::Driver);
    let current = trip(driver.id, TripStatus::InTransit);
    let trip_id = current.id;
    let mut repo = MockTripRepository::new();
    repo.expect_find_trip()
        .return_once(move |_| Ok(Some(current)));
    repo.expect_apply_transition()
        .withf(move |transition| {
            transition.trip_id == trip_id
                && transition.from == TripStatus::InTransit
                && transition.to == TripStatus::Delivered
                && transition.delivers_load()
                && transition.at == fixture_timestamp()
        })
        .return_once(move |transition| {
            let mut moved = trip(transition.driver_id, transition.from);
            moved.id = transition.trip_id;
            transition.apply(&mut moved);
            Ok(Some(moved))
        });

    let updated = service(repo)
        .update_status(&driver, trip_id, TripStatus::Delivered)
        .await
        .expect("delivered");

    assert_eq!(updated.status, TripStatus::Delivered);
    assert_eq!(updated.delivery_time, Some(fixture_timestamp()));
}

#[tokio::test]
async fn other_drivers_trip_looks_absent() {
    let driver = caller(Role::Driver);
    let foreign = trip(Uuid::new_v4(), TripStatus::Assigned);
    let trip_id = foreign.id;
    let mut repo = MockTripRepository::new();
    repo.expect_find_trip()
        .return_once(move |_| Ok(Some(foreign)));
    repo.expect_apply_transition().times(0);

    let err = service(repo)
        .update_status(&driver, trip_id, TripStatus::PickedUp)
        .await
        .expect_err("hidden");

    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "Trip not found or unauthorized");
    assert!(err.details().is_none());
}

#[rstest]
#[case(TripStatus::Assigned, TripStatus::Delivered)]
#[case(TripStatus::InTransit, TripStatus::PickedUp)]
#[case(TripStatus::Delivered, TripStatus::Delivered)]
#[tokio::test]
async fn illegal_moves_conflict_without_writing(#[case] from: TripStatus, #[case] to: TripStatus) {
    let driver = caller(Role::Driver);
    let current = trip(driver.id, from);
    let trip_id = current.id;
    let mut repo = MockTripRepository::new();
    repo.expect_find_trip()
        .return_once(move |_| Ok(Some(current)));
    repo.expect_apply_transition().times(0);

    let err = service(repo)
        .update_status(&driver, trip_id, to)
        .await
        .expect_err("illegal");

    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn lost_race_is_a_conflict() {
    let driver = caller(Role::Driver);
    let current = trip(driver.id, TripStatus::Assigned);
    let trip_id = current.id;
    let mut repo = MockTripRepository::new();
    repo.expect_find_trip()
        .return_once(move |_| Ok(Some(current)));
    repo.expect_apply_transition().return_once(|_| Ok(None));

    let err = service(repo)
        .update_status(&driver, trip_id, TripStatus::PickedUp)
        .await
        .expect_err("raced");

    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn pod_is_recorded_against_the_trip() {
    let driver = caller(Role::Driver);
    let current = trip(driver.id, TripStatus::Delivered);
    let trip_id = current.id;
    let mut repo = MockTripRepository::new();
    repo.expect_find_trip()
        .return_once(move |_| Ok(Some(current)));
    repo.expect_add_document()
        .withf(move |doc| {
            doc.owner_id == trip_id
                && doc.owner_type == TRIP_DOCUMENT_OWNER
                && doc.doc_type == PROOF_OF_DELIVERY
                && doc.file_ref == "s3://pod/1.jpg"
        })
        .return_once(|_| Ok(()));

    let document = service(repo)
        .upload_pod(
            &driver,
            trip_id,
            PodUpload {
                file_ref: "s3://pod/1.jpg".to_owned(),
                notes: Some("left at gate".to_owned()),
            },
        )
        .await
        .expect("uploaded");

    assert!(!document.verified);
}

#[tokio::test]
async fn missing_details_are_not_found() {
    let mut repo = MockTripRepository::new();
    repo.expect_trip_details().return_once(|_| Ok(None));

    let err = service(repo)
        .trip_details(Uuid::new_v4())
        .await
        .expect_err("absent");

    assert_eq!(err.code(), ErrorCode::NotFound);
}
