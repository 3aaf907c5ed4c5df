//! Integration tests for `DieselLoadRepository` against embedded PostgreSQL.
//!
//! Assignment locks the load, checks the bid belongs to it, then writes the
//! load and the bid in one transaction. These tests pin down that a rejected
//! assignment leaves both rows untouched.

#[path = "support/embedded_postgres.rs"]
mod embedded_postgres;
#[path = "support/marketplace_rows.rs"]
mod marketplace_rows;

use rstest::{fixture, rstest};
use uuid::Uuid;

use fleetflow::domain::ports::{LoadRepository, LoadRepositoryError};
use fleetflow::domain::{Bid, BidStatus, LoadAssignment, LoadStatus, Role, Truck};
use fleetflow::outbound::persistence::DieselLoadRepository;

use embedded_postgres::{PgDatabase, pg_database};
use marketplace_rows::{at, bid, load, open_load, truck, user};

struct Board {
    repo: DieselLoadRepository,
    db: PgDatabase,
    shipper_id: Uuid,
    driver_id: Uuid,
    truck: Truck,
}

#[fixture]
fn board() -> Option<Board> {
    let db = pg_database()?;
    let pool = db.pool();
    let (shipper_id, driver_id, truck) = db.block_on(async {
        let shipper_id = user(&pool, Role::Shipper, "shipper@loads.test").await;
        let driver_id = user(&pool, Role::Driver, "driver@loads.test").await;
        let owner_id = user(&pool, Role::FleetOwner, "owner@loads.test").await;
        let truck = truck(&pool, owner_id, "MH12AB1234", driver_id).await;
        (shipper_id, driver_id, truck)
    });
    Some(Board {
        repo: DieselLoadRepository::new(pool),
        db,
        shipper_id,
        driver_id,
        truck,
    })
}

#[rstest]
fn assigning_with_a_bid_from_another_load_writes_nothing(board: Option<Board>) {
    let Some(board) = board else { return };
    let pool = board.db.pool();

    board.db.block_on(async {
        let target = load(&pool, board.shipper_id).await;
        let other = load(&pool, board.shipper_id).await;
        let foreign = bid(&pool, other.id, board.driver_id, 39_000.0).await;

        let err = board
            .repo
            .assign_load(
                &target.id,
                &LoadAssignment {
                    truck_id: board.truck.id,
                    driver_id: board.driver_id,
                    bid_id: Some(foreign.id),
                },
                at(),
            )
            .await
            .expect_err("foreign bid rejected");
        assert_eq!(err, LoadRepositoryError::bid_not_found(foreign.id));

        let stored = board
            .repo
            .find_load(&target.id)
            .await
            .expect("load lookup")
            .expect("load exists");
        assert_eq!(stored.status, LoadStatus::Open);
        assert_eq!(stored.assigned_truck_id, None);
        assert_eq!(stored.assigned_driver_id, None);

        let bids = board.repo.list_bids(&other.id).await.expect("bid listing");
        assert_eq!(bids.len(), 1);
        assert_eq!(bids[0].status, BidStatus::Pending);
    });
}

#[rstest]
fn assigning_with_its_own_bid_accepts_the_bid(board: Option<Board>) {
    let Some(board) = board else { return };
    let pool = board.db.pool();

    board.db.block_on(async {
        let posted = load(&pool, board.shipper_id).await;
        let offer = bid(&pool, posted.id, board.driver_id, 40_500.0).await;

        let assigned = board
            .repo
            .assign_load(
                &posted.id,
                &LoadAssignment {
                    truck_id: board.truck.id,
                    driver_id: board.driver_id,
                    bid_id: Some(offer.id),
                },
                at(),
            )
            .await
            .expect("assignment succeeds")
            .expect("load exists");
        assert_eq!(assigned.status, LoadStatus::Assigned);
        assert_eq!(assigned.assigned_truck_id, Some(board.truck.id));
        assert_eq!(assigned.assigned_driver_id, Some(board.driver_id));

        let bids = board.repo.list_bids(&posted.id).await.expect("bid listing");
        assert_eq!(bids[0].status, BidStatus::Accepted);
    });
}

#[rstest]
fn assigning_a_missing_load_returns_none(board: Option<Board>) {
    let Some(board) = board else { return };

    let outcome = board.db.block_on(board.repo.assign_load(
        &Uuid::new_v4(),
        &LoadAssignment {
            truck_id: board.truck.id,
            driver_id: board.driver_id,
            bid_id: None,
        },
        at(),
    ));
    assert_eq!(outcome, Ok(None));
}

#[rstest]
fn assigning_an_unknown_truck_is_a_missing_reference(board: Option<Board>) {
    let Some(board) = board else { return };
    let pool = board.db.pool();

    board.db.block_on(async {
        let posted = load(&pool, board.shipper_id).await;

        let err = board
            .repo
            .assign_load(
                &posted.id,
                &LoadAssignment {
                    truck_id: Uuid::new_v4(),
                    driver_id: board.driver_id,
                    bid_id: None,
                },
                at(),
            )
            .await
            .expect_err("unknown truck rejected");
        assert!(matches!(err, LoadRepositoryError::MissingReference { .. }));

        let stored = board
            .repo
            .find_load(&posted.id)
            .await
            .expect("load lookup")
            .expect("load exists");
        assert_eq!(stored.status, LoadStatus::Open);
    });
}

#[rstest]
fn bidding_on_a_missing_load_is_a_missing_reference(board: Option<Board>) {
    let Some(board) = board else { return };
    let unsaved = open_load(board.shipper_id);

    let err = board.db.block_on(async {
        board
            .repo
            .create_bid(&Bid {
                id: Uuid::new_v4(),
                load_id: unsaved.id,
                bidder_id: board.driver_id,
                proposed_price: 1_000.0,
                message: String::new(),
                status: BidStatus::Pending,
                created_at: at(),
            })
            .await
            .expect_err("bid on an unsaved load rejected")
    });
    assert!(matches!(err, LoadRepositoryError::MissingReference { .. }));
}
