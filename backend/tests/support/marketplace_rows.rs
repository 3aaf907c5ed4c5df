//! Row builders for the Diesel adapter suites.
//!
//! Rows are written through the repositories themselves so every suite
//! starts from data the adapters accept.

#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use fleetflow::domain::ports::{FleetRepository, LoadRepository, UserRepository};
use fleetflow::domain::{
    Bid, BidStatus, Company, Load, LoadStatus, NewAccount, NewCompany, NewTruck, Role, Trip,
    TripStatus, Truck, User,
};
use fleetflow::outbound::persistence::{
    DbPool, DieselFleetRepository, DieselLoadRepository, DieselUserRepository,
};

/// Fixed instant the suites build rows around.
pub fn at() -> DateTime<Utc> {
    DateTime::from_timestamp(1_750_000_000, 0).unwrap_or_default()
}

pub fn account(role: Role, email: &str) -> NewAccount {
    NewAccount {
        user: User {
            id: Uuid::new_v4(),
            email: email.to_owned(),
            name: None,
            phone: None,
            role,
            verified: true,
            created_at: at(),
            updated_at: at(),
        },
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_owned(),
        company: None,
        driver_profile: None,
    }
}

/// Create a user with `role` and return their id.
pub async fn user(pool: &DbPool, role: Role, email: &str) -> Uuid {
    let mut account = account(role, email);
    if role == Role::FleetOwner {
        account.company = Some(NewCompany {
            id: Uuid::new_v4(),
            name: format!("{email} Logistics"),
        });
    }
    let id = account.user.id;
    DieselUserRepository::new(pool.clone())
        .create_account(&account)
        .await
        .expect("account inserted");
    id
}

/// Register a truck for `owner_id` and put `driver_id` behind the wheel.
pub async fn truck(pool: &DbPool, owner_id: Uuid, registration: &str, driver_id: Uuid) -> Truck {
    let fleet = DieselFleetRepository::new(pool.clone());
    let truck = fleet
        .create_truck(&NewTruck {
            id: Uuid::new_v4(),
            owner_user_id: owner_id,
            fallback_company: Company {
                id: Uuid::new_v4(),
                owner_user_id: owner_id,
                name: "Fallback Haulage".to_owned(),
                address: None,
                gst_vat_id: None,
                created_at: at(),
            },
            registration_number: registration.to_owned(),
            truck_type: "flatbed".to_owned(),
            capacity_tons: 20.0,
            created_at: at(),
        })
        .await
        .expect("truck inserted");
    fleet
        .assign_driver(&truck.id, &driver_id)
        .await
        .expect("driver assigned")
        .expect("truck exists")
}

pub fn open_load(shipper_id: Uuid) -> Load {
    Load {
        id: Uuid::new_v4(),
        shipper_id,
        title: "Steel coils".to_owned(),
        goods_type: Some("metal".to_owned()),
        weight_tons: 12.5,
        pickup_location: "Pune".to_owned(),
        delivery_location: "Chennai".to_owned(),
        pickup_window_start: Some(at() + Duration::days(1)),
        pickup_window_end: Some(at() + Duration::days(2)),
        status: LoadStatus::Open,
        assigned_truck_id: None,
        assigned_driver_id: None,
        price_fixed: Some(42_000.0),
        bidding_enabled: true,
        created_at: at(),
        updated_at: at(),
    }
}

/// Post an open load for `shipper_id`.
pub async fn load(pool: &DbPool, shipper_id: Uuid) -> Load {
    let load = open_load(shipper_id);
    DieselLoadRepository::new(pool.clone())
        .create_load(&load)
        .await
        .expect("load inserted");
    load
}

/// Place a pending bid by `bidder_id` on `load_id`.
pub async fn bid(pool: &DbPool, load_id: Uuid, bidder_id: Uuid, price: f64) -> Bid {
    let bid = Bid {
        id: Uuid::new_v4(),
        load_id,
        bidder_id,
        proposed_price: price,
        message: String::new(),
        status: BidStatus::Pending,
        created_at: at(),
    };
    DieselLoadRepository::new(pool.clone())
        .create_bid(&bid)
        .await
        .expect("bid inserted");
    bid
}

pub fn assigned_trip(load: &Load, truck: &Truck, driver_id: Uuid) -> Trip {
    Trip {
        id: Uuid::new_v4(),
        load_id: load.id,
        truck_id: truck.id,
        driver_id,
        start_time: Some(at()),
        pickup_time: None,
        delivery_time: None,
        status: TripStatus::Assigned,
        created_at: at(),
    }
}
