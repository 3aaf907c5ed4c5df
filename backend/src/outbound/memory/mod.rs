//! In-memory implementation of every repository port.
//!
//! Used when no database URL is configured and by the HTTP test suites. A
//! single [`MemoryStore`] is cloned into each port slot; clones share state.
//! The store mirrors the schema constraints that matter to callers: unique
//! emails, registration numbers and trip loads raise `Conflict`, and writes
//! naming absent users, loads, trucks or trips raise `MissingReference`.

mod disputes;
mod fleet;
mod loads;
mod messages;
mod payments;
mod reporting;
mod trips;
mod users;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::ports::PortFailure;
use crate::domain::{
    Bid, CommissionRule, Company, Dispute, Document, DriverProfile, Load, Message, Payment,
    StoredUser, Trip, Truck,
};

/// Shared in-process storage implementing all repository ports.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[derive(Default)]
struct MemoryState {
    users: Vec<StoredUser>,
    companies: Vec<Company>,
    driver_profiles: Vec<DriverProfile>,
    trucks: Vec<Truck>,
    loads: Vec<Load>,
    bids: Vec<Bid>,
    trips: Vec<Trip>,
    payments: Vec<Payment>,
    documents: Vec<Document>,
    messages: Vec<Message>,
    disputes: Vec<Dispute>,
    commission_rules: Vec<CommissionRule>,
}

impl MemoryState {
    fn user_exists(&self, id: Uuid) -> bool {
        self.users.iter().any(|stored| stored.user.id == id)
    }

    fn load_exists(&self, id: Uuid) -> bool {
        self.loads.iter().any(|load| load.id == id)
    }

    fn truck_exists(&self, id: Uuid) -> bool {
        self.trucks.iter().any(|truck| truck.id == id)
    }

    fn trip_exists(&self, id: Uuid) -> bool {
        self.trips.iter().any(|trip| trip.id == id)
    }

    fn email_of(&self, id: Uuid) -> Option<String> {
        self.users
            .iter()
            .find(|stored| stored.user.id == id)
            .map(|stored| stored.user.email.clone())
    }

    /// Trucks belonging to companies owned by `owner_id`.
    fn fleet_of(&self, owner_id: Uuid) -> impl Iterator<Item = &Truck> {
        let owned: Vec<Uuid> = self
            .companies
            .iter()
            .filter(|company| company.owner_user_id == owner_id)
            .map(|company| company.id)
            .collect();
        self.trucks
            .iter()
            .filter(move |truck| owned.contains(&truck.company_id))
    }
}

/// Fail with `MissingReference` unless every check holds.
fn require_references<E: PortFailure>(checks: &[(bool, &str)]) -> Result<(), E> {
    match checks.iter().find(|(present, _)| !present) {
        Some((_, constraint)) => Err(E::missing_reference_failure((*constraint).to_owned())),
        None => Ok(()),
    }
}

/// Records ordered by creation time.
trait Stamped {
    fn created_at(&self) -> DateTime<Utc>;
}

macro_rules! stamped {
    ($($ty:ty),* $(,)?) => {
        $(impl Stamped for $ty {
            fn created_at(&self) -> DateTime<Utc> {
                self.created_at
            }
        })*
    };
}

stamped!(Truck, Load, Bid, Trip, Payment, Message, Dispute, CommissionRule);

impl Stamped for StoredUser {
    fn created_at(&self) -> DateTime<Utc> {
        self.user.created_at
    }
}

/// Clone matching records newest first; equal timestamps keep the most
/// recent insertion first.
fn newest_first<'a, T, I>(items: I) -> Vec<T>
where
    T: Stamped + Clone + 'a,
    I: DoubleEndedIterator<Item = &'a T>,
{
    let mut out: Vec<T> = items.rev().cloned().collect();
    out.sort_by_key(|item| std::cmp::Reverse(item.created_at()));
    out
}

fn count<T>(items: impl Iterator<Item = T>) -> i64 {
    i64::try_from(items.count()).unwrap_or(i64::MAX)
}
