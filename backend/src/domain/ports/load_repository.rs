//! Port for loads and bids.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Bid, Load, LoadAssignment, LoadFilter, LoadUpdate};

use super::define_port_error;

define_port_error! {
    /// Errors raised by load repository adapters.
    pub enum LoadRepositoryError {
        /// The bid to accept does not exist on the load being assigned.
        BidNotFound { bid_id: Uuid } => "bid {bid_id} not found for load",
    }
}

/// Port for the load board.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoadRepository: Send + Sync {
    /// List loads matching `filter`, newest first.
    async fn list_loads(&self, filter: &LoadFilter) -> Result<Vec<Load>, LoadRepositoryError>;

    /// Find a load by id.
    async fn find_load(&self, id: &Uuid) -> Result<Option<Load>, LoadRepositoryError>;

    /// Insert a new load.
    async fn create_load(&self, load: &Load) -> Result<(), LoadRepositoryError>;

    /// Edit a load owned by `shipper_id`; `None` when absent or not owned.
    async fn update_load(
        &self,
        shipper_id: &Uuid,
        load_id: &Uuid,
        update: &LoadUpdate,
        at: DateTime<Utc>,
    ) -> Result<Option<Load>, LoadRepositoryError>;

    /// Insert a bid. A missing load yields `MissingReference`.
    async fn create_bid(&self, bid: &Bid) -> Result<(), LoadRepositoryError>;

    /// Bids on a load, newest first.
    async fn list_bids(&self, load_id: &Uuid) -> Result<Vec<Bid>, LoadRepositoryError>;

    /// Mark the load assigned and, when a bid id is supplied, accept that
    /// bid, all in one transaction. `None` when the load is absent;
    /// `BidNotFound` (with nothing written) when the bid is not on the load.
    async fn assign_load(
        &self,
        load_id: &Uuid,
        assignment: &LoadAssignment,
        at: DateTime<Utc>,
    ) -> Result<Option<Load>, LoadRepositoryError>;
}
