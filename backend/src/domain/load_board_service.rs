//! Load board service: posting loads, bidding, and assignment.

use std::sync::Arc;

use mockable::Clock;
use tracing::info;
use uuid::Uuid;

use crate::domain::ports::{LoadRepository, LoadRepositoryError};
use crate::domain::{
    AuthenticatedUser, Bid, BidDraft, BidStatus, Error, Load, LoadAssignment, LoadDraft,
    LoadFilter, LoadStatus, LoadUpdate, Role,
};

fn map_repository_error(error: LoadRepositoryError) -> Error {
    match error {
        LoadRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("load repository unavailable: {message}"))
        }
        LoadRepositoryError::Query { message } => {
            Error::internal(format!("load repository error: {message}"))
        }
        LoadRepositoryError::Conflict { message } => Error::conflict(message),
        LoadRepositoryError::MissingReference { .. } => {
            Error::not_found("Referenced truck or driver not found")
        }
        LoadRepositoryError::BidNotFound { .. } => Error::not_found("Bid not found for this load"),
    }
}

fn load_not_found() -> Error {
    Error::not_found("Load not found")
}

/// Load board service.
#[derive(Clone)]
pub struct LoadBoardService {
    loads: Arc<dyn LoadRepository>,
    clock: Arc<dyn Clock>,
}

impl LoadBoardService {
    /// Create the service from its repository and clock.
    pub fn new(loads: Arc<dyn LoadRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { loads, clock }
    }

    /// Loads matching `filter`, newest first.
    pub async fn list_loads(&self, filter: &LoadFilter) -> Result<Vec<Load>, Error> {
        self.loads
            .list_loads(filter)
            .await
            .map_err(map_repository_error)
    }

    /// A single load.
    pub async fn get_load(&self, id: Uuid) -> Result<Load, Error> {
        self.loads
            .find_load(&id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(load_not_found)
    }

    /// Post a load. It opens immediately with bidding enabled unless the
    /// shipper says otherwise; a missing pickup window starts now.
    pub async fn create_load(
        &self,
        caller: &AuthenticatedUser,
        draft: LoadDraft,
    ) -> Result<Load, Error> {
        caller.require_role(&[Role::Shipper])?;
        let now = self.clock.utc();
        let load = Load {
            id: Uuid::new_v4(),
            shipper_id: caller.id,
            title: draft.title,
            goods_type: draft.goods_type,
            weight_tons: draft.weight_tons,
            pickup_location: draft.pickup_location,
            delivery_location: draft.delivery_location,
            pickup_window_start: Some(draft.pickup_window_start.unwrap_or(now)),
            pickup_window_end: draft.pickup_window_end,
            status: LoadStatus::Open,
            assigned_truck_id: None,
            assigned_driver_id: None,
            price_fixed: draft.price_fixed,
            bidding_enabled: draft.bidding_enabled.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };
        self.loads
            .create_load(&load)
            .await
            .map_err(map_repository_error)?;
        info!(load_id = %load.id, shipper_id = %caller.id, "load posted");
        Ok(load)
    }

    /// Edit one of the caller's own loads.
    pub async fn update_load(
        &self,
        caller: &AuthenticatedUser,
        id: Uuid,
        update: LoadUpdate,
    ) -> Result<Load, Error> {
        caller.require_role(&[Role::Shipper])?;
        self.loads
            .update_load(&caller.id, &id, &update, self.clock.utc())
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found("Load not found or unauthorized"))
    }

    /// Bid on an existing load.
    pub async fn place_bid(
        &self,
        caller: &AuthenticatedUser,
        load_id: Uuid,
        draft: BidDraft,
    ) -> Result<Bid, Error> {
        caller.require_role(&[Role::Driver, Role::FleetOwner])?;
        self.get_load(load_id).await?;
        let bid = Bid {
            id: Uuid::new_v4(),
            load_id,
            bidder_id: caller.id,
            proposed_price: draft.proposed_price,
            message: draft.message.unwrap_or_default(),
            status: BidStatus::Pending,
            created_at: self.clock.utc(),
        };
        self.loads.create_bid(&bid).await.map_err(|err| match err {
            LoadRepositoryError::MissingReference { .. } => load_not_found(),
            other => map_repository_error(other),
        })?;
        info!(bid_id = %bid.id, %load_id, bidder_id = %caller.id, "bid placed");
        Ok(bid)
    }

    /// Bids on a load, newest first.
    pub async fn list_bids(&self, load_id: Uuid) -> Result<Vec<Bid>, Error> {
        self.loads
            .list_bids(&load_id)
            .await
            .map_err(map_repository_error)
    }

    /// Assign a truck and driver to a load, accepting a bid when given.
    ///
    /// Repeating the call is harmless: the load stays assigned and each new
    /// bid id is accepted in turn.
    pub async fn assign_load(
        &self,
        caller: &AuthenticatedUser,
        load_id: Uuid,
        assignment: LoadAssignment,
    ) -> Result<Load, Error> {
        caller.require_role(&[Role::Shipper, Role::Admin])?;
        let load = self
            .loads
            .assign_load(&load_id, &assignment, self.clock.utc())
            .await
            .map_err(map_repository_error)?
            .ok_or_else(load_not_found)?;
        info!(
            %load_id,
            truck_id = %assignment.truck_id,
            driver_id = %assignment.driver_id,
            bid_id = ?assignment.bid_id,
            "load assigned"
        );
        Ok(load)
    }
}

#[cfg(test)]
#[path = "load_board_service_tests.rs"]
mod tests;
