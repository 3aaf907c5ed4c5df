//! Loads and bids.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::ports::{LoadRepository, LoadRepositoryError};
use crate::domain::{Bid, BidStatus, Load, LoadAssignment, LoadFilter, LoadStatus, LoadUpdate};

use super::{MemoryStore, newest_first, require_references};

#[async_trait]
impl LoadRepository for MemoryStore {
    async fn list_loads(&self, filter: &LoadFilter) -> Result<Vec<Load>, LoadRepositoryError> {
        let state = self.state.lock().await;
        Ok(newest_first(
            state.loads.iter().filter(|load| filter.matches(load)),
        ))
    }

    async fn find_load(&self, id: &Uuid) -> Result<Option<Load>, LoadRepositoryError> {
        let state = self.state.lock().await;
        Ok(state.loads.iter().find(|load| load.id == *id).cloned())
    }

    async fn create_load(&self, load: &Load) -> Result<(), LoadRepositoryError> {
        let mut state = self.state.lock().await;
        require_references(&[(state.user_exists(load.shipper_id), "loads_shipper_id_fkey")])?;
        state.loads.push(load.clone());
        Ok(())
    }

    async fn update_load(
        &self,
        shipper_id: &Uuid,
        load_id: &Uuid,
        update: &LoadUpdate,
        at: DateTime<Utc>,
    ) -> Result<Option<Load>, LoadRepositoryError> {
        let mut state = self.state.lock().await;
        let Some(load) = state
            .loads
            .iter_mut()
            .find(|load| load.id == *load_id && load.shipper_id == *shipper_id)
        else {
            return Ok(None);
        };
        if let Some(status) = update.status {
            load.status = status;
        }
        if let Some(price) = update.price_fixed {
            load.price_fixed = Some(price);
        }
        load.updated_at = at;
        Ok(Some(load.clone()))
    }

    async fn create_bid(&self, bid: &Bid) -> Result<(), LoadRepositoryError> {
        let mut state = self.state.lock().await;
        require_references(&[
            (state.load_exists(bid.load_id), "bids_load_id_fkey"),
            (state.user_exists(bid.bidder_id), "bids_bidder_id_fkey"),
        ])?;
        state.bids.push(bid.clone());
        Ok(())
    }

    async fn list_bids(&self, load_id: &Uuid) -> Result<Vec<Bid>, LoadRepositoryError> {
        let state = self.state.lock().await;
        Ok(newest_first(
            state.bids.iter().filter(|bid| bid.load_id == *load_id),
        ))
    }

    async fn assign_load(
        &self,
        load_id: &Uuid,
        assignment: &LoadAssignment,
        at: DateTime<Utc>,
    ) -> Result<Option<Load>, LoadRepositoryError> {
        let mut state = self.state.lock().await;
        if !state.load_exists(*load_id) {
            return Ok(None);
        }
        let missing_bid = assignment.bid_id.filter(|bid_id| {
            !state
                .bids
                .iter()
                .any(|bid| bid.id == *bid_id && bid.load_id == *load_id)
        });
        if let Some(bid_id) = missing_bid {
            return Err(LoadRepositoryError::bid_not_found(bid_id));
        }
        require_references(&[
            (
                state.truck_exists(assignment.truck_id),
                "loads_assigned_truck_id_fkey",
            ),
            (
                state.user_exists(assignment.driver_id),
                "loads_assigned_driver_id_fkey",
            ),
        ])?;

        if let Some(bid) = assignment
            .bid_id
            .and_then(|bid_id| state.bids.iter_mut().find(|bid| bid.id == bid_id))
        {
            bid.status = BidStatus::Accepted;
        }
        let Some(load) = state.loads.iter_mut().find(|load| load.id == *load_id) else {
            return Ok(None);
        };
        load.status = LoadStatus::Assigned;
        load.assigned_truck_id = Some(assignment.truck_id);
        load.assigned_driver_id = Some(assignment.driver_id);
        load.updated_at = at;
        Ok(Some(load.clone()))
    }
}
