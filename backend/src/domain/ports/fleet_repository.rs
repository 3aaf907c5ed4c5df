//! Port for companies and trucks.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{NewTruck, Truck, TruckFilter, TruckUpdate};

use super::define_port_error;

define_port_error! {
    /// Errors raised by fleet repository adapters.
    pub enum FleetRepositoryError {}
}

/// Port for the truck registry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FleetRepository: Send + Sync {
    /// List trucks matching `filter`, newest first.
    async fn list_trucks(&self, filter: &TruckFilter) -> Result<Vec<Truck>, FleetRepositoryError>;

    /// Find a truck by id.
    async fn find_truck(&self, id: &Uuid) -> Result<Option<Truck>, FleetRepositoryError>;

    /// Insert a truck under the owner's company, creating
    /// `truck.fallback_company` in the same transaction when the owner has
    /// none. A taken registration number yields `Conflict`.
    async fn create_truck(&self, truck: &NewTruck) -> Result<Truck, FleetRepositoryError>;

    /// Apply a fleet-owner edit; `None` when the truck is absent.
    async fn update_truck(
        &self,
        id: &Uuid,
        update: &TruckUpdate,
    ) -> Result<Option<Truck>, FleetRepositoryError>;

    /// Set the assigned driver; `None` when the truck is absent.
    async fn assign_driver(
        &self,
        id: &Uuid,
        driver_id: &Uuid,
    ) -> Result<Option<Truck>, FleetRepositoryError>;
}
