//! Fleet registry service: trucks owned by fleet-owner companies.

use std::sync::Arc;

use mockable::Clock;
use tracing::info;
use uuid::Uuid;

use crate::domain::ports::{FleetRepository, FleetRepositoryError};
use crate::domain::{
    AuthenticatedUser, Company, DEFAULT_COMPANY_NAME, Error, NewTruck, Role, Truck, TruckDraft,
    TruckFilter, TruckUpdate,
};

fn map_repository_error(error: FleetRepositoryError) -> Error {
    match error {
        FleetRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("fleet repository unavailable: {message}"))
        }
        FleetRepositoryError::Query { message } => {
            Error::internal(format!("fleet repository error: {message}"))
        }
        FleetRepositoryError::Conflict { .. } => {
            Error::conflict("Registration number already exists")
        }
        FleetRepositoryError::MissingReference { .. } => Error::not_found("Driver not found"),
    }
}

fn truck_not_found() -> Error {
    Error::not_found("Truck not found")
}

/// Fleet registry service.
#[derive(Clone)]
pub struct FleetService {
    fleet: Arc<dyn FleetRepository>,
    clock: Arc<dyn Clock>,
}

impl FleetService {
    /// Create the service from its repository and clock.
    pub fn new(fleet: Arc<dyn FleetRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { fleet, clock }
    }

    /// Trucks matching `filter`.
    pub async fn list_trucks(&self, filter: &TruckFilter) -> Result<Vec<Truck>, Error> {
        self.fleet
            .list_trucks(filter)
            .await
            .map_err(map_repository_error)
    }

    /// A single truck.
    pub async fn get_truck(&self, id: Uuid) -> Result<Truck, Error> {
        self.fleet
            .find_truck(&id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(truck_not_found)
    }

    /// Register a truck under the caller's company, creating a default
    /// company on first use.
    pub async fn create_truck(
        &self,
        caller: &AuthenticatedUser,
        draft: TruckDraft,
    ) -> Result<Truck, Error> {
        caller.require_role(&[Role::FleetOwner])?;
        let now = self.clock.utc();
        let new_truck = NewTruck {
            id: Uuid::new_v4(),
            owner_user_id: caller.id,
            fallback_company: Company {
                id: Uuid::new_v4(),
                owner_user_id: caller.id,
                name: DEFAULT_COMPANY_NAME.to_owned(),
                address: None,
                gst_vat_id: None,
                created_at: now,
            },
            registration_number: draft.registration_number,
            truck_type: draft.truck_type,
            capacity_tons: draft.capacity_tons,
            created_at: now,
        };
        let truck = self
            .fleet
            .create_truck(&new_truck)
            .await
            .map_err(map_repository_error)?;
        info!(truck_id = %truck.id, company_id = %truck.company_id, "truck registered");
        Ok(truck)
    }

    /// Change a truck's status and assigned driver.
    pub async fn update_truck(
        &self,
        caller: &AuthenticatedUser,
        id: Uuid,
        update: TruckUpdate,
    ) -> Result<Truck, Error> {
        caller.require_role(&[Role::FleetOwner])?;
        self.fleet
            .update_truck(&id, &update)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(truck_not_found)
    }

    /// Assign a driver to a truck.
    pub async fn assign_driver(
        &self,
        caller: &AuthenticatedUser,
        id: Uuid,
        driver_id: Uuid,
    ) -> Result<Truck, Error> {
        caller.require_role(&[Role::FleetOwner])?;
        let truck = self
            .fleet
            .assign_driver(&id, &driver_id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(truck_not_found)?;
        info!(truck_id = %truck.id, %driver_id, "driver assigned to truck");
        Ok(truck)
    }
}

#[cfg(test)]
#[path = "fleet_service_tests.rs"]
mod tests;
