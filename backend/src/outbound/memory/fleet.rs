//! Trucks and the companies that own them.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::{FleetRepository, FleetRepositoryError};
use crate::domain::{NewTruck, Truck, TruckFilter, TruckStatus, TruckUpdate};

use super::{MemoryStore, newest_first, require_references};

#[async_trait]
impl FleetRepository for MemoryStore {
    async fn list_trucks(&self, filter: &TruckFilter) -> Result<Vec<Truck>, FleetRepositoryError> {
        let state = self.state.lock().await;
        Ok(newest_first(
            state.trucks.iter().filter(|truck| filter.matches(truck)),
        ))
    }

    async fn find_truck(&self, id: &Uuid) -> Result<Option<Truck>, FleetRepositoryError> {
        let state = self.state.lock().await;
        Ok(state.trucks.iter().find(|truck| truck.id == *id).cloned())
    }

    async fn create_truck(&self, truck: &NewTruck) -> Result<Truck, FleetRepositoryError> {
        let mut state = self.state.lock().await;
        require_references(&[(
            state.user_exists(truck.owner_user_id),
            "companies_owner_user_id_fkey",
        )])?;
        if state
            .trucks
            .iter()
            .any(|existing| existing.registration_number == truck.registration_number)
        {
            return Err(FleetRepositoryError::conflict(
                "trucks_registration_number_key",
            ));
        }

        let existing_company = state
            .companies
            .iter()
            .find(|company| company.owner_user_id == truck.owner_user_id)
            .map(|company| company.id);
        let company_id = match existing_company {
            Some(id) => id,
            None => {
                state.companies.push(truck.fallback_company.clone());
                truck.fallback_company.id
            }
        };

        let created = Truck {
            id: truck.id,
            company_id,
            registration_number: truck.registration_number.clone(),
            truck_type: truck.truck_type.clone(),
            capacity_tons: truck.capacity_tons,
            status: TruckStatus::Available,
            assigned_driver_id: None,
            created_at: truck.created_at,
        };
        state.trucks.push(created.clone());
        Ok(created)
    }

    async fn update_truck(
        &self,
        id: &Uuid,
        update: &TruckUpdate,
    ) -> Result<Option<Truck>, FleetRepositoryError> {
        let mut state = self.state.lock().await;
        if !state.truck_exists(*id) {
            return Ok(None);
        }
        if let Some(driver_id) = update.assigned_driver_id {
            require_references(&[(
                state.user_exists(driver_id),
                "trucks_assigned_driver_id_fkey",
            )])?;
        }
        let Some(truck) = state.trucks.iter_mut().find(|truck| truck.id == *id) else {
            return Ok(None);
        };
        if let Some(status) = update.status {
            truck.status = status;
        }
        truck.assigned_driver_id = update.assigned_driver_id;
        Ok(Some(truck.clone()))
    }

    async fn assign_driver(
        &self,
        id: &Uuid,
        driver_id: &Uuid,
    ) -> Result<Option<Truck>, FleetRepositoryError> {
        let mut state = self.state.lock().await;
        if !state.truck_exists(*id) {
            return Ok(None);
        }
        require_references(&[(
            state.user_exists(*driver_id),
            "trucks_assigned_driver_id_fkey",
        )])?;
        let Some(truck) = state.trucks.iter_mut().find(|truck| truck.id == *id) else {
            return Ok(None);
        };
        truck.assigned_driver_id = Some(*driver_id);
        Ok(Some(truck.clone()))
    }
}
