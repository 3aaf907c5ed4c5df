//! Trips, their status transitions, and trip documents.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::{TripRepository, TripRepositoryError};
use crate::domain::{Document, LoadStatus, Trip, TripDetails, TripScope, TripTransition};

use super::{MemoryStore, newest_first, require_references};

#[async_trait]
impl TripRepository for MemoryStore {
    async fn list_trips(&self, scope: &TripScope) -> Result<Vec<Trip>, TripRepositoryError> {
        let state = self.state.lock().await;
        match *scope {
            TripScope::All => Ok(newest_first(state.trips.iter())),
            TripScope::Participant(user_id) => {
                let fleet: Vec<Uuid> = state.fleet_of(user_id).map(|truck| truck.id).collect();
                Ok(newest_first(state.trips.iter().filter(|trip| {
                    trip.driver_id == user_id || fleet.contains(&trip.truck_id)
                })))
            }
        }
    }

    async fn find_trip(&self, id: &Uuid) -> Result<Option<Trip>, TripRepositoryError> {
        let state = self.state.lock().await;
        Ok(state.trips.iter().find(|trip| trip.id == *id).cloned())
    }

    async fn create_trip(&self, trip: &Trip) -> Result<(), TripRepositoryError> {
        let mut state = self.state.lock().await;
        require_references(&[
            (state.load_exists(trip.load_id), "trips_load_id_fkey"),
            (state.truck_exists(trip.truck_id), "trips_truck_id_fkey"),
            (state.user_exists(trip.driver_id), "trips_driver_id_fkey"),
        ])?;
        if state.trips.iter().any(|existing| existing.load_id == trip.load_id) {
            return Err(TripRepositoryError::conflict("trips_load_id_key"));
        }
        state.trips.push(trip.clone());
        Ok(())
    }

    async fn apply_transition(
        &self,
        transition: &TripTransition,
    ) -> Result<Option<Trip>, TripRepositoryError> {
        let mut state = self.state.lock().await;
        let Some(trip) = state.trips.iter_mut().find(|trip| {
            trip.id == transition.trip_id
                && trip.status == transition.from
                && trip.driver_id == transition.driver_id
        }) else {
            return Ok(None);
        };
        transition.apply(trip);
        let updated = trip.clone();

        if transition.delivers_load() {
            for load in state.loads.iter_mut().filter(|load| load.id == updated.load_id) {
                load.status = LoadStatus::Delivered;
                load.updated_at = transition.at;
            }
        }
        Ok(Some(updated))
    }

    async fn add_document(&self, document: &Document) -> Result<(), TripRepositoryError> {
        let mut state = self.state.lock().await;
        state.documents.push(document.clone());
        Ok(())
    }

    async fn trip_details(&self, id: &Uuid) -> Result<Option<TripDetails>, TripRepositoryError> {
        let state = self.state.lock().await;
        let Some(trip) = state.trips.iter().find(|trip| trip.id == *id) else {
            return Ok(None);
        };
        let load = state.loads.iter().find(|load| load.id == trip.load_id);
        let truck = state.trucks.iter().find(|truck| truck.id == trip.truck_id);
        Ok(load.zip(truck).map(|(load, truck)| TripDetails {
            trip: trip.clone(),
            title: load.title.clone(),
            goods_type: load.goods_type.clone(),
            weight_tons: load.weight_tons,
            pickup_location: load.pickup_location.clone(),
            delivery_location: load.delivery_location.clone(),
            registration_number: truck.registration_number.clone(),
        }))
    }
}
