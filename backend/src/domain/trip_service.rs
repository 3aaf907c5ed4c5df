//! Trip tracking: opening trips, driving the status machine, and proof of
//! delivery uploads.

use std::sync::Arc;

use mockable::Clock;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::ports::{TripRepository, TripRepositoryError};
use crate::domain::{
    AuthenticatedUser, Document, Error, PROOF_OF_DELIVERY, PodUpload, Role, TRIP_DOCUMENT_OWNER,
    Trip, TripDetails, TripDraft, TripScope, TripStatus, TripTransition,
};

fn map_repository_error(error: TripRepositoryError) -> Error {
    match error {
        TripRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("trip repository unavailable: {message}"))
        }
        TripRepositoryError::Query { message } => {
            Error::internal(format!("trip repository error: {message}"))
        }
        TripRepositoryError::Conflict { .. } => {
            Error::conflict("A trip already exists for this load")
        }
        TripRepositoryError::MissingReference { .. } => {
            Error::not_found("Referenced load, truck, or driver not found")
        }
    }
}

fn trip_not_found() -> Error {
    Error::not_found("Trip not found")
}

fn not_driven_by_caller() -> Error {
    Error::not_found("Trip not found or unauthorized")
}

/// Trip tracking service.
#[derive(Clone)]
pub struct TripService {
    trips: Arc<dyn TripRepository>,
    clock: Arc<dyn Clock>,
}

impl TripService {
    /// Create the service from its repository and clock.
    pub fn new(trips: Arc<dyn TripRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { trips, clock }
    }

    /// Trips visible to the caller: all of them for admins, otherwise the
    /// ones they drive or that run on their company's trucks.
    pub async fn list_trips(&self, caller: &AuthenticatedUser) -> Result<Vec<Trip>, Error> {
        let scope = if caller.is_admin() {
            TripScope::All
        } else {
            TripScope::Participant(caller.id)
        };
        self.trips
            .list_trips(&scope)
            .await
            .map_err(map_repository_error)
    }

    /// A single trip.
    pub async fn get_trip(&self, id: Uuid) -> Result<Trip, Error> {
        self.trips
            .find_trip(&id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(trip_not_found)
    }

    /// Open a trip for a load. One trip per load.
    pub async fn create_trip(
        &self,
        caller: &AuthenticatedUser,
        draft: TripDraft,
    ) -> Result<Trip, Error> {
        caller.require_role(&[Role::Shipper, Role::Admin])?;
        let trip = Trip {
            id: Uuid::new_v4(),
            load_id: draft.load_id,
            truck_id: draft.truck_id,
            driver_id: draft.driver_id,
            start_time: None,
            pickup_time: None,
            delivery_time: None,
            status: TripStatus::Assigned,
            created_at: self.clock.utc(),
        };
        self.trips
            .create_trip(&trip)
            .await
            .map_err(map_repository_error)?;
        info!(trip_id = %trip.id, load_id = %trip.load_id, driver_id = %trip.driver_id, "trip opened");
        Ok(trip)
    }

    async fn driven_trip(&self, caller: &AuthenticatedUser, id: Uuid) -> Result<Trip, Error> {
        match self
            .trips
            .find_trip(&id)
            .await
            .map_err(map_repository_error)?
        {
            Some(trip) if trip.driver_id == caller.id => Ok(trip),
            _ => Err(not_driven_by_caller()),
        }
    }

    /// Move a trip one step forward on behalf of its driver.
    ///
    /// Trips driven by someone else look absent. The repository re-checks
    /// the starting status, so a concurrent move surfaces as a conflict.
    pub async fn update_status(
        &self,
        caller: &AuthenticatedUser,
        id: Uuid,
        next: TripStatus,
    ) -> Result<Trip, Error> {
        caller.require_role(&[Role::Driver])?;
        let trip = self.driven_trip(caller, id).await?;
        let to = trip.status.transition_to(next)?;
        let transition = TripTransition {
            trip_id: trip.id,
            driver_id: caller.id,
            from: trip.status,
            to,
            at: self.clock.utc(),
        };

        let Some(updated) = self
            .trips
            .apply_transition(&transition)
            .await
            .map_err(map_repository_error)?
        else {
            warn!(trip_id = %trip.id, from = %transition.from, to = %to, "trip moved concurrently");
            return Err(Error::conflict("Trip status changed concurrently"));
        };

        info!(
            trip_id = %updated.id,
            from = %transition.from,
            to = %updated.status,
            load_delivered = transition.delivers_load(),
            "trip status updated"
        );
        Ok(updated)
    }

    /// Record a proof-of-delivery document for a trip the caller drives.
    pub async fn upload_pod(
        &self,
        caller: &AuthenticatedUser,
        id: Uuid,
        upload: PodUpload,
    ) -> Result<Document, Error> {
        caller.require_role(&[Role::Driver])?;
        let trip = self.driven_trip(caller, id).await?;
        let document = Document {
            id: Uuid::new_v4(),
            owner_type: TRIP_DOCUMENT_OWNER.to_owned(),
            owner_id: trip.id,
            doc_type: PROOF_OF_DELIVERY.to_owned(),
            file_ref: upload.file_ref,
            verified: false,
            expiry_date: None,
            created_at: self.clock.utc(),
        };
        self.trips
            .add_document(&document)
            .await
            .map_err(map_repository_error)?;
        info!(trip_id = %trip.id, document_id = %document.id, "proof of delivery uploaded");
        Ok(document)
    }

    /// Trip joined with its load and truck.
    pub async fn trip_details(&self, id: Uuid) -> Result<TripDetails, Error> {
        self.trips
            .trip_details(&id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(trip_not_found)
    }
}

#[cfg(test)]
#[path = "trip_service_tests.rs"]
mod tests;
