//! Port for trips and trip documents.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Document, Trip, TripDetails, TripScope, TripTransition};

use super::define_port_error;

define_port_error! {
    /// Errors raised by trip repository adapters.
    pub enum TripRepositoryError {}
}

/// Port for trip tracking.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TripRepository: Send + Sync {
    /// Trips visible within `scope`, newest first.
    async fn list_trips(&self, scope: &TripScope) -> Result<Vec<Trip>, TripRepositoryError>;

    /// Find a trip by id.
    async fn find_trip(&self, id: &Uuid) -> Result<Option<Trip>, TripRepositoryError>;

    /// Insert a trip. A second trip for the same load yields `Conflict`.
    async fn create_trip(&self, trip: &Trip) -> Result<(), TripRepositoryError>;

    /// Apply `transition` only while the trip is still in `transition.from`
    /// and driven by `transition.driver_id`, cascading the load to
    /// `delivered` in the same transaction when required. `None` when the
    /// guard no longer holds.
    async fn apply_transition(
        &self,
        transition: &TripTransition,
    ) -> Result<Option<Trip>, TripRepositoryError>;

    /// Record a document attached to a trip.
    async fn add_document(&self, document: &Document) -> Result<(), TripRepositoryError>;

    /// Trip joined with its load and truck.
    async fn trip_details(&self, id: &Uuid) -> Result<Option<TripDetails>, TripRepositoryError>;
}
