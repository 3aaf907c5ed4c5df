//! PostgreSQL-backed `TripRepository` implementation using Diesel ORM.
//!
//! Status moves are guarded updates: the row only changes while it still has
//! the expected status and driver, so two racing drivers cannot both win.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{TripRepository, TripRepositoryError};
use crate::domain::{
    Document, LoadStatus, Trip, TripDetails, TripScope, TripStatus, TripTransition,
};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{DocumentRow, NewTripRow, TripRow, TripStatusChangeset};
use super::pool::DbPool;
use super::schema::{companies, documents, loads, trips, trucks};

/// Diesel-backed implementation of the `TripRepository` port.
#[derive(Clone)]
pub struct DieselTripRepository {
    pool: DbPool,
}

impl DieselTripRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

type DetailsRow = (TripRow, String, Option<String>, f64, String, String, String);

#[async_trait]
impl TripRepository for DieselTripRepository {
    async fn list_trips(&self, scope: &TripScope) -> Result<Vec<Trip>, TripRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = trips::table
            .select(TripRow::as_select())
            .order(trips::created_at.desc())
            .into_boxed();
        if let TripScope::Participant(user_id) = *scope {
            let owned_trucks = trucks::table
                .inner_join(companies::table)
                .filter(companies::owner_user_id.eq(user_id))
                .select(trucks::id);
            query = query.filter(
                trips::driver_id
                    .eq(user_id)
                    .or(trips::truck_id.eq_any(owned_trucks)),
            );
        }

        let rows: Vec<TripRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        rows.into_iter().map(TripRow::into_trip).collect()
    }

    async fn find_trip(&self, id: &Uuid) -> Result<Option<Trip>, TripRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<TripRow> = trips::table
            .find(id)
            .select(TripRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(TripRow::into_trip).transpose()
    }

    async fn create_trip(&self, trip: &Trip) -> Result<(), TripRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(trips::table)
            .values(&NewTripRow::from(trip))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn apply_transition(
        &self,
        transition: &TripTransition,
    ) -> Result<Option<Trip>, TripRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let transition = *transition;
        let changes = TripStatusChangeset {
            status: transition.to.as_str(),
            pickup_time: (transition.to == TripStatus::PickedUp).then_some(transition.at),
            delivery_time: (transition.to == TripStatus::Delivered).then_some(transition.at),
        };
        let row: Option<TripRow> = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let updated: Option<TripRow> = diesel::update(
                        trips::table
                            .filter(trips::id.eq(transition.trip_id))
                            .filter(trips::status.eq(transition.from.as_str()))
                            .filter(trips::driver_id.eq(transition.driver_id)),
                    )
                    .set(&changes)
                    .returning(TripRow::as_returning())
                    .get_result(conn)
                    .await
                    .optional()?;

                    let delivered_load = updated
                        .as_ref()
                        .filter(|_| transition.delivers_load())
                        .map(|trip| trip.load_id);
                    if let Some(load_id) = delivered_load {
                        diesel::update(loads::table.find(load_id))
                            .set((
                                loads::status.eq(LoadStatus::Delivered.as_str()),
                                loads::updated_at.eq(transition.at),
                            ))
                            .execute(conn)
                            .await?;
                    }
                    Ok(updated)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        row.map(TripRow::into_trip).transpose()
    }

    async fn add_document(&self, document: &Document) -> Result<(), TripRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(documents::table)
            .values(&DocumentRow::from(document))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn trip_details(&self, id: &Uuid) -> Result<Option<TripDetails>, TripRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<DetailsRow> = trips::table
            .inner_join(loads::table)
            .inner_join(trucks::table)
            .filter(trips::id.eq(id))
            .select((
                TripRow::as_select(),
                loads::title,
                loads::goods_type,
                loads::weight_tons,
                loads::pickup_location,
                loads::delivery_location,
                trucks::registration_number,
            ))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(
            |(trip, title, goods_type, weight_tons, pickup, delivery, registration)| {
                Ok(TripDetails {
                    trip: trip.into_trip()?,
                    title,
                    goods_type,
                    weight_tons,
                    pickup_location: pickup,
                    delivery_location: delivery,
                    registration_number: registration,
                })
            },
        )
        .transpose()
    }
}
