//! PostgreSQL-backed `FleetRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{FleetRepository, FleetRepositoryError};
use crate::domain::{NewTruck, Truck, TruckFilter, TruckStatus, TruckUpdate};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{CompanyRow, NewTruckRow, TruckChangeset, TruckRow};
use super::pool::DbPool;
use super::schema::{companies, trucks};

/// Diesel-backed implementation of the `FleetRepository` port.
#[derive(Clone)]
pub struct DieselFleetRepository {
    pool: DbPool,
}

impl DieselFleetRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FleetRepository for DieselFleetRepository {
    async fn list_trucks(&self, filter: &TruckFilter) -> Result<Vec<Truck>, FleetRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = trucks::table
            .select(TruckRow::as_select())
            .order(trucks::created_at.desc())
            .into_boxed();
        if let Some(company_id) = filter.company_id {
            query = query.filter(trucks::company_id.eq(company_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(trucks::status.eq(status.as_str()));
        }
        if let Some(min) = filter.min_capacity_tons {
            query = query.filter(trucks::capacity_tons.ge(min));
        }

        let rows: Vec<TruckRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        rows.into_iter().map(TruckRow::into_truck).collect()
    }

    async fn find_truck(&self, id: &Uuid) -> Result<Option<Truck>, FleetRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<TruckRow> = trucks::table
            .find(id)
            .select(TruckRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(TruckRow::into_truck).transpose()
    }

    async fn create_truck(&self, truck: &NewTruck) -> Result<Truck, FleetRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let fallback = CompanyRow::from(&truck.fallback_company);
        let row: TruckRow = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let existing: Option<Uuid> = companies::table
                        .filter(companies::owner_user_id.eq(truck.owner_user_id))
                        .order(companies::created_at.asc())
                        .select(companies::id)
                        .first(conn)
                        .await
                        .optional()?;
                    let company_id = match existing {
                        Some(id) => id,
                        None => {
                            diesel::insert_into(companies::table)
                                .values(&fallback)
                                .execute(conn)
                                .await?;
                            fallback.id
                        }
                    };

                    diesel::insert_into(trucks::table)
                        .values(&NewTruckRow {
                            id: truck.id,
                            company_id,
                            registration_number: &truck.registration_number,
                            truck_type: &truck.truck_type,
                            capacity_tons: truck.capacity_tons,
                            status: TruckStatus::Available.as_str(),
                            created_at: truck.created_at,
                        })
                        .returning(TruckRow::as_returning())
                        .get_result(conn)
                        .await
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        row.into_truck()
    }

    async fn update_truck(
        &self,
        id: &Uuid,
        update: &TruckUpdate,
    ) -> Result<Option<Truck>, FleetRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changes = TruckChangeset {
            status: update.status.map(TruckStatus::as_str),
            assigned_driver_id: Some(update.assigned_driver_id),
        };
        let row: Option<TruckRow> = diesel::update(trucks::table.find(id))
            .set(&changes)
            .returning(TruckRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(TruckRow::into_truck).transpose()
    }

    async fn assign_driver(
        &self,
        id: &Uuid,
        driver_id: &Uuid,
    ) -> Result<Option<Truck>, FleetRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<TruckRow> = diesel::update(trucks::table.find(id))
            .set(trucks::assigned_driver_id.eq(Some(*driver_id)))
            .returning(TruckRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(TruckRow::into_truck).transpose()
    }
}
