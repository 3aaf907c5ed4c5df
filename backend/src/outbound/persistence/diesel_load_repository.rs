//! PostgreSQL-backed `LoadRepository` implementation using Diesel ORM.
//!
//! Assignment locks the load row, checks the optional bid, and writes both in
//! one transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{LoadRepository, LoadRepositoryError};
use crate::domain::{Bid, BidStatus, Load, LoadAssignment, LoadFilter, LoadStatus, LoadUpdate};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{BidRow, LoadChangeset, LoadRow, NewBidRow, NewLoadRow};
use super::pool::DbPool;
use super::schema::{bids, loads};

/// Diesel-backed implementation of the `LoadRepository` port.
#[derive(Clone)]
pub struct DieselLoadRepository {
    pool: DbPool,
}

impl DieselLoadRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Outcome of the assignment transaction before row conversion.
enum Assignment {
    Done(LoadRow),
    LoadMissing,
    BidMissing(Uuid),
}

fn ilike_pattern(fragment: &str) -> String {
    let escaped = fragment
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[async_trait]
impl LoadRepository for DieselLoadRepository {
    async fn list_loads(&self, filter: &LoadFilter) -> Result<Vec<Load>, LoadRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = loads::table
            .select(LoadRow::as_select())
            .order(loads::created_at.desc())
            .into_boxed();
        if let Some(pickup) = filter.pickup.as_deref() {
            query = query.filter(loads::pickup_location.ilike(ilike_pattern(pickup)));
        }
        if let Some(delivery) = filter.delivery.as_deref() {
            query = query.filter(loads::delivery_location.ilike(ilike_pattern(delivery)));
        }
        if let Some(min) = filter.weight_min {
            query = query.filter(loads::weight_tons.ge(min));
        }
        if let Some(max) = filter.weight_max {
            query = query.filter(loads::weight_tons.le(max));
        }
        if let Some(min) = filter.price_min {
            query = query.filter(loads::price_fixed.ge(min));
        }
        if let Some(max) = filter.price_max {
            query = query.filter(loads::price_fixed.le(max));
        }
        if let Some(status) = filter.status {
            query = query.filter(loads::status.eq(status.as_str()));
        }

        let rows: Vec<LoadRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        rows.into_iter().map(LoadRow::into_load).collect()
    }

    async fn find_load(&self, id: &Uuid) -> Result<Option<Load>, LoadRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<LoadRow> = loads::table
            .find(id)
            .select(LoadRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(LoadRow::into_load).transpose()
    }

    async fn create_load(&self, load: &Load) -> Result<(), LoadRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(loads::table)
            .values(&NewLoadRow::from(load))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn update_load(
        &self,
        shipper_id: &Uuid,
        load_id: &Uuid,
        update: &LoadUpdate,
        at: DateTime<Utc>,
    ) -> Result<Option<Load>, LoadRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changes = LoadChangeset {
            status: update.status.map(LoadStatus::as_str),
            price_fixed: update.price_fixed,
            updated_at: at,
        };
        let row: Option<LoadRow> = diesel::update(
            loads::table
                .filter(loads::id.eq(load_id))
                .filter(loads::shipper_id.eq(shipper_id)),
        )
        .set(&changes)
        .returning(LoadRow::as_returning())
        .get_result(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

        row.map(LoadRow::into_load).transpose()
    }

    async fn create_bid(&self, bid: &Bid) -> Result<(), LoadRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(bids::table)
            .values(&NewBidRow::from(bid))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn list_bids(&self, load_id: &Uuid) -> Result<Vec<Bid>, LoadRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<BidRow> = bids::table
            .filter(bids::load_id.eq(load_id))
            .order(bids::created_at.desc())
            .select(BidRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(BidRow::into_bid).collect()
    }

    async fn assign_load(
        &self,
        load_id: &Uuid,
        assignment: &LoadAssignment,
        at: DateTime<Utc>,
    ) -> Result<Option<Load>, LoadRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let load_id = *load_id;
        let assignment = *assignment;
        let outcome = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let locked: Option<Uuid> = loads::table
                        .find(load_id)
                        .select(loads::id)
                        .for_update()
                        .first(conn)
                        .await
                        .optional()?;
                    if locked.is_none() {
                        return Ok(Assignment::LoadMissing);
                    }

                    if let Some(bid_id) = assignment.bid_id {
                        let on_load: Option<Uuid> = bids::table
                            .filter(bids::id.eq(bid_id))
                            .filter(bids::load_id.eq(load_id))
                            .select(bids::id)
                            .first(conn)
                            .await
                            .optional()?;
                        if on_load.is_none() {
                            return Ok(Assignment::BidMissing(bid_id));
                        }
                    }

                    let row = diesel::update(loads::table.find(load_id))
                        .set((
                            loads::status.eq(LoadStatus::Assigned.as_str()),
                            loads::assigned_truck_id.eq(Some(assignment.truck_id)),
                            loads::assigned_driver_id.eq(Some(assignment.driver_id)),
                            loads::updated_at.eq(at),
                        ))
                        .returning(LoadRow::as_returning())
                        .get_result(conn)
                        .await?;

                    if let Some(bid_id) = assignment.bid_id {
                        diesel::update(bids::table.find(bid_id))
                            .set(bids::status.eq(BidStatus::Accepted.as_str()))
                            .execute(conn)
                            .await?;
                    }

                    Ok(Assignment::Done(row))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        match outcome {
            Assignment::Done(row) => row.into_load().map(Some),
            Assignment::LoadMissing => Ok(None),
            Assignment::BidMissing(bid_id) => Err(LoadRepositoryError::bid_not_found(bid_id)),
        }
    }
}
