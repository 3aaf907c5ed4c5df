//! PostgreSQL-backed `ReportingRepository` implementation using Diesel ORM.
//!
//! The platform report and each role dashboard are read inside one
//! read-only repeatable-read transaction, so every figure in a response comes
//! from the same snapshot.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{ReportingRepository, ReportingRepositoryError};
use crate::domain::{
    CommissionRule, DisputeStatus, DriverStats, FleetOwnerStats, LoadStatus, PaymentStatus,
    PlatformReport, ShipperStats, TripStatus, TruckStatus,
};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::CommissionRuleRow;
use super::pool::DbPool;
use super::schema::{
    commission_rules, companies, disputes, documents, loads, payments, trips, trucks, users,
};

/// Diesel-backed implementation of the `ReportingRepository` port.
#[derive(Clone)]
pub struct DieselReportingRepository {
    pool: DbPool,
}

impl DieselReportingRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReportingRepository for DieselReportingRepository {
    async fn platform_report(&self) -> Result<PlatformReport, ReportingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.build_transaction()
            .repeatable_read()
            .read_only()
            .run::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let total_users = users::table.count().get_result(conn).await?;
                    let total_trucks = trucks::table.count().get_result(conn).await?;
                    let open_loads = loads::table
                        .filter(loads::status.eq(LoadStatus::Open.as_str()))
                        .count()
                        .get_result(conn)
                        .await?;
                    let completed_loads = loads::table
                        .filter(loads::status.eq(LoadStatus::Delivered.as_str()))
                        .count()
                        .get_result(conn)
                        .await?;
                    let open_disputes = disputes::table
                        .filter(disputes::status.eq(DisputeStatus::Open.as_str()))
                        .count()
                        .get_result(conn)
                        .await?;
                    let total_revenue: Option<f64> = payments::table
                        .filter(payments::status.eq(PaymentStatus::Paid.as_str()))
                        .select(diesel::dsl::sum(payments::amount))
                        .get_result(conn)
                        .await?;

                    Ok(PlatformReport {
                        total_users,
                        total_trucks,
                        open_loads,
                        completed_loads,
                        open_disputes,
                        total_revenue: total_revenue.unwrap_or(0.0),
                    })
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)
    }

    async fn active_commission(&self) -> Result<Option<CommissionRule>, ReportingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<CommissionRuleRow> = commission_rules::table
            .filter(commission_rules::is_active.eq(true))
            .order(commission_rules::created_at.desc())
            .select(CommissionRuleRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(CommissionRule::from))
    }

    async fn replace_commission(
        &self,
        rule: &CommissionRule,
    ) -> Result<(), ReportingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = CommissionRuleRow::from(rule);
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                diesel::update(commission_rules::table.filter(commission_rules::is_active.eq(true)))
                    .set(commission_rules::is_active.eq(false))
                    .execute(conn)
                    .await?;
                diesel::insert_into(commission_rules::table)
                    .values(&row)
                    .execute(conn)
                    .await?;
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn verify_document(&self, id: &Uuid) -> Result<bool, ReportingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let affected = diesel::update(documents::table.find(id))
            .set(documents::is_verified.eq(true))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(affected > 0)
    }

    async fn driver_stats(&self, user_id: &Uuid) -> Result<DriverStats, ReportingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let user_id = *user_id;
        conn.build_transaction()
            .repeatable_read()
            .read_only()
            .run::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let delivered = TripStatus::Delivered.as_str();
                    let active_trips = trips::table
                        .filter(trips::driver_id.eq(user_id))
                        .filter(trips::status.ne(delivered))
                        .count()
                        .get_result(conn)
                        .await?;
                    let completed_trips = trips::table
                        .filter(trips::driver_id.eq(user_id))
                        .filter(trips::status.eq(delivered))
                        .count()
                        .get_result(conn)
                        .await?;
                    let total_earnings: Option<f64> = payments::table
                        .filter(payments::payee_id.eq(user_id))
                        .filter(payments::status.eq(PaymentStatus::Paid.as_str()))
                        .select(diesel::dsl::sum(payments::amount))
                        .get_result(conn)
                        .await?;

                    Ok(DriverStats {
                        active_trips,
                        completed_trips,
                        total_earnings: total_earnings.unwrap_or(0.0),
                    })
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)
    }

    async fn fleet_owner_stats(
        &self,
        user_id: &Uuid,
    ) -> Result<FleetOwnerStats, ReportingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let user_id = *user_id;
        conn.build_transaction()
            .repeatable_read()
            .read_only()
            .run::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let total_trucks = trucks::table
                        .inner_join(companies::table)
                        .filter(companies::owner_user_id.eq(user_id))
                        .count()
                        .get_result(conn)
                        .await?;
                    let available_trucks = trucks::table
                        .inner_join(companies::table)
                        .filter(companies::owner_user_id.eq(user_id))
                        .filter(trucks::status.eq(TruckStatus::Available.as_str()))
                        .count()
                        .get_result(conn)
                        .await?;
                    let fleet_drivers = trucks::table
                        .inner_join(companies::table)
                        .filter(companies::owner_user_id.eq(user_id))
                        .filter(trucks::assigned_driver_id.is_not_null())
                        .select(trucks::assigned_driver_id);
                    let active_jobs = loads::table
                        .filter(loads::status.eq(LoadStatus::InProgress.as_str()))
                        .filter(loads::assigned_driver_id.eq_any(fleet_drivers))
                        .count()
                        .get_result(conn)
                        .await?;

                    Ok(FleetOwnerStats {
                        total_trucks,
                        available_trucks,
                        active_jobs,
                    })
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)
    }

    async fn shipper_stats(
        &self,
        user_id: &Uuid,
    ) -> Result<ShipperStats, ReportingRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let user_id = *user_id;
        conn.build_transaction()
            .repeatable_read()
            .read_only()
            .run::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let total_loads = loads::table
                        .filter(loads::shipper_id.eq(user_id))
                        .count()
                        .get_result(conn)
                        .await?;
                    let open_loads = loads::table
                        .filter(loads::shipper_id.eq(user_id))
                        .filter(loads::status.eq(LoadStatus::Open.as_str()))
                        .count()
                        .get_result(conn)
                        .await?;
                    let own_loads = loads::table
                        .filter(loads::shipper_id.eq(user_id))
                        .select(loads::id);
                    let pending_payments: Option<f64> = payments::table
                        .filter(payments::status.eq(PaymentStatus::Pending.as_str()))
                        .filter(payments::load_id.eq_any(own_loads))
                        .select(diesel::dsl::sum(payments::amount))
                        .get_result(conn)
                        .await?;

                    Ok(ShipperStats {
                        total_loads,
                        open_loads,
                        pending_payments: pending_payments.unwrap_or(0.0),
                    })
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)
    }
}
