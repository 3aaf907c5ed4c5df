//! PostgreSQL-backed `DisputeRepository` implementation using Diesel ORM.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{DisputeRepository, DisputeRepositoryError};
use crate::domain::{Dispute, DisputeFilter, DisputeResolution, DisputeStatus, DisputeWithParties};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{DisputeChangeset, DisputeRow, NewDisputeRow};
use super::pool::DbPool;
use super::schema::{disputes, users};

/// Diesel-backed implementation of the `DisputeRepository` port.
#[derive(Clone)]
pub struct DieselDisputeRepository {
    pool: DbPool,
}

impl DieselDisputeRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DisputeRepository for DieselDisputeRepository {
    async fn create_dispute(&self, dispute: &Dispute) -> Result<(), DisputeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(disputes::table)
            .values(&NewDisputeRow::from(dispute))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn list_disputes(
        &self,
        filter: &DisputeFilter,
    ) -> Result<Vec<Dispute>, DisputeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = disputes::table
            .select(DisputeRow::as_select())
            .order(disputes::created_at.desc())
            .into_boxed();
        if let Some(raised_by) = filter.raised_by {
            query = query.filter(disputes::raised_by_id.eq(raised_by));
        }
        if let Some(status) = filter.status {
            query = query.filter(disputes::status.eq(status.as_str()));
        }

        let rows: Vec<DisputeRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        rows.into_iter().map(DisputeRow::into_dispute).collect()
    }

    async fn find_dispute(&self, id: &Uuid) -> Result<Option<Dispute>, DisputeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<DisputeRow> = disputes::table
            .find(id)
            .select(DisputeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(DisputeRow::into_dispute).transpose()
    }

    async fn resolve_dispute(
        &self,
        id: &Uuid,
        resolution: &DisputeResolution,
    ) -> Result<Option<Dispute>, DisputeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let changes = DisputeChangeset {
            status: resolution.status.as_str(),
            resolution: resolution.resolution.as_deref(),
            updated_at: resolution.at,
        };
        let row: Option<DisputeRow> = diesel::update(disputes::table.find(id))
            .set(&changes)
            .returning(DisputeRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(DisputeRow::into_dispute).transpose()
    }

    async fn list_with_parties(
        &self,
        status: Option<DisputeStatus>,
    ) -> Result<Vec<DisputeWithParties>, DisputeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let (rows, emails) = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let mut query = disputes::table
                        .select(DisputeRow::as_select())
                        .order(disputes::created_at.desc())
                        .into_boxed();
                    if let Some(status) = status {
                        query = query.filter(disputes::status.eq(status.as_str()));
                    }
                    let rows: Vec<DisputeRow> = query.load(conn).await?;

                    let party_ids: Vec<Uuid> = rows
                        .iter()
                        .flat_map(|row| [Some(row.raised_by_id), row.against_user_id])
                        .flatten()
                        .collect();
                    let emails: Vec<(Uuid, String)> = users::table
                        .filter(users::id.eq_any(party_ids))
                        .select((users::id, users::email))
                        .load(conn)
                        .await?;
                    Ok((rows, emails))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        let emails: HashMap<Uuid, String> = emails.into_iter().collect();
        rows.into_iter()
            .map(|row| {
                let dispute = row.into_dispute()?;
                Ok(DisputeWithParties {
                    raised_by_email: emails.get(&dispute.raised_by_id).cloned(),
                    against_email: dispute
                        .against_user_id
                        .and_then(|id| emails.get(&id).cloned()),
                    dispute,
                })
            })
            .collect()
    }
}
