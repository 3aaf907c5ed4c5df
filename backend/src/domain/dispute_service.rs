//! Disputes raised by users and resolved by admins.

use std::sync::Arc;

use mockable::Clock;
use tracing::info;
use uuid::Uuid;

use crate::domain::ports::{DisputeRepository, DisputeRepositoryError};
use crate::domain::{
    AuthenticatedUser, Dispute, DisputeDraft, DisputeFilter, DisputeResolution, DisputeStatus,
    Error, Role,
};

pub(crate) fn map_dispute_error(error: DisputeRepositoryError) -> Error {
    match error {
        DisputeRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("dispute repository unavailable: {message}"))
        }
        DisputeRepositoryError::Query { message } => {
            Error::internal(format!("dispute repository error: {message}"))
        }
        DisputeRepositoryError::Conflict { message } => Error::conflict(message),
        DisputeRepositoryError::MissingReference { .. } => {
            Error::not_found("Referenced trip, load, or user not found")
        }
    }
}

fn dispute_not_found() -> Error {
    Error::not_found("Dispute not found")
}

/// Dispute service.
#[derive(Clone)]
pub struct DisputeService {
    disputes: Arc<dyn DisputeRepository>,
    clock: Arc<dyn Clock>,
}

impl DisputeService {
    /// Create the service from its repository and clock.
    pub fn new(disputes: Arc<dyn DisputeRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { disputes, clock }
    }

    /// Raise an open dispute.
    pub async fn create_dispute(
        &self,
        caller: &AuthenticatedUser,
        draft: DisputeDraft,
    ) -> Result<Dispute, Error> {
        let now = self.clock.utc();
        let dispute = Dispute {
            id: Uuid::new_v4(),
            trip_id: draft.trip_id,
            load_id: draft.load_id,
            raised_by_id: caller.id,
            against_user_id: draft.against_user_id,
            reason: draft.reason,
            status: DisputeStatus::Open,
            resolution: None,
            created_at: now,
            updated_at: now,
        };
        self.disputes
            .create_dispute(&dispute)
            .await
            .map_err(map_dispute_error)?;
        info!(dispute_id = %dispute.id, raised_by = %caller.id, "dispute raised");
        Ok(dispute)
    }

    /// Admins see every dispute, optionally by status; everyone else sees
    /// the ones they raised.
    pub async fn list_disputes(
        &self,
        caller: &AuthenticatedUser,
        status: Option<DisputeStatus>,
    ) -> Result<Vec<Dispute>, Error> {
        let filter = if caller.is_admin() {
            DisputeFilter {
                raised_by: None,
                status,
            }
        } else {
            DisputeFilter {
                raised_by: Some(caller.id),
                status: None,
            }
        };
        self.disputes
            .list_disputes(&filter)
            .await
            .map_err(map_dispute_error)
    }

    /// A dispute visible to its raiser and admins.
    pub async fn get_dispute(
        &self,
        caller: &AuthenticatedUser,
        id: Uuid,
    ) -> Result<Dispute, Error> {
        let dispute = self
            .disputes
            .find_dispute(&id)
            .await
            .map_err(map_dispute_error)?
            .ok_or_else(dispute_not_found)?;
        if !caller.is_admin() && dispute.raised_by_id != caller.id {
            return Err(Error::forbidden("Access denied"));
        }
        Ok(dispute)
    }

    /// Set a dispute's status and, when given, its resolution text.
    pub async fn resolve_dispute(
        &self,
        caller: &AuthenticatedUser,
        id: Uuid,
        status: DisputeStatus,
        resolution: Option<String>,
    ) -> Result<Dispute, Error> {
        caller.require_role(&[Role::Admin])?;
        let decision = DisputeResolution {
            status,
            resolution,
            at: self.clock.utc(),
        };
        let dispute = self
            .disputes
            .resolve_dispute(&id, &decision)
            .await
            .map_err(map_dispute_error)?
            .ok_or_else(dispute_not_found)?;
        info!(dispute_id = %dispute.id, status = %dispute.status, "dispute resolved");
        Ok(dispute)
    }
}

#[cfg(test)]
#[path = "dispute_service_tests.rs"]
mod tests;
