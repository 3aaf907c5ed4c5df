//! Disputes raised between users.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::{DisputeRepository, DisputeRepositoryError};
use crate::domain::{
    Dispute, DisputeFilter, DisputeResolution, DisputeStatus, DisputeWithParties,
};

use super::{MemoryStore, newest_first, require_references};

#[async_trait]
impl DisputeRepository for MemoryStore {
    async fn create_dispute(&self, dispute: &Dispute) -> Result<(), DisputeRepositoryError> {
        let mut state = self.state.lock().await;
        require_references(&[
            (
                state.user_exists(dispute.raised_by_id),
                "disputes_raised_by_id_fkey",
            ),
            (
                dispute.against_user_id.is_none_or(|id| state.user_exists(id)),
                "disputes_against_user_id_fkey",
            ),
            (
                dispute.trip_id.is_none_or(|id| state.trip_exists(id)),
                "disputes_trip_id_fkey",
            ),
            (
                dispute.load_id.is_none_or(|id| state.load_exists(id)),
                "disputes_load_id_fkey",
            ),
        ])?;
        state.disputes.push(dispute.clone());
        Ok(())
    }

    async fn list_disputes(
        &self,
        filter: &DisputeFilter,
    ) -> Result<Vec<Dispute>, DisputeRepositoryError> {
        let state = self.state.lock().await;
        Ok(newest_first(
            state.disputes.iter().filter(|dispute| filter.matches(dispute)),
        ))
    }

    async fn find_dispute(&self, id: &Uuid) -> Result<Option<Dispute>, DisputeRepositoryError> {
        let state = self.state.lock().await;
        Ok(state.disputes.iter().find(|dispute| dispute.id == *id).cloned())
    }

    async fn resolve_dispute(
        &self,
        id: &Uuid,
        resolution: &DisputeResolution,
    ) -> Result<Option<Dispute>, DisputeRepositoryError> {
        let mut state = self.state.lock().await;
        let Some(dispute) = state.disputes.iter_mut().find(|dispute| dispute.id == *id) else {
            return Ok(None);
        };
        dispute.status = resolution.status;
        if let Some(text) = &resolution.resolution {
            dispute.resolution = Some(text.clone());
        }
        dispute.updated_at = resolution.at;
        Ok(Some(dispute.clone()))
    }

    async fn list_with_parties(
        &self,
        status: Option<DisputeStatus>,
    ) -> Result<Vec<DisputeWithParties>, DisputeRepositoryError> {
        let state = self.state.lock().await;
        let filter = DisputeFilter {
            raised_by: None,
            status,
        };
        Ok(newest_first(
            state.disputes.iter().filter(|dispute| filter.matches(dispute)),
        )
        .into_iter()
        .map(|dispute| DisputeWithParties {
            raised_by_email: state.email_of(dispute.raised_by_id),
            against_email: dispute.against_user_id.and_then(|id| state.email_of(id)),
            dispute,
        })
        .collect())
    }
}
