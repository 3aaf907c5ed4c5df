//! Port for disputes.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Dispute, DisputeFilter, DisputeResolution, DisputeStatus, DisputeWithParties};

use super::define_port_error;

define_port_error! {
    /// Errors raised by dispute repository adapters.
    pub enum DisputeRepositoryError {}
}

/// Port for dispute records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DisputeRepository: Send + Sync {
    /// Insert a dispute.
    async fn create_dispute(&self, dispute: &Dispute) -> Result<(), DisputeRepositoryError>;

    /// Disputes matching `filter`, newest first.
    async fn list_disputes(
        &self,
        filter: &DisputeFilter,
    ) -> Result<Vec<Dispute>, DisputeRepositoryError>;

    /// Find a dispute by id.
    async fn find_dispute(&self, id: &Uuid) -> Result<Option<Dispute>, DisputeRepositoryError>;

    /// Apply an admin resolution; `None` when absent.
    async fn resolve_dispute(
        &self,
        id: &Uuid,
        resolution: &DisputeResolution,
    ) -> Result<Option<Dispute>, DisputeRepositoryError>;

    /// Disputes with both parties' emails, newest first.
    async fn list_with_parties(
        &self,
        status: Option<DisputeStatus>,
    ) -> Result<Vec<DisputeWithParties>, DisputeRepositoryError>;
}
