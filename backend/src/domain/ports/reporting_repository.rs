//! Port for admin reporting, commission rules, and dashboards.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{CommissionRule, DriverStats, FleetOwnerStats, PlatformReport, ShipperStats};

use super::define_port_error;

define_port_error! {
    /// Errors raised by reporting repository adapters.
    pub enum ReportingRepositoryError {}
}

/// Port for aggregate reads and platform settings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReportingRepository: Send + Sync {
    /// Platform counters computed from one consistent snapshot.
    async fn platform_report(&self) -> Result<PlatformReport, ReportingRepositoryError>;

    /// Newest active commission rule.
    async fn active_commission(&self) -> Result<Option<CommissionRule>, ReportingRepositoryError>;

    /// Deactivate every rule and insert `rule` as the active one, atomically.
    async fn replace_commission(&self, rule: &CommissionRule)
    -> Result<(), ReportingRepositoryError>;

    /// Mark a document verified; returns `false` when absent.
    async fn verify_document(&self, id: &Uuid) -> Result<bool, ReportingRepositoryError>;

    /// Dashboard counters for a driver.
    async fn driver_stats(&self, user_id: &Uuid) -> Result<DriverStats, ReportingRepositoryError>;

    /// Dashboard counters for a fleet owner.
    async fn fleet_owner_stats(
        &self,
        user_id: &Uuid,
    ) -> Result<FleetOwnerStats, ReportingRepositoryError>;

    /// Dashboard counters for a shipper.
    async fn shipper_stats(&self, user_id: &Uuid)
    -> Result<ShipperStats, ReportingRepositoryError>;
}
