//! Admin console and per-role dashboards.

use std::sync::Arc;

use mockable::Clock;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::domain::dispute_service::map_dispute_error;
use crate::domain::ports::{
    DisputeRepository, ReportingRepository, ReportingRepositoryError, UserRepository,
    UserRepositoryError,
};
use crate::domain::{
    AuthenticatedUser, CommissionRule, CommissionView, DEFAULT_COMMISSION_NAME, DashboardStats,
    DisputeStatus, DisputeWithParties, Error, NoStats, PlatformReport, Role, User,
};

fn map_reporting_error(error: ReportingRepositoryError) -> Error {
    match error {
        ReportingRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("reporting repository unavailable: {message}"))
        }
        ReportingRepositoryError::Query { message } => {
            Error::internal(format!("reporting repository error: {message}"))
        }
        ReportingRepositoryError::Conflict { message } => Error::conflict(message),
        ReportingRepositoryError::MissingReference { message } => Error::not_found(message),
    }
}

fn map_user_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserRepositoryError::Conflict { message } => Error::conflict(message),
        UserRepositoryError::MissingReference { message } => Error::not_found(message),
    }
}

/// Reject commission percentages outside `0..=100`.
fn validate_percentage(percentage: f64) -> Result<f64, Error> {
    if percentage.is_finite() && (0.0..=100.0).contains(&percentage) {
        return Ok(percentage);
    }
    Err(
        Error::invalid_request("percentage must be between 0 and 100").with_details(json!({
            "field": "percentage",
            "code": "out_of_range",
        })),
    )
}

/// Admin and dashboard service.
#[derive(Clone)]
pub struct AdminService {
    users: Arc<dyn UserRepository>,
    reporting: Arc<dyn ReportingRepository>,
    disputes: Arc<dyn DisputeRepository>,
    clock: Arc<dyn Clock>,
}

impl AdminService {
    /// Create the service from its ports.
    pub fn new(
        users: Arc<dyn UserRepository>,
        reporting: Arc<dyn ReportingRepository>,
        disputes: Arc<dyn DisputeRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            reporting,
            disputes,
            clock,
        }
    }

    /// Every account, newest first.
    pub async fn list_users(&self, caller: &AuthenticatedUser) -> Result<Vec<User>, Error> {
        caller.require_role(&[Role::Admin])?;
        self.users.list_users().await.map_err(map_user_error)
    }

    /// Platform-wide counters.
    pub async fn reports(&self, caller: &AuthenticatedUser) -> Result<PlatformReport, Error> {
        caller.require_role(&[Role::Admin])?;
        self.reporting
            .platform_report()
            .await
            .map_err(map_reporting_error)
    }

    /// Disputes with party emails, optionally by status.
    pub async fn disputes(
        &self,
        caller: &AuthenticatedUser,
        status: Option<DisputeStatus>,
    ) -> Result<Vec<DisputeWithParties>, Error> {
        caller.require_role(&[Role::Admin])?;
        self.disputes
            .list_with_parties(status)
            .await
            .map_err(map_dispute_error)
    }

    /// The active commission rule, or a zero default.
    pub async fn commission(&self, caller: &AuthenticatedUser) -> Result<CommissionView, Error> {
        caller.require_role(&[Role::Admin])?;
        let active = self
            .reporting
            .active_commission()
            .await
            .map_err(map_reporting_error)?;
        Ok(active.map_or_else(CommissionView::fallback, CommissionView::from))
    }

    /// Replace the active commission rule.
    pub async fn set_commission(
        &self,
        caller: &AuthenticatedUser,
        name: Option<String>,
        percentage: f64,
    ) -> Result<CommissionRule, Error> {
        caller.require_role(&[Role::Admin])?;
        let rule = CommissionRule {
            id: Uuid::new_v4(),
            name: name.unwrap_or_else(|| DEFAULT_COMMISSION_NAME.to_owned()),
            percentage: validate_percentage(percentage)?,
            active: true,
            created_at: self.clock.utc(),
        };
        self.reporting
            .replace_commission(&rule)
            .await
            .map_err(map_reporting_error)?;
        info!(rule_id = %rule.id, percentage = rule.percentage, "commission rule replaced");
        Ok(rule)
    }

    /// Mark a document verified.
    pub async fn verify_document(
        &self,
        caller: &AuthenticatedUser,
        document_id: Uuid,
    ) -> Result<(), Error> {
        caller.require_role(&[Role::Admin])?;
        let found = self
            .reporting
            .verify_document(&document_id)
            .await
            .map_err(map_reporting_error)?;
        if !found {
            return Err(Error::not_found("Document not found"));
        }
        info!(%document_id, "document verified");
        Ok(())
    }

    /// Suspend or reactivate an account. Returns the outcome message.
    pub async fn suspend_user(
        &self,
        caller: &AuthenticatedUser,
        user_id: Uuid,
        suspended: bool,
    ) -> Result<&'static str, Error> {
        caller.require_role(&[Role::Admin])?;
        let found = self
            .users
            .set_verified(&user_id, !suspended, self.clock.utc())
            .await
            .map_err(map_user_error)?;
        if !found {
            return Err(Error::not_found("User not found"));
        }
        info!(%user_id, suspended, by = %caller.id, "account status changed");
        Ok(if suspended {
            "User suspended"
        } else {
            "User activated"
        })
    }

    /// Counters for the caller's own dashboard.
    pub async fn dashboard_stats(
        &self,
        caller: &AuthenticatedUser,
    ) -> Result<DashboardStats, Error> {
        let stats = match caller.role {
            Role::Driver => DashboardStats::Driver(
                self.reporting
                    .driver_stats(&caller.id)
                    .await
                    .map_err(map_reporting_error)?,
            ),
            Role::FleetOwner => DashboardStats::FleetOwner(
                self.reporting
                    .fleet_owner_stats(&caller.id)
                    .await
                    .map_err(map_reporting_error)?,
            ),
            Role::Shipper => DashboardStats::Shipper(
                self.reporting
                    .shipper_stats(&caller.id)
                    .await
                    .map_err(map_reporting_error)?,
            ),
            Role::Admin => DashboardStats::None(NoStats {}),
        };
        Ok(stats)
    }
}

#[cfg(test)]
#[path = "admin_service_tests.rs"]
mod tests;
