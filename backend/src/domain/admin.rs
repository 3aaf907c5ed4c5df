//! Platform reporting, commission rules, and per-role dashboards.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Name used when an admin sets a commission without naming it.
pub const DEFAULT_COMMISSION_NAME: &str = "Platform Commission";

/// Aggregate platform counters read from a single snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PlatformReport {
    pub total_users: i64,
    pub total_trucks: i64,
    pub open_loads: i64,
    pub completed_loads: i64,
    pub open_disputes: i64,
    /// Sum of paid payments.
    pub total_revenue: f64,
}

/// Stored commission rule. At most one rule is active.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CommissionRule {
    pub id: Uuid,
    pub name: String,
    pub percentage: f64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// Commission as reported to admins: the active rule or a zero default.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CommissionView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub name: String,
    pub percentage: f64,
    pub active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl CommissionView {
    /// View returned when no rule is active.
    pub fn fallback() -> Self {
        Self {
            id: None,
            name: "Default".to_owned(),
            percentage: 0.0,
            active: false,
            created_at: None,
        }
    }
}

impl From<CommissionRule> for CommissionView {
    fn from(rule: CommissionRule) -> Self {
        Self {
            id: Some(rule.id),
            name: rule.name,
            percentage: rule.percentage,
            active: rule.active,
            created_at: Some(rule.created_at),
        }
    }
}

/// Driver dashboard counters.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DriverStats {
    pub active_trips: i64,
    pub completed_trips: i64,
    /// Sum of paid payments received.
    pub total_earnings: f64,
}

/// Fleet owner dashboard counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FleetOwnerStats {
    pub total_trucks: i64,
    pub available_trucks: i64,
    /// Loads in progress driven by drivers assigned to the owner's trucks.
    pub active_jobs: i64,
}

/// Shipper dashboard counters.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ShipperStats {
    pub total_loads: i64,
    pub open_loads: i64,
    /// Sum of pending payments on the shipper's loads.
    pub pending_payments: f64,
}

/// Empty object returned for roles without a dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct NoStats {}

/// Role-specific dashboard payload.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(untagged)]
pub enum DashboardStats {
    Driver(DriverStats),
    FleetOwner(FleetOwnerStats),
    Shipper(ShipperStats),
    None(NoStats),
}
