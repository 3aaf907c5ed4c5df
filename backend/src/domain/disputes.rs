//! Disputes raised by users and resolved by admins.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::text_enum::define_text_enum;

define_text_enum! {
    /// Review state of a dispute. Admins may move between any two states.
    pub enum DisputeStatus as "status" {
        Open => "open",
        InReview => "in_review",
        Resolved => "resolved",
        Rejected => "rejected",
    }
}

/// A complaint about a trip, load, or user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Dispute {
    pub id: Uuid,
    pub trip_id: Option<Uuid>,
    pub load_id: Option<Uuid>,
    pub raised_by_id: Uuid,
    pub against_user_id: Option<Uuid>,
    pub reason: String,
    pub status: DisputeStatus,
    pub resolution: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User input for raising a dispute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisputeDraft {
    pub reason: String,
    pub trip_id: Option<Uuid>,
    pub load_id: Option<Uuid>,
    pub against_user_id: Option<Uuid>,
}

/// Listing filter for disputes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisputeFilter {
    /// Restrict to disputes raised by this user.
    pub raised_by: Option<Uuid>,
    pub status: Option<DisputeStatus>,
}

impl DisputeFilter {
    /// Whether `dispute` passes every populated filter.
    pub fn matches(&self, dispute: &Dispute) -> bool {
        self.raised_by.is_none_or(|id| dispute.raised_by_id == id)
            && self.status.is_none_or(|status| dispute.status == status)
    }
}

/// Admin decision on a dispute. An absent resolution keeps the stored text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisputeResolution {
    pub status: DisputeStatus,
    pub resolution: Option<String>,
    pub at: DateTime<Utc>,
}

/// Dispute joined with the emails of both parties, for the admin console.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct DisputeWithParties {
    #[serde(flatten)]
    pub dispute: Dispute,
    pub raised_by_email: Option<String>,
    pub against_email: Option<String>,
}
