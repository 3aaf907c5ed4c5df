//! Trip lifecycle and delivery documents.
//!
//! A trip moves strictly forward through
//! `assigned -> picked_up -> in_transit -> delivered`. Skips, repeats, and
//! reversals are rejected so timestamps and the cascading load status stay
//! coherent.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use super::Error;
use super::text_enum::define_text_enum;

/// Owner type recorded on proof-of-delivery documents.
pub const TRIP_DOCUMENT_OWNER: &str = "trip";
/// Document type recorded for proof of delivery.
pub const PROOF_OF_DELIVERY: &str = "proof_of_delivery";

define_text_enum! {
    /// Position of a trip in its lifecycle.
    pub enum TripStatus as "status" {
        Assigned => "assigned",
        PickedUp => "picked_up",
        InTransit => "in_transit",
        Delivered => "delivered",
    }
}

impl TripStatus {
    /// The only status reachable from `self`, if any.
    pub const fn successor(self) -> Option<Self> {
        match self {
            Self::Assigned => Some(Self::PickedUp),
            Self::PickedUp => Some(Self::InTransit),
            Self::InTransit => Some(Self::Delivered),
            Self::Delivered => None,
        }
    }

    /// Validate a move from `self` to `next`.
    ///
    /// # Errors
    /// Returns a `409 Conflict` carrying `{from, to}` details when the move is
    /// not the single permitted successor.
    pub fn transition_to(self, next: Self) -> Result<Self, Error> {
        if self.successor() == Some(next) {
            return Ok(next);
        }
        Err(
            Error::conflict(format!("Cannot move trip from {self} to {next}")).with_details(json!({
                "from": self.as_str(),
                "to": next.as_str(),
                "code": "illegal_transition",
            })),
        )
    }
}

/// Execution of a load by a truck and driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Trip {
    pub id: Uuid,
    pub load_id: Uuid,
    pub truck_id: Uuid,
    pub driver_id: Uuid,
    pub start_time: Option<DateTime<Utc>>,
    pub pickup_time: Option<DateTime<Utc>>,
    pub delivery_time: Option<DateTime<Utc>>,
    pub status: TripStatus,
    pub created_at: DateTime<Utc>,
}

/// Identifiers chosen when opening a trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TripDraft {
    pub load_id: Uuid,
    pub truck_id: Uuid,
    pub driver_id: Uuid,
}

/// Which trips a caller may list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripScope {
    /// Every trip (admins).
    All,
    /// Trips the user drives or that run on trucks of a company they own.
    Participant(Uuid),
}

/// Validated status change applied atomically by the repository.
///
/// The repository must only apply it while the trip is still in `from` and
/// assigned to `driver_id`; entering `delivered` also marks the load delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TripTransition {
    pub trip_id: Uuid,
    pub driver_id: Uuid,
    pub from: TripStatus,
    pub to: TripStatus,
    pub at: DateTime<Utc>,
}

impl TripTransition {
    /// Apply this transition's timestamps and status to `trip`.
    pub fn apply(&self, trip: &mut Trip) {
        trip.status = self.to;
        match self.to {
            TripStatus::PickedUp => trip.pickup_time = Some(self.at),
            TripStatus::Delivered => trip.delivery_time = Some(self.at),
            TripStatus::Assigned | TripStatus::InTransit => {}
        }
    }

    /// Whether the linked load must move to `delivered`.
    pub fn delivers_load(&self) -> bool {
        self.to == TripStatus::Delivered
    }
}

/// Trip joined with load and truck details.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TripDetails {
    #[serde(flatten)]
    pub trip: Trip,
    pub title: String,
    pub goods_type: Option<String>,
    pub weight_tons: f64,
    pub pickup_location: String,
    pub delivery_location: String,
    pub registration_number: String,
}

/// Driver upload of a proof-of-delivery reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodUpload {
    pub file_ref: String,
    /// Free-form notes; accepted but not stored.
    pub notes: Option<String>,
}

/// An uploaded document reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Document {
    pub id: Uuid,
    pub owner_type: String,
    pub owner_id: Uuid,
    pub doc_type: String,
    pub file_ref: String,
    pub verified: bool,
    pub expiry_date: Option<chrono::NaiveDate>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;

    #[rstest]
    #[case(TripStatus::Assigned, TripStatus::PickedUp)]
    #[case(TripStatus::PickedUp, TripStatus::InTransit)]
    #[case(TripStatus::InTransit, TripStatus::Delivered)]
    fn forward_moves_are_allowed(#[case] from: TripStatus, #[case] to: TripStatus) {
        assert_eq!(from.transition_to(to), Ok(to));
    }

    #[rstest]
    #[case(TripStatus::Assigned, TripStatus::Delivered)]
    #[case(TripStatus::Assigned, TripStatus::InTransit)]
    #[case(TripStatus::Delivered, TripStatus::PickedUp)]
    #[case(TripStatus::InTransit, TripStatus::PickedUp)]
    #[case(TripStatus::PickedUp, TripStatus::PickedUp)]
    #[case(TripStatus::Delivered, TripStatus::Delivered)]
    fn skips_reversals_and_repeats_conflict(#[case] from: TripStatus, #[case] to: TripStatus) {
        let err = from.transition_to(to).expect_err("illegal move");
        assert_eq!(err.code(), ErrorCode::Conflict);
        let details = err.details().expect("transition details");
        assert_eq!(details["from"], from.as_str());
        assert_eq!(details["to"], to.as_str());
    }

    fn trip() -> Trip {
        Trip {
            id: Uuid::new_v4(),
            load_id: Uuid::new_v4(),
            truck_id: Uuid::new_v4(),
            driver_id: Uuid::new_v4(),
            start_time: None,
            pickup_time: None,
            delivery_time: None,
            status: TripStatus::Assigned,
            created_at: Utc::now(),
        }
    }

    #[rstest]
    #[case(TripStatus::Assigned, TripStatus::PickedUp, true, false)]
    #[case(TripStatus::PickedUp, TripStatus::InTransit, false, false)]
    #[case(TripStatus::InTransit, TripStatus::Delivered, false, true)]
    fn apply_stamps_timestamps(
        #[case] from: TripStatus,
        #[case] to: TripStatus,
        #[case] stamps_pickup: bool,
        #[case] stamps_delivery: bool,
    ) {
        let mut trip = trip();
        trip.status = from;
        let transition = TripTransition {
            trip_id: trip.id,
            driver_id: trip.driver_id,
            from,
            to,
            at: Utc::now(),
        };

        transition.apply(&mut trip);

        assert_eq!(trip.status, to);
        assert_eq!(trip.pickup_time.is_some(), stamps_pickup);
        assert_eq!(trip.delivery_time.is_some(), stamps_delivery);
        assert_eq!(transition.delivers_load(), stamps_delivery);
    }
}
