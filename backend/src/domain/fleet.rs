//! Fleet registry: companies and trucks.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::text_enum::define_text_enum;

/// Name given to a company created implicitly on a fleet owner's first truck.
pub const DEFAULT_COMPANY_NAME: &str = "My Fleet Company";

define_text_enum! {
    /// Operational state of a truck.
    pub enum TruckStatus as "status" {
        Available => "available",
        OnTrip => "on_trip",
        Maintenance => "maintenance",
    }
}

/// Company owned by a fleet owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Company {
    pub id: Uuid,
    pub owner_user_id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub gst_vat_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A registered truck.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Truck {
    pub id: Uuid,
    pub company_id: Uuid,
    pub registration_number: String,
    pub truck_type: String,
    pub capacity_tons: f64,
    pub status: TruckStatus,
    pub assigned_driver_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Truck details supplied by a fleet owner.
#[derive(Debug, Clone, PartialEq)]
pub struct TruckDraft {
    pub registration_number: String,
    pub truck_type: String,
    pub capacity_tons: f64,
}

/// Insert request handed to the repository. The company is resolved (or
/// created with `fallback_company`) inside the same transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTruck {
    pub id: Uuid,
    pub owner_user_id: Uuid,
    pub fallback_company: Company,
    pub registration_number: String,
    pub truck_type: String,
    pub capacity_tons: f64,
    pub created_at: DateTime<Utc>,
}

/// Optional filters for truck listings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TruckFilter {
    pub company_id: Option<Uuid>,
    pub status: Option<TruckStatus>,
    pub min_capacity_tons: Option<f64>,
}

impl TruckFilter {
    /// Whether `truck` passes every populated filter.
    pub fn matches(&self, truck: &Truck) -> bool {
        self.company_id.is_none_or(|id| truck.company_id == id)
            && self.status.is_none_or(|status| truck.status == status)
            && self
                .min_capacity_tons
                .is_none_or(|min| truck.capacity_tons >= min)
    }
}

/// Fleet-owner edit of a truck.
///
/// An absent status keeps the stored one; the assigned driver is replaced
/// as given, so `None` unassigns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TruckUpdate {
    pub status: Option<TruckStatus>,
    pub assigned_driver_id: Option<Uuid>,
}
