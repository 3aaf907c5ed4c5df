//! Load board: freight loads, bids, and assignment.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::text_enum::define_text_enum;

define_text_enum! {
    /// Lifecycle of a posted load.
    pub enum LoadStatus as "status" {
        Open => "open",
        Assigned => "assigned",
        InProgress => "in_progress",
        Delivered => "delivered",
        Cancelled => "cancelled",
    }
}

define_text_enum! {
    /// Outcome of a bid.
    pub enum BidStatus as "status" {
        Pending => "pending",
        Accepted => "accepted",
        Rejected => "rejected",
    }
}

/// Freight posted by a shipper.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Load {
    pub id: Uuid,
    pub shipper_id: Uuid,
    pub title: String,
    pub goods_type: Option<String>,
    pub weight_tons: f64,
    pub pickup_location: String,
    pub delivery_location: String,
    pub pickup_window_start: Option<DateTime<Utc>>,
    pub pickup_window_end: Option<DateTime<Utc>>,
    pub status: LoadStatus,
    pub assigned_truck_id: Option<Uuid>,
    pub assigned_driver_id: Option<Uuid>,
    pub price_fixed: Option<f64>,
    pub bidding_enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Shipper input for posting a load.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadDraft {
    pub title: String,
    pub goods_type: Option<String>,
    pub weight_tons: f64,
    pub pickup_location: String,
    pub delivery_location: String,
    pub pickup_window_start: Option<DateTime<Utc>>,
    pub pickup_window_end: Option<DateTime<Utc>>,
    pub price_fixed: Option<f64>,
    pub bidding_enabled: Option<bool>,
}

/// Optional filters for load listings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadFilter {
    /// Case-insensitive substring of the pickup location.
    pub pickup: Option<String>,
    /// Case-insensitive substring of the delivery location.
    pub delivery: Option<String>,
    pub weight_min: Option<f64>,
    pub weight_max: Option<f64>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub status: Option<LoadStatus>,
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

impl LoadFilter {
    /// Whether `load` passes every populated filter. Price bounds exclude
    /// loads without a fixed price.
    pub fn matches(&self, load: &Load) -> bool {
        let price_in_range = |bound: Option<f64>, cmp: fn(f64, f64) -> bool| {
            bound.is_none_or(|limit| load.price_fixed.is_some_and(|price| cmp(price, limit)))
        };
        self.pickup
            .as_deref()
            .is_none_or(|p| contains_ignore_case(&load.pickup_location, p))
            && self
                .delivery
                .as_deref()
                .is_none_or(|d| contains_ignore_case(&load.delivery_location, d))
            && self.weight_min.is_none_or(|min| load.weight_tons >= min)
            && self.weight_max.is_none_or(|max| load.weight_tons <= max)
            && price_in_range(self.price_min, |price, min| price >= min)
            && price_in_range(self.price_max, |price, max| price <= max)
            && self.status.is_none_or(|status| load.status == status)
    }
}

/// Shipper edit of an owned load; absent fields keep stored values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadUpdate {
    pub status: Option<LoadStatus>,
    pub price_fixed: Option<f64>,
}

/// A carrier's offer on a load.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Bid {
    pub id: Uuid,
    pub load_id: Uuid,
    pub bidder_id: Uuid,
    pub proposed_price: f64,
    pub message: String,
    pub status: BidStatus,
    pub created_at: DateTime<Utc>,
}

/// Carrier input for bidding on a load.
#[derive(Debug, Clone, PartialEq)]
pub struct BidDraft {
    pub proposed_price: f64,
    pub message: Option<String>,
}

/// Truck and driver chosen for a load, optionally accepting a bid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadAssignment {
    pub truck_id: Uuid,
    pub driver_id: Uuid,
    pub bid_id: Option<Uuid>,
}
