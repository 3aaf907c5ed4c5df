//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Status and role columns are stored as text
//! and parsed back through the domain vocabularies on read.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::ports::PortFailure;
use crate::domain::{
    Bid, CommissionRule, Company, Dispute, Document, Load, Message, Payment, Trip, Truck,
    UnknownVariant, User,
};

use super::schema::{
    bids, commission_rules, companies, disputes, documents, driver_profiles, loads, messages,
    payments, trips, trucks, users,
};

/// Parse a stored vocabulary column, reporting corrupt values as query
/// failures.
pub(crate) fn parse_column<T, E>(value: &str) -> Result<T, E>
where
    T: FromStr<Err = UnknownVariant>,
    E: PortFailure,
{
    value
        .parse()
        .map_err(|err: UnknownVariant| E::query_failure(format!("corrupt stored value: {err}")))
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub role: String,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRow {
    pub fn into_user<E: PortFailure>(self) -> Result<User, E> {
        Ok(User {
            id: self.id,
            email: self.email,
            name: self.name,
            phone: self.phone,
            role: parse_column(&self.role)?,
            verified: self.is_verified,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub name: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub role: &'a str,
    pub is_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Profile edit; `None` clears the column.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ProfileChangeset<'a> {
    pub name: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Companies and driver profiles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = companies)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CompanyRow {
    pub id: Uuid,
    pub owner_user_id: Uuid,
    pub name: String,
    pub address: Option<String>,
    pub gst_vat_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&Company> for CompanyRow {
    fn from(company: &Company) -> Self {
        Self {
            id: company.id,
            owner_user_id: company.owner_user_id,
            name: company.name.clone(),
            address: company.address.clone(),
            gst_vat_id: company.gst_vat_id.clone(),
            created_at: company.created_at,
        }
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = driver_profiles)]
pub(crate) struct NewDriverProfileRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub license_number: &'a str,
    pub license_expiry: Option<NaiveDate>,
    pub experience_years: i32,
}

// ---------------------------------------------------------------------------
// Trucks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = trucks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TruckRow {
    pub id: Uuid,
    pub company_id: Uuid,
    pub registration_number: String,
    pub truck_type: String,
    pub capacity_tons: f64,
    pub status: String,
    pub assigned_driver_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl TruckRow {
    pub fn into_truck<E: PortFailure>(self) -> Result<Truck, E> {
        Ok(Truck {
            id: self.id,
            company_id: self.company_id,
            registration_number: self.registration_number,
            truck_type: self.truck_type,
            capacity_tons: self.capacity_tons,
            status: parse_column(&self.status)?,
            assigned_driver_id: self.assigned_driver_id,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = trucks)]
pub(crate) struct NewTruckRow<'a> {
    pub id: Uuid,
    pub company_id: Uuid,
    pub registration_number: &'a str,
    pub truck_type: &'a str,
    pub capacity_tons: f64,
    pub status: &'a str,
    pub created_at: DateTime<Utc>,
}

/// Fleet-owner edit: status only when supplied, driver always replaced.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = trucks)]
pub(crate) struct TruckChangeset<'a> {
    pub status: Option<&'a str>,
    pub assigned_driver_id: Option<Option<Uuid>>,
}

// ---------------------------------------------------------------------------
// Loads and bids
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = loads)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct LoadRow {
    pub id: Uuid,
    pub shipper_id: Uuid,
    pub title: String,
    pub goods_type: Option<String>,
    pub weight_tons: f64,
    pub pickup_location: String,
    pub delivery_location: String,
    pub pickup_window_start: Option<DateTime<Utc>>,
    pub pickup_window_end: Option<DateTime<Utc>>,
    pub status: String,
    pub assigned_truck_id: Option<Uuid>,
    pub assigned_driver_id: Option<Uuid>,
    pub price_fixed: Option<f64>,
    pub bidding_enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LoadRow {
    pub fn into_load<E: PortFailure>(self) -> Result<Load, E> {
        Ok(Load {
            id: self.id,
            shipper_id: self.shipper_id,
            title: self.title,
            goods_type: self.goods_type,
            weight_tons: self.weight_tons,
            pickup_location: self.pickup_location,
            delivery_location: self.delivery_location,
            pickup_window_start: self.pickup_window_start,
            pickup_window_end: self.pickup_window_end,
            status: parse_column(&self.status)?,
            assigned_truck_id: self.assigned_truck_id,
            assigned_driver_id: self.assigned_driver_id,
            price_fixed: self.price_fixed,
            bidding_enabled: self.bidding_enabled,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = loads)]
pub(crate) struct NewLoadRow<'a> {
    pub id: Uuid,
    pub shipper_id: Uuid,
    pub title: &'a str,
    pub goods_type: Option<&'a str>,
    pub weight_tons: f64,
    pub pickup_location: &'a str,
    pub delivery_location: &'a str,
    pub pickup_window_start: Option<DateTime<Utc>>,
    pub pickup_window_end: Option<DateTime<Utc>>,
    pub status: &'a str,
    pub price_fixed: Option<f64>,
    pub bidding_enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> From<&'a Load> for NewLoadRow<'a> {
    fn from(load: &'a Load) -> Self {
        Self {
            id: load.id,
            shipper_id: load.shipper_id,
            title: &load.title,
            goods_type: load.goods_type.as_deref(),
            weight_tons: load.weight_tons,
            pickup_location: &load.pickup_location,
            delivery_location: &load.delivery_location,
            pickup_window_start: load.pickup_window_start,
            pickup_window_end: load.pickup_window_end,
            status: load.status.as_str(),
            price_fixed: load.price_fixed,
            bidding_enabled: load.bidding_enabled,
            created_at: load.created_at,
            updated_at: load.updated_at,
        }
    }
}

/// Shipper edit; absent fields keep stored values.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = loads)]
pub(crate) struct LoadChangeset<'a> {
    pub status: Option<&'a str>,
    pub price_fixed: Option<f64>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = bids)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BidRow {
    pub id: Uuid,
    pub load_id: Uuid,
    pub bidder_id: Uuid,
    pub proposed_price: f64,
    pub message: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl BidRow {
    pub fn into_bid<E: PortFailure>(self) -> Result<Bid, E> {
        Ok(Bid {
            id: self.id,
            load_id: self.load_id,
            bidder_id: self.bidder_id,
            proposed_price: self.proposed_price,
            message: self.message,
            status: parse_column(&self.status)?,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = bids)]
pub(crate) struct NewBidRow<'a> {
    pub id: Uuid,
    pub load_id: Uuid,
    pub bidder_id: Uuid,
    pub proposed_price: f64,
    pub message: &'a str,
    pub status: &'a str,
    pub created_at: DateTime<Utc>,
}

impl<'a> From<&'a Bid> for NewBidRow<'a> {
    fn from(bid: &'a Bid) -> Self {
        Self {
            id: bid.id,
            load_id: bid.load_id,
            bidder_id: bid.bidder_id,
            proposed_price: bid.proposed_price,
            message: &bid.message,
            status: bid.status.as_str(),
            created_at: bid.created_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Trips and documents
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = trips)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct TripRow {
    pub id: Uuid,
    pub load_id: Uuid,
    pub truck_id: Uuid,
    pub driver_id: Uuid,
    pub start_time: Option<DateTime<Utc>>,
    pub pickup_time: Option<DateTime<Utc>>,
    pub delivery_time: Option<DateTime<Utc>>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl TripRow {
    pub fn into_trip<E: PortFailure>(self) -> Result<Trip, E> {
        Ok(Trip {
            id: self.id,
            load_id: self.load_id,
            truck_id: self.truck_id,
            driver_id: self.driver_id,
            start_time: self.start_time,
            pickup_time: self.pickup_time,
            delivery_time: self.delivery_time,
            status: parse_column(&self.status)?,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = trips)]
pub(crate) struct NewTripRow<'a> {
    pub id: Uuid,
    pub load_id: Uuid,
    pub truck_id: Uuid,
    pub driver_id: Uuid,
    pub start_time: Option<DateTime<Utc>>,
    pub status: &'a str,
    pub created_at: DateTime<Utc>,
}

impl<'a> From<&'a Trip> for NewTripRow<'a> {
    fn from(trip: &'a Trip) -> Self {
        Self {
            id: trip.id,
            load_id: trip.load_id,
            truck_id: trip.truck_id,
            driver_id: trip.driver_id,
            start_time: trip.start_time,
            status: trip.status.as_str(),
            created_at: trip.created_at,
        }
    }
}

/// Status move; timestamps are only written when supplied.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = trips)]
pub(crate) struct TripStatusChangeset<'a> {
    pub status: &'a str,
    pub pickup_time: Option<DateTime<Utc>>,
    pub delivery_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = documents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DocumentRow {
    pub id: Uuid,
    pub owner_type: String,
    pub owner_id: Uuid,
    pub doc_type: String,
    pub file_ref: String,
    pub is_verified: bool,
    pub expiry_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl From<&Document> for DocumentRow {
    fn from(document: &Document) -> Self {
        Self {
            id: document.id,
            owner_type: document.owner_type.clone(),
            owner_id: document.owner_id,
            doc_type: document.doc_type.clone(),
            file_ref: document.file_ref.clone(),
            is_verified: document.verified,
            expiry_date: document.expiry_date,
            created_at: document.created_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Payments
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = payments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PaymentRow {
    pub id: Uuid,
    pub load_id: Uuid,
    pub payer_id: Uuid,
    pub payee_id: Uuid,
    pub amount: f64,
    pub status: String,
    pub method: String,
    pub created_at: DateTime<Utc>,
}

impl PaymentRow {
    pub fn into_payment<E: PortFailure>(self) -> Result<Payment, E> {
        Ok(Payment {
            id: self.id,
            load_id: self.load_id,
            payer_id: self.payer_id,
            payee_id: self.payee_id,
            amount: self.amount,
            status: parse_column(&self.status)?,
            method: self.method,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = payments)]
pub(crate) struct NewPaymentRow<'a> {
    pub id: Uuid,
    pub load_id: Uuid,
    pub payer_id: Uuid,
    pub payee_id: Uuid,
    pub amount: f64,
    pub status: &'a str,
    pub method: &'a str,
    pub created_at: DateTime<Utc>,
}

impl<'a> From<&'a Payment> for NewPaymentRow<'a> {
    fn from(payment: &'a Payment) -> Self {
        Self {
            id: payment.id,
            load_id: payment.load_id,
            payer_id: payment.payer_id,
            payee_id: payment.payee_id,
            amount: payment.amount,
            status: payment.status.as_str(),
            method: &payment.method,
            created_at: payment.created_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MessageRow {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub load_id: Option<Uuid>,
    pub content: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<MessageRow> for Message {
    fn from(row: MessageRow) -> Self {
        Self {
            id: row.id,
            sender_id: row.sender_id,
            receiver_id: row.receiver_id,
            load_id: row.load_id,
            content: row.content,
            read: row.is_read,
            created_at: row.created_at,
        }
    }
}

impl From<&Message> for MessageRow {
    fn from(message: &Message) -> Self {
        Self {
            id: message.id,
            sender_id: message.sender_id,
            receiver_id: message.receiver_id,
            load_id: message.load_id,
            content: message.content.clone(),
            is_read: message.read,
            created_at: message.created_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Disputes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = disputes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DisputeRow {
    pub id: Uuid,
    pub trip_id: Option<Uuid>,
    pub load_id: Option<Uuid>,
    pub raised_by_id: Uuid,
    pub against_user_id: Option<Uuid>,
    pub reason: String,
    pub status: String,
    pub resolution: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DisputeRow {
    pub fn into_dispute<E: PortFailure>(self) -> Result<Dispute, E> {
        Ok(Dispute {
            id: self.id,
            trip_id: self.trip_id,
            load_id: self.load_id,
            raised_by_id: self.raised_by_id,
            against_user_id: self.against_user_id,
            reason: self.reason,
            status: parse_column(&self.status)?,
            resolution: self.resolution,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = disputes)]
pub(crate) struct NewDisputeRow<'a> {
    pub id: Uuid,
    pub trip_id: Option<Uuid>,
    pub load_id: Option<Uuid>,
    pub raised_by_id: Uuid,
    pub against_user_id: Option<Uuid>,
    pub reason: &'a str,
    pub status: &'a str,
    pub resolution: Option<&'a str>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> From<&'a Dispute> for NewDisputeRow<'a> {
    fn from(dispute: &'a Dispute) -> Self {
        Self {
            id: dispute.id,
            trip_id: dispute.trip_id,
            load_id: dispute.load_id,
            raised_by_id: dispute.raised_by_id,
            against_user_id: dispute.against_user_id,
            reason: &dispute.reason,
            status: dispute.status.as_str(),
            resolution: dispute.resolution.as_deref(),
            created_at: dispute.created_at,
            updated_at: dispute.updated_at,
        }
    }
}

/// Admin decision; an absent resolution keeps the stored text.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = disputes)]
pub(crate) struct DisputeChangeset<'a> {
    pub status: &'a str,
    pub resolution: Option<&'a str>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Commission rules
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = commission_rules)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CommissionRuleRow {
    pub id: Uuid,
    pub name: String,
    pub percentage: f64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<CommissionRuleRow> for CommissionRule {
    fn from(row: CommissionRuleRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            percentage: row.percentage,
            active: row.is_active,
            created_at: row.created_at,
        }
    }
}

impl From<&CommissionRule> for CommissionRuleRow {
    fn from(rule: &CommissionRule) -> Self {
        Self {
            id: rule.id,
            name: rule.name.clone(),
            percentage: rule.percentage,
            is_active: rule.active,
            created_at: rule.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::domain::ports::FleetRepositoryError;
    use crate::domain::{Role, TruckStatus};

    #[rstest]
    fn stored_vocabulary_parses() {
        let role: Role = parse_column::<_, FleetRepositoryError>("fleet_owner").expect("known role");
        assert_eq!(role, Role::FleetOwner);
    }

    #[rstest]
    fn corrupt_vocabulary_is_a_query_failure() {
        let err = parse_column::<TruckStatus, FleetRepositoryError>("parked")
            .expect_err("unknown status");
        assert!(matches!(err, FleetRepositoryError::Query { .. }));
    }
}
