//! Domain primitives, aggregates, and services.
//!
//! Purpose: define the freight marketplace vocabulary (accounts, trucks,
//! loads, trips, payments, messages, disputes) and the services that enforce
//! its rules. Nothing here knows about HTTP or SQL; adapters reach the domain
//! through the traits in [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - One `*Service` per area, each constructed from port trait objects and a
//!   clock.
//! - Value types for each area, re-exported at the module root.

pub mod admin;
pub mod auth;
pub mod disputes;
pub mod error;
pub mod fleet;
pub mod loads;
pub mod messages;
pub mod payments;
pub mod ports;
pub mod trace_id;
pub mod trips;
pub mod user;

mod admin_service;
mod demo_accounts;
mod dispute_service;
mod fleet_service;
mod identity_service;
mod load_board_service;
mod messaging_service;
mod payment_service;
mod text_enum;
mod trip_service;

#[cfg(test)]
pub(crate) mod test_fixtures;

pub use self::admin::{
    CommissionRule, CommissionView, DEFAULT_COMMISSION_NAME, DashboardStats, DriverStats,
    FleetOwnerStats, NoStats, PlatformReport, ShipperStats,
};
pub use self::admin_service::AdminService;
pub use self::auth::{
    AuthenticatedUser, CredentialsValidationError, LoginCredentials, LoginOutcome, Registration,
};
pub use self::demo_accounts::{
    DEMO_COMPANY_NAME, DEMO_PASSWORD, DemoAccountSeeder, DemoSeedOutcome, DemoSeedingError,
};
pub use self::dispute_service::DisputeService;
pub use self::disputes::{
    Dispute, DisputeDraft, DisputeFilter, DisputeResolution, DisputeStatus, DisputeWithParties,
};
pub use self::error::{Error, ErrorCode};
pub use self::fleet::{
    Company, DEFAULT_COMPANY_NAME, NewTruck, Truck, TruckDraft, TruckFilter, TruckStatus,
    TruckUpdate,
};
pub use self::fleet_service::FleetService;
pub use self::identity_service::IdentityService;
pub use self::load_board_service::LoadBoardService;
pub use self::loads::{
    Bid, BidDraft, BidStatus, Load, LoadAssignment, LoadDraft, LoadFilter, LoadStatus, LoadUpdate,
};
pub use self::messages::{CONVERSATION_LIMIT, Message, MessageDraft, UnreadCount};
pub use self::messaging_service::MessagingService;
pub use self::payment_service::PaymentService;
pub use self::payments::{
    DEFAULT_PAYMENT_METHOD, Invoice, InvoiceRecord, Payment, PaymentDraft, PaymentReceipt,
    PaymentScope, PaymentStatus, invoice_number,
};
pub use self::text_enum::UnknownVariant;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::trip_service::TripService;
pub use self::trips::{
    Document, PROOF_OF_DELIVERY, PodUpload, TRIP_DOCUMENT_OWNER, Trip, TripDetails, TripDraft,
    TripScope, TripStatus, TripTransition,
};
pub use self::user::{
    DriverProfile, NewAccount, NewCompany, ProfileUpdate, Role, StoredUser, User, UserSummary,
    normalise_email,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use fleetflow::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
