//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] aggregates every `/api` handler annotated with
//! `#[utoipa::path]`, the health probes, and a bearer token security scheme.
//! Swagger UI serves it at `/docs` in debug builds; `openapi-dump` writes it
//! to stdout for external tooling.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    Bid, CommissionRule, CommissionView, DashboardStats, Dispute, DisputeWithParties, Document,
    Error, ErrorCode, Invoice, Load, LoginOutcome, Message, Payment, PaymentReceipt,
    PlatformReport, Trip, TripDetails, Truck, UnreadCount, User,
};
use crate::inbound::http::{
    admin, disputes, health, identity, loads, messages, payments, trips, trucks,
};

/// Name of the bearer security scheme in the generated document.
pub const BEARER_SCHEME: &str = "BearerToken";

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Token issued by POST /api/auth/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "FleetFlow API",
        description = "Freight marketplace: fleets, loads, bids, trips, payments, messaging, disputes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        identity::login,
        identity::register,
        identity::current_user,
        identity::update_current_user,
        trucks::list_trucks,
        trucks::get_truck,
        trucks::create_truck,
        trucks::update_truck,
        trucks::assign_driver,
        loads::list_loads,
        loads::get_load,
        loads::create_load,
        loads::update_load,
        loads::place_bid,
        loads::list_bids,
        loads::assign_load,
        trips::list_trips,
        trips::get_trip,
        trips::trip_details,
        trips::create_trip,
        trips::update_trip_status,
        trips::upload_pod,
        payments::list_payments,
        payments::get_payment,
        payments::get_invoice,
        payments::create_payment,
        payments::charge_payment,
        payments::confirm_payment,
        messages::list_messages,
        messages::conversation,
        messages::send_message,
        messages::mark_read,
        messages::unread_count,
        disputes::list_disputes,
        disputes::get_dispute,
        disputes::create_dispute,
        disputes::resolve_dispute,
        admin::list_users,
        admin::reports,
        admin::disputes,
        admin::commission,
        admin::set_commission,
        admin::verify_document,
        admin::suspend_user,
        admin::dashboard_stats,
        health::ready,
        health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        User,
        LoginOutcome,
        Truck,
        Load,
        Bid,
        Trip,
        TripDetails,
        Document,
        Payment,
        PaymentReceipt,
        Invoice,
        Message,
        UnreadCount,
        Dispute,
        DisputeWithParties,
        PlatformReport,
        CommissionRule,
        CommissionView,
        DashboardStats,
    )),
    tags(
        (name = "auth", description = "Login, registration and profile"),
        (name = "trucks", description = "Fleet registry"),
        (name = "loads", description = "Load board and bidding"),
        (name = "trips", description = "Trip tracking and proof of delivery"),
        (name = "payments", description = "Payments and invoices"),
        (name = "messages", description = "Direct messaging"),
        (name = "disputes", description = "Dispute handling"),
        (name = "admin", description = "Admin console and dashboards"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
