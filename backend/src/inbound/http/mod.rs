//! HTTP inbound adapter exposing REST endpoints.

pub mod admin;
pub mod auth;
pub mod disputes;
pub mod error;
pub mod health;
pub mod identity;
pub mod loads;
pub mod messages;
pub mod payments;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod trips;
pub mod trucks;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register every `/api` handler plus the JSON and query error handlers.
///
/// Mount under a `/api` scope:
///
/// ```
/// use actix_web::{App, web};
/// use fleetflow::inbound::http::configure_api;
///
/// let _app = App::new().service(web::scope("/api").configure(configure_api));
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .service(identity::login)
        .service(identity::register)
        .service(identity::current_user)
        .service(identity::update_current_user)
        .service(trucks::list_trucks)
        .service(trucks::get_truck)
        .service(trucks::create_truck)
        .service(trucks::update_truck)
        .service(trucks::assign_driver)
        .service(loads::list_loads)
        .service(loads::get_load)
        .service(loads::create_load)
        .service(loads::update_load)
        .service(loads::place_bid)
        .service(loads::list_bids)
        .service(loads::assign_load)
        .service(trips::list_trips)
        .service(trips::get_trip)
        .service(trips::trip_details)
        .service(trips::create_trip)
        .service(trips::update_trip_status)
        .service(trips::upload_pod)
        .service(payments::list_payments)
        .service(payments::charge_payment)
        .service(payments::create_payment)
        .service(payments::get_payment)
        .service(payments::get_invoice)
        .service(payments::confirm_payment)
        .service(messages::list_messages)
        .service(messages::unread_count)
        .service(messages::conversation)
        .service(messages::send_message)
        .service(messages::mark_read)
        .service(disputes::list_disputes)
        .service(disputes::get_dispute)
        .service(disputes::create_dispute)
        .service(disputes::resolve_dispute)
        .service(admin::list_users)
        .service(admin::reports)
        .service(admin::disputes)
        .service(admin::commission)
        .service(admin::set_commission)
        .service(admin::verify_document)
        .service(admin::suspend_user)
        .service(admin::dashboard_stats);
}
