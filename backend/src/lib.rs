//! FleetFlow freight marketplace backend.
//!
//! Layout follows ports and adapters: [`domain`] holds the services and the
//! port traits, [`outbound`] implements the ports (PostgreSQL, memory,
//! credentials), and [`inbound`] exposes them over HTTP.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
