//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Repository ports are implemented by the Diesel adapters in
//! `outbound::persistence` and by the in-memory store in `outbound::memory`.
//! Credential ports are implemented in `outbound::security`.

mod dispute_repository;
mod fleet_repository;
mod load_repository;
mod macros;
mod message_repository;
mod password_hasher;
mod payment_repository;
mod reporting_repository;
mod token_service;
mod trip_repository;
mod user_repository;

pub(crate) use macros::define_port_error;
pub use macros::PortFailure;

#[cfg(test)]
pub use dispute_repository::MockDisputeRepository;
pub use dispute_repository::{DisputeRepository, DisputeRepositoryError};
#[cfg(test)]
pub use fleet_repository::MockFleetRepository;
pub use fleet_repository::{FleetRepository, FleetRepositoryError};
#[cfg(test)]
pub use load_repository::MockLoadRepository;
pub use load_repository::{LoadRepository, LoadRepositoryError};
#[cfg(test)]
pub use message_repository::MockMessageRepository;
pub use message_repository::{MessageRepository, MessageRepositoryError};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use payment_repository::MockPaymentRepository;
pub use payment_repository::{PaymentRepository, PaymentRepositoryError};
#[cfg(test)]
pub use reporting_repository::MockReportingRepository;
pub use reporting_repository::{ReportingRepository, ReportingRepositoryError};
#[cfg(test)]
pub use token_service::MockTokenService;
pub use token_service::{TokenError, TokenService};
#[cfg(test)]
pub use trip_repository::MockTripRepository;
pub use trip_repository::{TripRepository, TripRepositoryError};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserRepository, UserRepositoryError};
