//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports backed by
//! PostgreSQL through `diesel-async` with `bb8` connection pooling.
//!
//! - Repository implementations only translate between Diesel rows and
//!   domain types; rules live in the domain services.
//! - Row structs (`models.rs`) and table definitions (`schema.rs`) never leave
//!   this module.
//! - Every Diesel and pool error is mapped onto the port error kinds in
//!   `error_mapping.rs`.
//!
//! # Example
//!
//! ```ignore
//! use fleetflow::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/fleetflow")).await?;
//! let users = DieselUserRepository::new(pool);
//! ```

mod diesel_dispute_repository;
mod diesel_fleet_repository;
mod diesel_load_repository;
mod diesel_message_repository;
mod diesel_payment_repository;
mod diesel_reporting_repository;
mod diesel_trip_repository;
mod diesel_user_repository;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_dispute_repository::DieselDisputeRepository;
pub use diesel_fleet_repository::DieselFleetRepository;
pub use diesel_load_repository::DieselLoadRepository;
pub use diesel_message_repository::DieselMessageRepository;
pub use diesel_payment_repository::DieselPaymentRepository;
pub use diesel_reporting_repository::DieselReportingRepository;
pub use diesel_trip_repository::DieselTripRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
