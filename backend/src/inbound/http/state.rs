//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain services, which in turn only see port trait objects.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    DisputeRepository, FleetRepository, LoadRepository, MessageRepository,
    PasswordHasher, PaymentRepository, ReportingRepository, TokenService, TripRepository,
    UserRepository,
};
use crate::domain::{
    AdminService, DisputeService, FleetService, IdentityService, LoadBoardService,
    MessagingService, PaymentService, TripService,
};

/// Parameter object bundling every port implementation the services need.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub users: Arc<dyn UserRepository>,
    pub fleet: Arc<dyn FleetRepository>,
    pub loads: Arc<dyn LoadRepository>,
    pub trips: Arc<dyn TripRepository>,
    pub payments: Arc<dyn PaymentRepository>,
    pub messages: Arc<dyn MessageRepository>,
    pub disputes: Arc<dyn DisputeRepository>,
    pub reporting: Arc<dyn ReportingRepository>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub tokens: Arc<dyn TokenService>,
    pub clock: Arc<dyn Clock>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub identity: Arc<IdentityService>,
    pub fleet: Arc<FleetService>,
    pub loads: Arc<LoadBoardService>,
    pub trips: Arc<TripService>,
    pub payments: Arc<PaymentService>,
    pub messaging: Arc<MessagingService>,
    pub disputes: Arc<DisputeService>,
    pub admin: Arc<AdminService>,
}

impl HttpState {
    /// Wire every domain service from its ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use fleetflow::inbound::http::state::{HttpState, HttpStatePorts};
    /// use fleetflow::outbound::memory::MemoryStore;
    /// use fleetflow::outbound::security::{Argon2PasswordHasher, JwtTokenService};
    /// use mockable::DefaultClock;
    ///
    /// let store = MemoryStore::new();
    /// let clock = Arc::new(DefaultClock);
    /// let tokens = JwtTokenService::new(b"secret", chrono::Duration::hours(24), clock.clone());
    /// let state = HttpState::new(HttpStatePorts {
    ///     users: Arc::new(store.clone()),
    ///     fleet: Arc::new(store.clone()),
    ///     loads: Arc::new(store.clone()),
    ///     trips: Arc::new(store.clone()),
    ///     payments: Arc::new(store.clone()),
    ///     messages: Arc::new(store.clone()),
    ///     disputes: Arc::new(store.clone()),
    ///     reporting: Arc::new(store),
    ///     hasher: Arc::new(Argon2PasswordHasher),
    ///     tokens: Arc::new(tokens),
    ///     clock,
    /// });
    /// let _identity = state.identity.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            users,
            fleet,
            loads,
            trips,
            payments,
            messages,
            disputes,
            reporting,
            hasher,
            tokens,
            clock,
        } = ports;
        Self {
            identity: Arc::new(IdentityService::new(
                users.clone(),
                hasher,
                tokens,
                clock.clone(),
            )),
            fleet: Arc::new(FleetService::new(fleet, clock.clone())),
            loads: Arc::new(LoadBoardService::new(loads, clock.clone())),
            trips: Arc::new(TripService::new(trips, clock.clone())),
            payments: Arc::new(PaymentService::new(payments, clock.clone())),
            messaging: Arc::new(MessagingService::new(messages, clock.clone())),
            disputes: Arc::new(DisputeService::new(disputes.clone(), clock.clone())),
            admin: Arc::new(AdminService::new(users, reporting, disputes, clock)),
        }
    }
}
