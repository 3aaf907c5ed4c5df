//! Test helpers for inbound HTTP components.
//!
//! [`TestBackend`] wires the real services over a fresh in-memory store and
//! mints bearer tokens directly, so handler tests skip password hashing.

use std::sync::Arc;

use actix_web::web;
use chrono::Duration;
use mockable::{Clock, DefaultClock};
use uuid::Uuid;

use crate::domain::ports::{TokenService as _, UserRepository as _};
use crate::domain::{AuthenticatedUser, NewAccount, NewCompany, Role, Truck, TruckDraft, User};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::MemoryStore;
use crate::outbound::security::{Argon2PasswordHasher, JwtTokenService};

const TEST_SECRET: &[u8] = b"handler-test-secret";

/// In-memory backend plus token minting for handler tests.
pub struct TestBackend {
    store: MemoryStore,
    tokens: Arc<JwtTokenService>,
    clock: Arc<dyn Clock>,
    state: HttpState,
}

impl TestBackend {
    pub fn new() -> Self {
        let store = MemoryStore::new();
        let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
        let tokens = Arc::new(JwtTokenService::new(
            TEST_SECRET,
            Duration::hours(24),
            clock.clone(),
        ));
        let state = HttpState::new(HttpStatePorts {
            users: Arc::new(store.clone()),
            fleet: Arc::new(store.clone()),
            loads: Arc::new(store.clone()),
            trips: Arc::new(store.clone()),
            payments: Arc::new(store.clone()),
            messages: Arc::new(store.clone()),
            disputes: Arc::new(store.clone()),
            reporting: Arc::new(store.clone()),
            hasher: Arc::new(Argon2PasswordHasher),
            tokens: tokens.clone(),
            clock: clock.clone(),
        });
        Self {
            store,
            tokens,
            clock,
            state,
        }
    }

    pub fn data(&self) -> web::Data<HttpState> {
        web::Data::new(self.state.clone())
    }

    pub fn state(&self) -> &HttpState {
        &self.state
    }

    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    /// Insert a verified account with the given role.
    pub async fn user(&self, role: Role) -> User {
        let now = self.clock.utc();
        let id = Uuid::new_v4();
        let user = User {
            id,
            email: format!("{role}-{id}@test.com"),
            name: Some(format!("Test {role}")),
            phone: None,
            role,
            verified: true,
            created_at: now,
            updated_at: now,
        };
        let account = NewAccount {
            user: user.clone(),
            password_hash: "$argon2id$unused".to_owned(),
            company: (role == Role::FleetOwner).then(|| NewCompany {
                id: Uuid::new_v4(),
                name: "Test Haulage".to_owned(),
            }),
            driver_profile: None,
        };
        self.store
            .create_account(&account)
            .await
            .expect("test account stored");
        user
    }

    /// Bearer token for an existing user.
    pub fn token(&self, user: &User) -> String {
        self.tokens
            .issue(&caller(user))
            .expect("token issued")
    }

    /// Register a truck owned by `owner` through the fleet service.
    pub async fn truck(&self, owner: &User, registration: &str) -> Truck {
        self.state
            .fleet
            .create_truck(
                &caller(owner),
                TruckDraft {
                    registration_number: registration.to_owned(),
                    truck_type: "container".to_owned(),
                    capacity_tons: 18.0,
                },
            )
            .await
            .expect("truck registered")
    }

    /// Insert a user with `role` and return its bearer token.
    pub async fn token_for(&self, role: Role) -> String {
        let user = self.user(role).await;
        self.token(&user)
    }
}

/// Verified identity matching a stored user.
pub fn caller(user: &User) -> AuthenticatedUser {
    AuthenticatedUser {
        id: user.id,
        email: user.email.clone(),
        role: user.role,
    }
}

/// `Authorization` header value for `token`.
pub fn bearer(token: &str) -> (actix_web::http::header::HeaderName, String) {
    (
        actix_web::http::header::AUTHORIZATION,
        format!("Bearer {token}"),
    )
}
