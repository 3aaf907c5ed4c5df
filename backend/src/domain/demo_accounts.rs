//! Demo account seeding for local development.
//!
//! Creates one verified account per role, all sharing [`DEMO_PASSWORD`].
//! Accounts that already exist are left untouched, so reruns are safe.

use std::sync::Arc;

use mockable::Clock;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::domain::ports::{PasswordHashError, PasswordHasher, UserRepository, UserRepositoryError};
use crate::domain::{NewAccount, NewCompany, Role, User};

/// Password shared by every demo account.
pub const DEMO_PASSWORD: &str = "pass123";

/// Company created for the demo fleet owner.
pub const DEMO_COMPANY_NAME: &str = "Demo Fleet Company";

const DEMO_ACCOUNTS: [(&str, Role, &str); 4] = [
    ("driver@test.com", Role::Driver, "Demo Driver"),
    ("shipper@test.com", Role::Shipper, "Demo Shipper"),
    ("owner@test.com", Role::FleetOwner, "Demo Fleet Owner"),
    ("admin@test.com", Role::Admin, "Demo Admin"),
];

/// Errors raised while seeding demo accounts.
#[derive(Debug, Error)]
pub enum DemoSeedingError {
    /// The user repository failed.
    #[error("demo seeding repository error: {0}")]
    Repository(#[from] UserRepositoryError),
    /// The demo password could not be hashed.
    #[error("demo seeding hash error: {0}")]
    Hash(#[from] PasswordHashError),
}

/// Counts reported after a seeding run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DemoSeedOutcome {
    pub created: usize,
    pub skipped: usize,
}

/// Seeds the fixed set of demo accounts.
pub struct DemoAccountSeeder {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    clock: Arc<dyn Clock>,
}

impl DemoAccountSeeder {
    /// Create a seeder from its ports.
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            hasher,
            clock,
        }
    }

    /// Create any demo account that does not exist yet.
    pub async fn seed(&self) -> Result<DemoSeedOutcome, DemoSeedingError> {
        let mut outcome = DemoSeedOutcome::default();
        let password_hash = self.hasher.hash(DEMO_PASSWORD)?;
        for (email, role, name) in DEMO_ACCOUNTS {
            if self.users.find_by_email(email).await?.is_some() {
                outcome.skipped += 1;
                continue;
            }
            let now = self.clock.utc();
            let account = NewAccount {
                user: User {
                    id: Uuid::new_v4(),
                    email: email.to_owned(),
                    name: Some(name.to_owned()),
                    phone: None,
                    role,
                    verified: true,
                    created_at: now,
                    updated_at: now,
                },
                password_hash: password_hash.clone(),
                company: (role == Role::FleetOwner).then(|| NewCompany {
                    id: Uuid::new_v4(),
                    name: DEMO_COMPANY_NAME.to_owned(),
                }),
                driver_profile: None,
            };
            match self.users.create_account(&account).await {
                Ok(()) => outcome.created += 1,
                // Another process seeded the same account first.
                Err(UserRepositoryError::Conflict { .. }) => outcome.skipped += 1,
                Err(err) => return Err(err.into()),
            }
        }
        info!(
            created = outcome.created,
            skipped = outcome.skipped,
            "demo accounts seeded"
        );
        Ok(outcome)
    }
}
