//! Account registration, login, and profile management.
//!
//! Password hashing runs on the blocking pool so slow key derivation never
//! stalls the async workers.

use std::sync::Arc;

use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::domain::ports::{
    PasswordHashError, PasswordHasher, TokenError, TokenService, UserRepository,
    UserRepositoryError,
};
use crate::domain::{
    AuthenticatedUser, DriverProfile, Error, LoginCredentials, LoginOutcome, NewAccount,
    NewCompany, ProfileUpdate, Registration, Role, User,
};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

fn map_user_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserRepositoryError::Conflict { .. } => Error::conflict("Email already registered"),
        UserRepositoryError::MissingReference { message } => Error::not_found(message),
    }
}

/// Map token failures onto HTTP-facing errors.
pub(crate) fn map_token_error(error: TokenError) -> Error {
    match error {
        TokenError::Invalid { .. } => Error::unauthorized("Invalid token"),
        TokenError::Expired => Error::unauthorized("Token expired"),
        TokenError::Signing { message } => {
            Error::internal(format!("token signing failed: {message}"))
        }
    }
}

fn blocking_task_failed(err: tokio::task::JoinError) -> Error {
    Error::internal(format!("password task failed: {err}"))
}

/// Identity and access service.
#[derive(Clone)]
pub struct IdentityService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
    clock: Arc<dyn Clock>,
}

impl IdentityService {
    /// Create the service from its ports.
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
            clock,
        }
    }

    async fn hash_password(&self, password: &str) -> Result<String, Error> {
        let hasher = Arc::clone(&self.hasher);
        let password = Zeroizing::new(password.to_owned());
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(blocking_task_failed)?
            .map_err(|err| Error::internal(err.to_string()))
    }

    async fn verify_password(&self, password: &str, stored_hash: String) -> Result<bool, Error> {
        let hasher = Arc::clone(&self.hasher);
        let password = Zeroizing::new(password.to_owned());
        let outcome = tokio::task::spawn_blocking(move || hasher.verify(&password, &stored_hash))
            .await
            .map_err(blocking_task_failed)?;
        match outcome {
            Ok(matches) => Ok(matches),
            Err(PasswordHashError::MalformedHash { message }) => {
                warn!(%message, "stored password hash is unreadable");
                Ok(false)
            }
            Err(err @ PasswordHashError::Hash { .. }) => Err(Error::internal(err.to_string())),
        }
    }

    /// Create an account on behalf of an admin or fleet owner.
    ///
    /// Fleet owners may only create drivers. The new account starts
    /// verified; a fleet owner gets a company when a name is supplied and a
    /// driver gets a profile when a licence number is supplied.
    pub async fn register(
        &self,
        caller: &AuthenticatedUser,
        registration: Registration,
    ) -> Result<User, Error> {
        caller.require_role(&[Role::Admin, Role::FleetOwner])?;
        if !caller.role.may_register(registration.role) {
            return Err(
                Error::forbidden("Fleet owners can only register drivers").with_details(json!({
                    "role": registration.role.as_str(),
                })),
            );
        }

        let password_hash = self
            .hash_password(registration.credentials.password())
            .await?;
        let now = self.clock.utc();
        let user = User {
            id: Uuid::new_v4(),
            email: registration.credentials.email().to_owned(),
            name: registration.name,
            phone: registration.phone,
            role: registration.role,
            verified: true,
            created_at: now,
            updated_at: now,
        };
        let company = registration
            .company_name
            .filter(|_| user.role == Role::FleetOwner)
            .map(|name| NewCompany {
                id: Uuid::new_v4(),
                name,
            });
        let driver_profile = registration
            .license_number
            .filter(|_| user.role == Role::Driver)
            .map(|license_number| DriverProfile {
                id: Uuid::new_v4(),
                user_id: user.id,
                license_number,
                license_expiry: None,
                experience_years: 0,
            });

        let account = NewAccount {
            user,
            password_hash,
            company,
            driver_profile,
        };
        self.users
            .create_account(&account)
            .await
            .map_err(map_user_error)?;

        info!(
            user_id = %account.user.id,
            role = %account.user.role,
            registered_by = %caller.id,
            "account registered"
        );
        Ok(account.user)
    }

    /// Exchange credentials for a signed token.
    ///
    /// Unknown emails and wrong passwords share one message; suspended
    /// accounts are refused after the password checks out.
    pub async fn login(&self, credentials: LoginCredentials) -> Result<LoginOutcome, Error> {
        let Some(stored) = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(map_user_error)?
        else {
            warn!("login rejected: unknown email");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        let matches = self
            .verify_password(credentials.password(), stored.password_hash)
            .await?;
        if !matches {
            warn!(user_id = %stored.user.id, "login rejected: wrong password");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        if !stored.user.verified {
            warn!(user_id = %stored.user.id, "login rejected: account suspended");
            return Err(Error::forbidden("Account suspended"));
        }

        let identity = AuthenticatedUser {
            id: stored.user.id,
            email: stored.user.email.clone(),
            role: stored.user.role,
        };
        let token = self.tokens.issue(&identity).map_err(map_token_error)?;
        Ok(LoginOutcome {
            token,
            user: stored.user.summary(),
        })
    }

    /// Resolve a bearer token to the identity it carries.
    pub fn authenticate(&self, token: &str) -> Result<AuthenticatedUser, Error> {
        self.tokens.verify(token).map_err(map_token_error)
    }

    /// The caller's own profile.
    pub async fn profile(&self, caller: &AuthenticatedUser) -> Result<User, Error> {
        self.users
            .find_by_id(&caller.id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found("User not found"))
    }

    /// Replace the caller's name and phone.
    pub async fn update_profile(
        &self,
        caller: &AuthenticatedUser,
        update: ProfileUpdate,
    ) -> Result<(), Error> {
        let updated = self
            .users
            .update_profile(&caller.id, &update, self.clock.utc())
            .await
            .map_err(map_user_error)?;
        if updated {
            Ok(())
        } else {
            Err(Error::not_found("User not found"))
        }
    }
}

#[cfg(test)]
#[path = "identity_service_tests.rs"]
mod tests;
