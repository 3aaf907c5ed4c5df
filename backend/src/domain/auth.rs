//! Authentication primitives: login credentials, registration input, and the
//! caller identity resolved from a bearer token.
//!
//! Inbound adapters build these from raw payloads so services only see
//! validated values.

use std::fmt;

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;
use zeroize::Zeroizing;

use super::{Error, Role, UserSummary};

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsValidationError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for CredentialsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for CredentialsValidationError {}

/// Validated email/password pair.
///
/// ## Invariants
/// - `email` is trimmed, lower-cased and non-empty.
/// - `password` is non-empty and keeps caller whitespace; it is zeroed on drop.
///
/// # Examples
/// ```
/// use fleetflow::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" Shipper@Test.com ", "pass123").unwrap();
/// assert_eq!(creds.email(), "shipper@test.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        let email = super::normalise_email(email);
        if email.is_empty() {
            return Err(CredentialsValidationError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised email used for lookups.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password supplied by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Input for creating an account on behalf of an admin or fleet owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub credentials: LoginCredentials,
    pub role: Role,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub company_name: Option<String>,
    pub license_number: Option<String>,
}

/// Caller identity carried by a verified bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
}

impl AuthenticatedUser {
    /// Fail with `403` unless the caller holds one of `allowed`.
    ///
    /// # Examples
    /// ```
    /// use fleetflow::domain::{AuthenticatedUser, Role};
    /// use uuid::Uuid;
    ///
    /// let caller = AuthenticatedUser { id: Uuid::nil(), email: "d@x.io".into(), role: Role::Driver };
    /// assert!(caller.require_role(&[Role::Driver, Role::FleetOwner]).is_ok());
    /// assert!(caller.require_role(&[Role::Shipper]).is_err());
    /// ```
    pub fn require_role(&self, allowed: &[Role]) -> Result<(), Error> {
        if allowed.contains(&self.role) {
            return Ok(());
        }
        let allowed_text: Vec<&str> = allowed.iter().map(|role| role.as_str()).collect();
        Err(Error::forbidden(format!(
            "Role '{}' is not permitted to perform this action",
            self.role
        ))
        .with_details(serde_json::json!({
            "role": self.role.as_str(),
            "allowed": allowed_text,
        })))
    }

    /// Whether the caller is a platform admin.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Successful login: a signed token plus the account summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct LoginOutcome {
    pub token: String,
    pub user: UserSummary,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::domain::ErrorCode;

    #[rstest]
    #[case("", "pw", CredentialsValidationError::EmptyEmail)]
    #[case("   ", "pw", CredentialsValidationError::EmptyEmail)]
    #[case("user@test.com", "", CredentialsValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: CredentialsValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(email, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn password_whitespace_is_preserved() {
        let creds = LoginCredentials::try_from_parts("a@b.io", " spaced ").expect("valid");
        assert_eq!(creds.password(), " spaced ");
    }

    #[rstest]
    #[case(Role::Shipper, &[Role::Shipper, Role::Admin], true)]
    #[case(Role::Admin, &[Role::Shipper, Role::Admin], true)]
    #[case(Role::Driver, &[Role::Shipper, Role::Admin], false)]
    #[case(Role::FleetOwner, &[Role::Driver], false)]
    fn role_gate(#[case] role: Role, #[case] allowed: &[Role], #[case] permitted: bool) {
        let caller = AuthenticatedUser {
            id: Uuid::new_v4(),
            email: "caller@test.com".to_owned(),
            role,
        };
        let result = caller.require_role(allowed);
        assert_eq!(result.is_ok(), permitted);
        if let Err(err) = result {
            assert_eq!(err.code(), ErrorCode::Forbidden);
            assert!(err.message().contains(role.as_str()));
        }
    }
}
