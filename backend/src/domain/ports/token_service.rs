//! Port for issuing and verifying bearer tokens.

use crate::domain::AuthenticatedUser;

/// Errors raised by token adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// The token is malformed, has a bad signature, or carries bad claims.
    #[error("invalid token: {message}")]
    Invalid { message: String },
    /// The token validity window has passed.
    #[error("token expired")]
    Expired,
    /// A token could not be signed.
    #[error("token signing failed: {message}")]
    Signing { message: String },
}

impl TokenError {
    /// Create an invalid-token failure.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Create a signing failure.
    pub fn signing(message: impl Into<String>) -> Self {
        Self::Signing {
            message: message.into(),
        }
    }
}

/// Issue and verify signed tokens carrying the caller identity.
#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    /// Sign a token for `user`.
    fn issue(&self, user: &AuthenticatedUser) -> Result<String, TokenError>;

    /// Verify a token and recover the identity it carries.
    fn verify(&self, token: &str) -> Result<AuthenticatedUser, TokenError>;
}
