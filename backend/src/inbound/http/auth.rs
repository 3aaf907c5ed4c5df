//! Bearer token authentication for HTTP handlers.
//!
//! [`CurrentUser`] is an extractor: listing it in a handler signature makes
//! the route require `Authorization: Bearer <token>`. Role checks stay in the
//! domain services.

use std::ops::Deref;

use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::{Ready, ready};
use tracing::debug;

use crate::domain::{AuthenticatedUser, Error};

use super::state::HttpState;

const BEARER_PREFIX: &str = "Bearer ";

/// Identity of the caller, verified from the bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser(AuthenticatedUser);

impl CurrentUser {
    /// Borrow the verified identity.
    pub fn identity(&self) -> &AuthenticatedUser {
        &self.0
    }
}

impl Deref for CurrentUser {
    type Target = AuthenticatedUser;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

fn bearer_token(req: &HttpRequest) -> Result<&str, Error> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("Authentication required"))?;
    let value = header
        .to_str()
        .map_err(|_| Error::unauthorized("Malformed authorization header"))?;
    value
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| Error::unauthorized("Authorization header must use the Bearer scheme"))
}

fn authenticate(req: &HttpRequest) -> Result<CurrentUser, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("HTTP state is not configured"))?;
    let token = bearer_token(req)?;
    state
        .identity
        .authenticate(token)
        .map(CurrentUser)
        .inspect_err(|err| debug!(path = req.path(), reason = err.message(), "bearer rejected"))
}

impl FromRequest for CurrentUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}
