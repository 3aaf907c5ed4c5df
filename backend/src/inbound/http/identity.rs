//! Account handlers.
//!
//! ```text
//! POST /api/auth/login {"email":"driver@test.com","password":"pass123"}
//! POST /api/auth/register
//! GET  /api/auth/me
//! PUT  /api/auth/me
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{
    CredentialsValidationError, Error, LoginCredentials, LoginOutcome, ProfileUpdate,
    Registration, Role, User, UserSummary,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::CurrentUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_enum, required_text};

/// Login request body for `POST /api/auth/login`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Account creation body for `POST /api/auth/register`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    #[schema(example = "driver")]
    pub role: Option<String>,
    pub name: Option<String>,
    pub phone: Option<String>,
    /// Creates a company when registering a fleet owner.
    pub company_name: Option<String>,
    /// Creates a driver profile when registering a driver.
    pub license_number: Option<String>,
}

/// Body for `PUT /api/auth/me`; absent values clear the column.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct ProfileRequest {
    pub name: Option<String>,
    pub phone: Option<String>,
}

/// Response for `POST /api/auth/register`.
#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub message: String,
    pub user: UserSummary,
}

fn map_credentials_error(err: CredentialsValidationError) -> Error {
    match err {
        CredentialsValidationError::EmptyEmail => {
            Error::invalid_request("Email and password required")
                .with_details(json!({ "field": "email", "code": "missing_field" }))
        }
        CredentialsValidationError::EmptyPassword => {
            Error::invalid_request("Email and password required")
                .with_details(json!({ "field": "password", "code": "missing_field" }))
        }
    }
}

fn credentials(email: Option<String>, password: Option<String>) -> Result<LoginCredentials, Error> {
    LoginCredentials::try_from_parts(
        email.as_deref().unwrap_or_default(),
        password.as_deref().unwrap_or_default(),
    )
    .map_err(map_credentials_error)
}

impl TryFrom<RegisterRequest> for Registration {
    type Error = Error;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        let credentials = credentials(value.email, value.password)?;
        let role = required_text(value.role, FieldName::new("role"))?;
        Ok(Self {
            credentials,
            role: parse_enum::<Role>(&role, FieldName::new("role"))?,
            name: value.name,
            phone: value.phone,
            company_name: value.company_name,
            license_number: value.license_number,
        })
    }
}

/// Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = LoginOutcome),
        (status = 400, description = "Missing email or password", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 403, description = "Account suspended", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginOutcome>> {
    let LoginRequest { email, password } = payload.into_inner();
    let outcome = state.identity.login(credentials(email, password)?).await?;
    Ok(web::Json(outcome))
}

/// Create an account on behalf of an admin or fleet owner.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = RegisterResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Role may not register this account", body = Error),
        (status = 409, description = "Email already registered", body = Error)
    ),
    tags = ["auth"],
    operation_id = "register"
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    user: CurrentUser,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration = Registration::try_from(payload.into_inner())?;
    let created = state.identity.register(&user, registration).await?;
    Ok(HttpResponse::Created().json(RegisterResponse {
        message: "User registered successfully".to_owned(),
        user: created.summary(),
    }))
}

/// Profile of the caller.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Caller profile", body = User),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Account no longer exists", body = Error)
    ),
    tags = ["auth"],
    operation_id = "currentUser"
)]
#[get("/auth/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    user: CurrentUser,
) -> ApiResult<web::Json<User>> {
    Ok(web::Json(state.identity.profile(&user).await?))
}

/// Replace the caller's name and phone.
#[utoipa::path(
    put,
    path = "/api/auth/me",
    request_body = ProfileRequest,
    responses(
        (status = 200, description = "Profile updated"),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["auth"],
    operation_id = "updateCurrentUser"
)]
#[put("/auth/me")]
pub async fn update_current_user(
    state: web::Data<HttpState>,
    user: CurrentUser,
    payload: web::Json<ProfileRequest>,
) -> ApiResult<HttpResponse> {
    let ProfileRequest { name, phone } = payload.into_inner();
    state
        .identity
        .update_profile(&user, ProfileUpdate { name, phone })
        .await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true })))
}
