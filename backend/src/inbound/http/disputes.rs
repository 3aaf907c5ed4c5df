//! Dispute handlers.
//!
//! ```text
//! GET  /api/disputes?status=open
//! GET  /api/disputes/{id}
//! POST /api/disputes {"reason":"Damaged goods","trip_id":".."}
//! POST /api/disputes/{id}/resolve {"status":"resolved","resolution":"Refunded"}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Dispute, DisputeDraft, DisputeStatus, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::CurrentUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_enum, parse_optional_enum, parse_optional_uuid, parse_uuid, required_text,
};

/// Query parameters for dispute listings.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DisputeQuery {
    /// Only honoured for admins.
    pub status: Option<String>,
}

impl DisputeQuery {
    pub(crate) fn status(self) -> Result<Option<DisputeStatus>, Error> {
        parse_optional_enum(self.status, FieldName::new("status"))
    }
}

/// Body for `POST /api/disputes`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct CreateDisputeRequest {
    pub reason: Option<String>,
    pub trip_id: Option<String>,
    pub load_id: Option<String>,
    pub against_user_id: Option<String>,
}

impl TryFrom<CreateDisputeRequest> for DisputeDraft {
    type Error = Error;

    fn try_from(value: CreateDisputeRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            reason: required_text(value.reason, FieldName::new("reason"))?,
            trip_id: parse_optional_uuid(value.trip_id, FieldName::new("trip_id"))?,
            load_id: parse_optional_uuid(value.load_id, FieldName::new("load_id"))?,
            against_user_id: parse_optional_uuid(
                value.against_user_id,
                FieldName::new("against_user_id"),
            )?,
        })
    }
}

/// Body for `POST /api/disputes/{id}/resolve`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct ResolveDisputeRequest {
    #[schema(example = "resolved")]
    pub status: Option<String>,
    /// Keeps the stored text when absent.
    pub resolution: Option<String>,
}

fn dispute_id(path: web::Path<String>) -> Result<uuid::Uuid, Error> {
    parse_uuid(path.into_inner(), FieldName::new("id"))
}

/// Disputes raised by the caller, or every dispute for admins.
#[utoipa::path(
    get,
    path = "/api/disputes",
    params(DisputeQuery),
    responses(
        (status = 200, description = "Disputes, newest first", body = [Dispute]),
        (status = 400, description = "Unknown status", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["disputes"],
    operation_id = "listDisputes"
)]
#[get("/disputes")]
pub async fn list_disputes(
    state: web::Data<HttpState>,
    user: CurrentUser,
    query: web::Query<DisputeQuery>,
) -> ApiResult<web::Json<Vec<Dispute>>> {
    let status = query.into_inner().status()?;
    Ok(web::Json(state.disputes.list_disputes(&user, status).await?))
}

/// Fetch a dispute the caller raised, or any dispute for admins.
#[utoipa::path(
    get,
    path = "/api/disputes/{id}",
    params(("id" = String, Path, description = "Dispute id")),
    responses(
        (status = 200, description = "Dispute", body = Dispute),
        (status = 403, description = "Access denied", body = Error),
        (status = 404, description = "Dispute not found", body = Error)
    ),
    tags = ["disputes"],
    operation_id = "getDispute"
)]
#[get("/disputes/{id}")]
pub async fn get_dispute(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<Dispute>> {
    let id = dispute_id(path)?;
    Ok(web::Json(state.disputes.get_dispute(&user, id).await?))
}

/// Raise a dispute.
#[utoipa::path(
    post,
    path = "/api/disputes",
    request_body = CreateDisputeRequest,
    responses(
        (status = 201, description = "Dispute raised", body = Dispute),
        (status = 400, description = "Reason missing", body = Error),
        (status = 404, description = "Referenced record not found", body = Error)
    ),
    tags = ["disputes"],
    operation_id = "createDispute"
)]
#[post("/disputes")]
pub async fn create_dispute(
    state: web::Data<HttpState>,
    user: CurrentUser,
    payload: web::Json<CreateDisputeRequest>,
) -> ApiResult<HttpResponse> {
    let draft = DisputeDraft::try_from(payload.into_inner())?;
    let dispute = state.disputes.create_dispute(&user, draft).await?;
    Ok(HttpResponse::Created().json(dispute))
}

/// Set a dispute's status. Any status may follow any other.
#[utoipa::path(
    post,
    path = "/api/disputes/{id}/resolve",
    params(("id" = String, Path, description = "Dispute id")),
    request_body = ResolveDisputeRequest,
    responses(
        (status = 200, description = "Dispute updated", body = Dispute),
        (status = 400, description = "Missing or unknown status", body = Error),
        (status = 403, description = "Caller is not an admin", body = Error),
        (status = 404, description = "Dispute not found", body = Error)
    ),
    tags = ["disputes"],
    operation_id = "resolveDispute"
)]
#[post("/disputes/{id}/resolve")]
pub async fn resolve_dispute(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<String>,
    payload: web::Json<ResolveDisputeRequest>,
) -> ApiResult<web::Json<Dispute>> {
    let id = dispute_id(path)?;
    let ResolveDisputeRequest { status, resolution } = payload.into_inner();
    let raw = required_text(status, FieldName::new("status"))?;
    let status = parse_enum::<DisputeStatus>(&raw, FieldName::new("status"))?;
    Ok(web::Json(
        state
            .disputes
            .resolve_dispute(&user, id, status, resolution)
            .await?,
    ))
}
