//! Trip tracker handlers.
//!
//! ```text
//! GET   /api/trips
//! GET   /api/trips/{id}
//! GET   /api/trips/{id}/details
//! POST  /api/trips {"load_id":"..","truck_id":"..","driver_id":".."}
//! PATCH /api/trips/{id}/status {"status":"picked_up"}
//! POST  /api/trips/{id}/pod {"file_ref":"s3://pod/123.jpg"}
//! ```

use actix_web::{HttpResponse, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Document, Error, PodUpload, Trip, TripDetails, TripDraft, TripStatus};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::CurrentUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_enum, parse_required_uuid, parse_uuid, required_text,
};

/// Body for `POST /api/trips`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct CreateTripRequest {
    pub load_id: Option<String>,
    pub truck_id: Option<String>,
    pub driver_id: Option<String>,
}

impl TryFrom<CreateTripRequest> for TripDraft {
    type Error = Error;

    fn try_from(value: CreateTripRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            load_id: parse_required_uuid(value.load_id, FieldName::new("load_id"))?,
            truck_id: parse_required_uuid(value.truck_id, FieldName::new("truck_id"))?,
            driver_id: parse_required_uuid(value.driver_id, FieldName::new("driver_id"))?,
        })
    }
}

/// Body for `PATCH /api/trips/{id}/status`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct TripStatusRequest {
    #[schema(example = "picked_up")]
    pub status: Option<String>,
}

/// Body for `POST /api/trips/{id}/pod`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct PodRequest {
    pub file_ref: Option<String>,
    /// Accepted for compatibility; not stored.
    pub notes: Option<String>,
}

impl TryFrom<PodRequest> for PodUpload {
    type Error = Error;

    fn try_from(value: PodRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            file_ref: required_text(value.file_ref, FieldName::new("file_ref"))?,
            notes: value.notes,
        })
    }
}

fn trip_id(path: web::Path<String>) -> Result<uuid::Uuid, Error> {
    parse_uuid(path.into_inner(), FieldName::new("id"))
}

/// Trips visible to the caller, newest first.
#[utoipa::path(
    get,
    path = "/api/trips",
    responses(
        (status = 200, description = "Trips", body = [Trip]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["trips"],
    operation_id = "listTrips"
)]
#[get("/trips")]
pub async fn list_trips(
    state: web::Data<HttpState>,
    user: CurrentUser,
) -> ApiResult<web::Json<Vec<Trip>>> {
    Ok(web::Json(state.trips.list_trips(&user).await?))
}

/// Fetch one trip.
#[utoipa::path(
    get,
    path = "/api/trips/{id}",
    params(("id" = String, Path, description = "Trip id")),
    responses(
        (status = 200, description = "Trip", body = Trip),
        (status = 400, description = "Malformed id", body = Error),
        (status = 404, description = "Trip not found", body = Error)
    ),
    tags = ["trips"],
    operation_id = "getTrip"
)]
#[get("/trips/{id}")]
pub async fn get_trip(
    state: web::Data<HttpState>,
    _user: CurrentUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<Trip>> {
    Ok(web::Json(state.trips.get_trip(trip_id(path)?).await?))
}

/// Trip joined with its load and truck.
#[utoipa::path(
    get,
    path = "/api/trips/{id}/details",
    params(("id" = String, Path, description = "Trip id")),
    responses(
        (status = 200, description = "Trip details", body = TripDetails),
        (status = 400, description = "Malformed id", body = Error),
        (status = 404, description = "Trip not found", body = Error)
    ),
    tags = ["trips"],
    operation_id = "tripDetails"
)]
#[get("/trips/{id}/details")]
pub async fn trip_details(
    state: web::Data<HttpState>,
    _user: CurrentUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<TripDetails>> {
    Ok(web::Json(state.trips.trip_details(trip_id(path)?).await?))
}

/// Start a trip for an assigned load.
#[utoipa::path(
    post,
    path = "/api/trips",
    request_body = CreateTripRequest,
    responses(
        (status = 201, description = "Trip created", body = Trip),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Caller is not a shipper or admin", body = Error),
        (status = 409, description = "Load already has a trip", body = Error)
    ),
    tags = ["trips"],
    operation_id = "createTrip"
)]
#[post("/trips")]
pub async fn create_trip(
    state: web::Data<HttpState>,
    user: CurrentUser,
    payload: web::Json<CreateTripRequest>,
) -> ApiResult<HttpResponse> {
    let draft = TripDraft::try_from(payload.into_inner())?;
    let trip = state.trips.create_trip(&user, draft).await?;
    Ok(HttpResponse::Created().json(trip))
}

/// Advance a trip through `assigned -> picked_up -> in_transit -> delivered`.
#[utoipa::path(
    patch,
    path = "/api/trips/{id}/status",
    params(("id" = String, Path, description = "Trip id")),
    request_body = TripStatusRequest,
    responses(
        (status = 200, description = "Trip updated", body = Trip),
        (status = 400, description = "Missing or unknown status", body = Error),
        (status = 403, description = "Caller is not a driver", body = Error),
        (status = 404, description = "Trip not found or unauthorized", body = Error),
        (status = 409, description = "Transition not allowed", body = Error)
    ),
    tags = ["trips"],
    operation_id = "updateTripStatus"
)]
#[patch("/trips/{id}/status")]
pub async fn update_trip_status(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<String>,
    payload: web::Json<TripStatusRequest>,
) -> ApiResult<web::Json<Trip>> {
    let id = trip_id(path)?;
    let raw = required_text(payload.into_inner().status, FieldName::new("status"))?;
    let next = parse_enum::<TripStatus>(&raw, FieldName::new("status"))?;
    Ok(web::Json(state.trips.update_status(&user, id, next).await?))
}

/// Attach a proof-of-delivery document to a trip.
#[utoipa::path(
    post,
    path = "/api/trips/{id}/pod",
    params(("id" = String, Path, description = "Trip id")),
    request_body = PodRequest,
    responses(
        (status = 201, description = "Proof of delivery recorded", body = Document),
        (status = 400, description = "file_ref missing", body = Error),
        (status = 403, description = "Caller is not a driver", body = Error),
        (status = 404, description = "Trip not found or unauthorized", body = Error)
    ),
    tags = ["trips"],
    operation_id = "uploadPod"
)]
#[post("/trips/{id}/pod")]
pub async fn upload_pod(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<String>,
    payload: web::Json<PodRequest>,
) -> ApiResult<HttpResponse> {
    let id = trip_id(path)?;
    let upload = PodUpload::try_from(payload.into_inner())?;
    let document = state.trips.upload_pod(&user, id, upload).await?;
    Ok(HttpResponse::Created().json(document))
}
