//! Load board handlers.
//!
//! ```text
//! GET  /api/loads?pickup=pune&weight_min=5&status=open
//! GET  /api/loads/{id}
//! POST /api/loads {"title":"Steel coils","weight_tons":12,"pickup_location":"Pune","delivery_location":"Chennai"}
//! PUT  /api/loads/{id}
//! POST /api/loads/{id}/bids {"proposed_price":5000}
//! GET  /api/loads/{id}/bids
//! POST /api/loads/{id}/assign {"truck_id":"..","driver_id":"..","bid_id":".."}
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    Bid, BidDraft, Error, Load, LoadAssignment, LoadDraft, LoadFilter, LoadStatus, LoadUpdate,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::CurrentUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_optional_enum, parse_optional_rfc3339_timestamp, parse_optional_uuid,
    parse_required_uuid, parse_uuid, positive_number, required_text,
};

/// Query parameters for `GET /api/loads`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LoadQuery {
    /// Case-insensitive substring of the pickup location.
    pub pickup: Option<String>,
    /// Case-insensitive substring of the delivery location.
    pub delivery: Option<String>,
    pub weight_min: Option<f64>,
    pub weight_max: Option<f64>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub status: Option<String>,
}

impl TryFrom<LoadQuery> for LoadFilter {
    type Error = Error;

    fn try_from(value: LoadQuery) -> Result<Self, Self::Error> {
        let non_blank = |text: Option<String>| text.filter(|term| !term.trim().is_empty());
        Ok(Self {
            pickup: non_blank(value.pickup),
            delivery: non_blank(value.delivery),
            weight_min: value.weight_min,
            weight_max: value.weight_max,
            price_min: value.price_min,
            price_max: value.price_max,
            status: parse_optional_enum(value.status, FieldName::new("status"))?,
        })
    }
}

/// Body for `POST /api/loads`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct CreateLoadRequest {
    pub title: Option<String>,
    pub goods_type: Option<String>,
    pub weight_tons: Option<f64>,
    pub pickup_location: Option<String>,
    pub delivery_location: Option<String>,
    /// RFC 3339; defaults to the time of posting.
    pub pickup_window_start: Option<String>,
    pub pickup_window_end: Option<String>,
    pub price_fixed: Option<f64>,
    /// Defaults to `true`.
    pub bidding_enabled: Option<bool>,
}

impl TryFrom<CreateLoadRequest> for LoadDraft {
    type Error = Error;

    fn try_from(value: CreateLoadRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            title: required_text(value.title, FieldName::new("title"))?,
            goods_type: value.goods_type,
            weight_tons: positive_number(value.weight_tons, FieldName::new("weight_tons"))?,
            pickup_location: required_text(
                value.pickup_location,
                FieldName::new("pickup_location"),
            )?,
            delivery_location: required_text(
                value.delivery_location,
                FieldName::new("delivery_location"),
            )?,
            pickup_window_start: parse_optional_rfc3339_timestamp(
                value.pickup_window_start,
                FieldName::new("pickup_window_start"),
            )?,
            pickup_window_end: parse_optional_rfc3339_timestamp(
                value.pickup_window_end,
                FieldName::new("pickup_window_end"),
            )?,
            price_fixed: value.price_fixed,
            bidding_enabled: value.bidding_enabled,
        })
    }
}

/// Body for `PUT /api/loads/{id}`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateLoadRequest {
    pub status: Option<String>,
    pub price_fixed: Option<f64>,
}

impl TryFrom<UpdateLoadRequest> for LoadUpdate {
    type Error = Error;

    fn try_from(value: UpdateLoadRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            status: parse_optional_enum::<LoadStatus>(value.status, FieldName::new("status"))?,
            price_fixed: value.price_fixed,
        })
    }
}

/// Body for `POST /api/loads/{id}/bids`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct PlaceBidRequest {
    pub proposed_price: Option<f64>,
    pub message: Option<String>,
}

impl TryFrom<PlaceBidRequest> for BidDraft {
    type Error = Error;

    fn try_from(value: PlaceBidRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            proposed_price: positive_number(
                value.proposed_price,
                FieldName::new("proposed_price"),
            )?,
            message: value.message,
        })
    }
}

/// Body for `POST /api/loads/{id}/assign`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct AssignLoadRequest {
    pub truck_id: Option<String>,
    pub driver_id: Option<String>,
    /// Bid to mark accepted, if the assignment came from one.
    pub bid_id: Option<String>,
}

impl TryFrom<AssignLoadRequest> for LoadAssignment {
    type Error = Error;

    fn try_from(value: AssignLoadRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            truck_id: parse_required_uuid(value.truck_id, FieldName::new("truck_id"))?,
            driver_id: parse_required_uuid(value.driver_id, FieldName::new("driver_id"))?,
            bid_id: parse_optional_uuid(value.bid_id, FieldName::new("bid_id"))?,
        })
    }
}

fn load_id(path: web::Path<String>) -> Result<uuid::Uuid, Error> {
    parse_uuid(path.into_inner(), FieldName::new("id"))
}

/// Search the load board.
#[utoipa::path(
    get,
    path = "/api/loads",
    params(LoadQuery),
    responses(
        (status = 200, description = "Matching loads, newest first", body = [Load]),
        (status = 400, description = "Invalid filter", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["loads"],
    operation_id = "listLoads"
)]
#[get("/loads")]
pub async fn list_loads(
    state: web::Data<HttpState>,
    _user: CurrentUser,
    query: web::Query<LoadQuery>,
) -> ApiResult<web::Json<Vec<Load>>> {
    let filter = LoadFilter::try_from(query.into_inner())?;
    Ok(web::Json(state.loads.list_loads(&filter).await?))
}

/// Fetch one load.
#[utoipa::path(
    get,
    path = "/api/loads/{id}",
    params(("id" = String, Path, description = "Load id")),
    responses(
        (status = 200, description = "Load", body = Load),
        (status = 400, description = "Malformed id", body = Error),
        (status = 404, description = "Load not found", body = Error)
    ),
    tags = ["loads"],
    operation_id = "getLoad"
)]
#[get("/loads/{id}")]
pub async fn get_load(
    state: web::Data<HttpState>,
    _user: CurrentUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<Load>> {
    Ok(web::Json(state.loads.get_load(load_id(path)?).await?))
}

/// Post a load as the calling shipper.
#[utoipa::path(
    post,
    path = "/api/loads",
    request_body = CreateLoadRequest,
    responses(
        (status = 201, description = "Load posted", body = Load),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Caller is not a shipper", body = Error)
    ),
    tags = ["loads"],
    operation_id = "createLoad"
)]
#[post("/loads")]
pub async fn create_load(
    state: web::Data<HttpState>,
    user: CurrentUser,
    payload: web::Json<CreateLoadRequest>,
) -> ApiResult<HttpResponse> {
    let draft = LoadDraft::try_from(payload.into_inner())?;
    let load = state.loads.create_load(&user, draft).await?;
    Ok(HttpResponse::Created().json(load))
}

/// Change status or price of one of the caller's loads.
#[utoipa::path(
    put,
    path = "/api/loads/{id}",
    params(("id" = String, Path, description = "Load id")),
    request_body = UpdateLoadRequest,
    responses(
        (status = 200, description = "Load updated", body = Load),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Caller is not a shipper", body = Error),
        (status = 404, description = "Load not found or unauthorized", body = Error)
    ),
    tags = ["loads"],
    operation_id = "updateLoad"
)]
#[put("/loads/{id}")]
pub async fn update_load(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<String>,
    payload: web::Json<UpdateLoadRequest>,
) -> ApiResult<web::Json<Load>> {
    let id = load_id(path)?;
    let update = LoadUpdate::try_from(payload.into_inner())?;
    Ok(web::Json(state.loads.update_load(&user, id, update).await?))
}

/// Bid on a load.
#[utoipa::path(
    post,
    path = "/api/loads/{id}/bids",
    params(("id" = String, Path, description = "Load id")),
    request_body = PlaceBidRequest,
    responses(
        (status = 201, description = "Bid placed", body = Bid),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Caller is not a driver or fleet owner", body = Error),
        (status = 404, description = "Load not found", body = Error)
    ),
    tags = ["loads"],
    operation_id = "placeBid"
)]
#[post("/loads/{id}/bids")]
pub async fn place_bid(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<String>,
    payload: web::Json<PlaceBidRequest>,
) -> ApiResult<HttpResponse> {
    let id = load_id(path)?;
    let draft = BidDraft::try_from(payload.into_inner())?;
    let bid = state.loads.place_bid(&user, id, draft).await?;
    Ok(HttpResponse::Created().json(bid))
}

/// Bids on a load, newest first.
#[utoipa::path(
    get,
    path = "/api/loads/{id}/bids",
    params(("id" = String, Path, description = "Load id")),
    responses(
        (status = 200, description = "Bids", body = [Bid]),
        (status = 400, description = "Malformed id", body = Error)
    ),
    tags = ["loads"],
    operation_id = "listBids"
)]
#[get("/loads/{id}/bids")]
pub async fn list_bids(
    state: web::Data<HttpState>,
    _user: CurrentUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<Bid>>> {
    Ok(web::Json(state.loads.list_bids(load_id(path)?).await?))
}

/// Assign a truck and driver, optionally accepting a bid.
#[utoipa::path(
    post,
    path = "/api/loads/{id}/assign",
    params(("id" = String, Path, description = "Load id")),
    request_body = AssignLoadRequest,
    responses(
        (status = 200, description = "Load assigned", body = Load),
        (status = 400, description = "truck_id or driver_id missing", body = Error),
        (status = 403, description = "Caller is not a shipper or admin", body = Error),
        (status = 404, description = "Load or bid not found", body = Error)
    ),
    tags = ["loads"],
    operation_id = "assignLoad"
)]
#[post("/loads/{id}/assign")]
pub async fn assign_load(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<String>,
    payload: web::Json<AssignLoadRequest>,
) -> ApiResult<web::Json<Load>> {
    let id = load_id(path)?;
    let assignment = LoadAssignment::try_from(payload.into_inner())?;
    Ok(web::Json(state.loads.assign_load(&user, id, assignment).await?))
}
