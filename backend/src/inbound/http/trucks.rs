//! Fleet registry handlers.
//!
//! ```text
//! GET  /api/trucks?company_id=..&status=available&capacity=10
//! GET  /api/trucks/{id}
//! POST /api/trucks {"registration_number":"MH12AB1234","type":"flatbed","capacity_tons":20}
//! PUT  /api/trucks/{id}
//! POST /api/trucks/{id}/assign-driver {"driver_id":".."}
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{Error, Truck, TruckDraft, TruckFilter, TruckStatus, TruckUpdate};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::CurrentUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_optional_enum, parse_optional_uuid, parse_required_uuid, parse_uuid,
    positive_number, required_text,
};

/// Query parameters for `GET /api/trucks`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TruckQuery {
    pub company_id: Option<String>,
    /// One of `available`, `on_trip`, `maintenance`.
    pub status: Option<String>,
    /// Minimum capacity in tons.
    #[serde(alias = "min_capacity_tons")]
    pub capacity: Option<f64>,
}

impl TryFrom<TruckQuery> for TruckFilter {
    type Error = Error;

    fn try_from(value: TruckQuery) -> Result<Self, Self::Error> {
        Ok(Self {
            company_id: parse_optional_uuid(value.company_id, FieldName::new("company_id"))?,
            status: parse_optional_enum(value.status, FieldName::new("status"))?,
            min_capacity_tons: value.capacity,
        })
    }
}

/// Body for `POST /api/trucks`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct CreateTruckRequest {
    pub registration_number: Option<String>,
    #[serde(alias = "type")]
    pub truck_type: Option<String>,
    pub capacity_tons: Option<f64>,
}

impl TryFrom<CreateTruckRequest> for TruckDraft {
    type Error = Error;

    fn try_from(value: CreateTruckRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            registration_number: required_text(
                value.registration_number,
                FieldName::new("registration_number"),
            )?,
            truck_type: required_text(value.truck_type, FieldName::new("truck_type"))?,
            capacity_tons: positive_number(value.capacity_tons, FieldName::new("capacity_tons"))?,
        })
    }
}

/// Body for `PUT /api/trucks/{id}`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateTruckRequest {
    pub status: Option<String>,
    /// Omitted or `null` unassigns the driver.
    pub assigned_driver_id: Option<String>,
}

impl TryFrom<UpdateTruckRequest> for TruckUpdate {
    type Error = Error;

    fn try_from(value: UpdateTruckRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            status: parse_optional_enum::<TruckStatus>(value.status, FieldName::new("status"))?,
            assigned_driver_id: parse_optional_uuid(
                value.assigned_driver_id,
                FieldName::new("assigned_driver_id"),
            )?,
        })
    }
}

/// Body for `POST /api/trucks/{id}/assign-driver`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct AssignDriverRequest {
    pub driver_id: Option<String>,
}

/// List trucks matching the optional filters.
#[utoipa::path(
    get,
    path = "/api/trucks",
    params(TruckQuery),
    responses(
        (status = 200, description = "Trucks", body = [Truck]),
        (status = 400, description = "Invalid filter", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["trucks"],
    operation_id = "listTrucks"
)]
#[get("/trucks")]
pub async fn list_trucks(
    state: web::Data<HttpState>,
    _user: CurrentUser,
    query: web::Query<TruckQuery>,
) -> ApiResult<web::Json<Vec<Truck>>> {
    let filter = TruckFilter::try_from(query.into_inner())?;
    Ok(web::Json(state.fleet.list_trucks(&filter).await?))
}

/// Fetch one truck.
#[utoipa::path(
    get,
    path = "/api/trucks/{id}",
    params(("id" = String, Path, description = "Truck id")),
    responses(
        (status = 200, description = "Truck", body = Truck),
        (status = 400, description = "Malformed id", body = Error),
        (status = 404, description = "Truck not found", body = Error)
    ),
    tags = ["trucks"],
    operation_id = "getTruck"
)]
#[get("/trucks/{id}")]
pub async fn get_truck(
    state: web::Data<HttpState>,
    _user: CurrentUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<Truck>> {
    let id = parse_uuid(path.into_inner(), FieldName::new("id"))?;
    Ok(web::Json(state.fleet.get_truck(id).await?))
}

/// Register a truck under the caller's company.
#[utoipa::path(
    post,
    path = "/api/trucks",
    request_body = CreateTruckRequest,
    responses(
        (status = 201, description = "Truck registered", body = Truck),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Caller is not a fleet owner", body = Error),
        (status = 409, description = "Registration number already exists", body = Error)
    ),
    tags = ["trucks"],
    operation_id = "createTruck"
)]
#[post("/trucks")]
pub async fn create_truck(
    state: web::Data<HttpState>,
    user: CurrentUser,
    payload: web::Json<CreateTruckRequest>,
) -> ApiResult<HttpResponse> {
    let draft = TruckDraft::try_from(payload.into_inner())?;
    let truck = state.fleet.create_truck(&user, draft).await?;
    Ok(HttpResponse::Created().json(truck))
}

/// Change a truck's status and assigned driver.
#[utoipa::path(
    put,
    path = "/api/trucks/{id}",
    params(("id" = String, Path, description = "Truck id")),
    request_body = UpdateTruckRequest,
    responses(
        (status = 200, description = "Truck updated", body = Truck),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Caller is not a fleet owner", body = Error),
        (status = 404, description = "Truck not found", body = Error)
    ),
    tags = ["trucks"],
    operation_id = "updateTruck"
)]
#[put("/trucks/{id}")]
pub async fn update_truck(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<String>,
    payload: web::Json<UpdateTruckRequest>,
) -> ApiResult<web::Json<Truck>> {
    let id = parse_uuid(path.into_inner(), FieldName::new("id"))?;
    let update = TruckUpdate::try_from(payload.into_inner())?;
    Ok(web::Json(state.fleet.update_truck(&user, id, update).await?))
}

/// Assign a driver to a truck.
#[utoipa::path(
    post,
    path = "/api/trucks/{id}/assign-driver",
    params(("id" = String, Path, description = "Truck id")),
    request_body = AssignDriverRequest,
    responses(
        (status = 200, description = "Driver assigned", body = Truck),
        (status = 400, description = "driver_id missing or malformed", body = Error),
        (status = 403, description = "Caller is not a fleet owner", body = Error),
        (status = 404, description = "Truck not found", body = Error)
    ),
    tags = ["trucks"],
    operation_id = "assignDriver"
)]
#[post("/trucks/{id}/assign-driver")]
pub async fn assign_driver(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<String>,
    payload: web::Json<AssignDriverRequest>,
) -> ApiResult<web::Json<Truck>> {
    let id = parse_uuid(path.into_inner(), FieldName::new("id"))?;
    let driver_id =
        parse_required_uuid(payload.into_inner().driver_id, FieldName::new("driver_id"))?;
    Ok(web::Json(state.fleet.assign_driver(&user, id, driver_id).await?))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::Role;
    use crate::inbound::http::test_utils::{TestBackend, bearer};

    macro_rules! test_app {
        ($backend:expr) => {
            actix_test::init_service(
                App::new().app_data($backend.data()).service(
                    web::scope("/api")
                        .service(list_trucks)
                        .service(get_truck)
                        .service(create_truck)
                        .service(update_truck)
                        .service(assign_driver),
                ),
            )
        };
    }

    fn truck_body(registration: &str) -> Value {
        json!({ "registration_number": registration, "type": "flatbed", "capacity_tons": 20 })
    }

    #[actix_web::test]
    async fn fleet_owner_registers_available_truck() {
        let backend = TestBackend::new();
        let token = backend.token_for(Role::FleetOwner).await;
        let app = test_app!(backend).await;

        let request = actix_test::TestRequest::post()
            .uri("/api/trucks")
            .insert_header(bearer(&token))
            .set_json(truck_body("MH12AB1234"))
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["status"], "available");
        assert_eq!(body["truck_type"], "flatbed");
    }

    #[actix_web::test]
    async fn duplicate_registration_is_a_conflict() {
        let backend = TestBackend::new();
        let token = backend.token_for(Role::FleetOwner).await;
        let app = test_app!(backend).await;

        for expected in [StatusCode::CREATED, StatusCode::CONFLICT] {
            let request = actix_test::TestRequest::post()
                .uri("/api/trucks")
                .insert_header(bearer(&token))
                .set_json(truck_body("KA01XY0001"))
                .to_request();
            let response = actix_test::call_service(&app, request).await;
            assert_eq!(response.status(), expected);
        }
    }

    #[rstest]
    #[case(json!({ "type": "flatbed", "capacity_tons": 20 }))]
    #[case(json!({ "registration_number": "R1", "capacity_tons": 20 }))]
    #[case(json!({ "registration_number": "R1", "type": "flatbed" }))]
    #[case(json!({ "registration_number": "R1", "type": "flatbed", "capacity_tons": 0 }))]
    #[actix_web::test]
    async fn incomplete_trucks_are_rejected(#[case] payload: Value) {
        let backend = TestBackend::new();
        let token = backend.token_for(Role::FleetOwner).await;
        let app = test_app!(backend).await;

        let request = actix_test::TestRequest::post()
            .uri("/api/trucks")
            .insert_header(bearer(&token))
            .set_json(payload)
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn shippers_cannot_register_trucks() {
        let backend = TestBackend::new();
        let token = backend.token_for(Role::Shipper).await;
        let app = test_app!(backend).await;

        let request = actix_test::TestRequest::post()
            .uri("/api/trucks")
            .insert_header(bearer(&token))
            .set_json(truck_body("R2"))
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn unknown_status_and_missing_truck() {
        let backend = TestBackend::new();
        let token = backend.token_for(Role::FleetOwner).await;
        let app = test_app!(backend).await;
        let missing = uuid::Uuid::new_v4();

        let request = actix_test::TestRequest::put()
            .uri(&format!("/api/trucks/{missing}"))
            .insert_header(bearer(&token))
            .set_json(json!({ "status": "flying" }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let request = actix_test::TestRequest::put()
            .uri(&format!("/api/trucks/{missing}"))
            .insert_header(bearer(&token))
            .set_json(json!({ "status": "maintenance" }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn assign_driver_requires_driver_id_and_filters_by_capacity() {
        let backend = TestBackend::new();
        let token = backend.token_for(Role::FleetOwner).await;
        let driver = backend.user(Role::Driver).await;
        let app = test_app!(backend).await;

        let request = actix_test::TestRequest::post()
            .uri("/api/trucks")
            .insert_header(bearer(&token))
            .set_json(truck_body("TN09CD4321"))
            .to_request();
        let truck: Value = actix_test::call_and_read_body_json(&app, request).await;
        let truck_id = truck["id"].as_str().expect("truck id").to_owned();

        let request = actix_test::TestRequest::post()
            .uri(&format!("/api/trucks/{truck_id}/assign-driver"))
            .insert_header(bearer(&token))
            .set_json(json!({}))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let request = actix_test::TestRequest::post()
            .uri(&format!("/api/trucks/{truck_id}/assign-driver"))
            .insert_header(bearer(&token))
            .set_json(json!({ "driver_id": driver.id }))
            .to_request();
        let assigned: Value = actix_test::call_and_read_body_json(&app, request).await;
        assert_eq!(assigned["assigned_driver_id"], json!(driver.id));

        let request = actix_test::TestRequest::get()
            .uri("/api/trucks?capacity=25")
            .insert_header(bearer(&token))
            .to_request();
        let heavy: Value = actix_test::call_and_read_body_json(&app, request).await;
        assert_eq!(heavy, json!([]));
    }

    #[actix_web::test]
    async fn malformed_ids_are_bad_requests() {
        let backend = TestBackend::new();
        let token = backend.token_for(Role::Driver).await;
        let app = test_app!(backend).await;

        let request = actix_test::TestRequest::get()
            .uri("/api/trucks/not-a-uuid")
            .insert_header(bearer(&token))
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["details"]["code"], "invalid_uuid");
    }
}
