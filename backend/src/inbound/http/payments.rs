//! Payment and invoice handlers.
//!
//! ```text
//! GET  /api/payments
//! GET  /api/payments/{id}
//! GET  /api/payments/{id}/invoice
//! POST /api/payments {"load_id":"..","payee_id":"..","amount":42000}
//! POST /api/payments/charge (same body)
//! POST /api/payments/{id}/confirm
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, Invoice, Payment, PaymentDraft, PaymentReceipt};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::CurrentUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_required_uuid, parse_uuid, positive_number,
};

/// Body for `POST /api/payments`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct CreatePaymentRequest {
    pub load_id: Option<String>,
    pub payee_id: Option<String>,
    pub amount: Option<f64>,
    /// Defaults to `pending`.
    pub method: Option<String>,
}

impl TryFrom<CreatePaymentRequest> for PaymentDraft {
    type Error = Error;

    fn try_from(value: CreatePaymentRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            load_id: parse_required_uuid(value.load_id, FieldName::new("load_id"))?,
            payee_id: parse_required_uuid(value.payee_id, FieldName::new("payee_id"))?,
            amount: positive_number(value.amount, FieldName::new("amount"))?,
            method: value.method.filter(|method| !method.trim().is_empty()),
        })
    }
}

fn payment_id(path: web::Path<String>) -> Result<uuid::Uuid, Error> {
    parse_uuid(path.into_inner(), FieldName::new("id"))
}

/// Payments where the caller is payer or payee; all of them for admins.
#[utoipa::path(
    get,
    path = "/api/payments",
    responses(
        (status = 200, description = "Payments, newest first", body = [Payment]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["payments"],
    operation_id = "listPayments"
)]
#[get("/payments")]
pub async fn list_payments(
    state: web::Data<HttpState>,
    user: CurrentUser,
) -> ApiResult<web::Json<Vec<Payment>>> {
    Ok(web::Json(state.payments.list_payments(&user).await?))
}

/// Fetch one payment visible to the caller.
#[utoipa::path(
    get,
    path = "/api/payments/{id}",
    params(("id" = String, Path, description = "Payment id")),
    responses(
        (status = 200, description = "Payment", body = Payment),
        (status = 400, description = "Malformed id", body = Error),
        (status = 404, description = "Payment not found", body = Error)
    ),
    tags = ["payments"],
    operation_id = "getPayment"
)]
#[get("/payments/{id}")]
pub async fn get_payment(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<Payment>> {
    let id = payment_id(path)?;
    Ok(web::Json(state.payments.get_payment(&user, id).await?))
}

/// Invoice view of a payment.
#[utoipa::path(
    get,
    path = "/api/payments/{id}/invoice",
    params(("id" = String, Path, description = "Payment id")),
    responses(
        (status = 200, description = "Invoice", body = Invoice),
        (status = 400, description = "Malformed id", body = Error),
        (status = 404, description = "Payment not found", body = Error)
    ),
    tags = ["payments"],
    operation_id = "getInvoice"
)]
#[get("/payments/{id}/invoice")]
pub async fn get_invoice(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<Invoice>> {
    let id = payment_id(path)?;
    Ok(web::Json(state.payments.invoice(&user, id).await?))
}

async fn charge(
    state: &HttpState,
    user: &CurrentUser,
    payload: CreatePaymentRequest,
) -> ApiResult<HttpResponse> {
    let draft = PaymentDraft::try_from(payload)?;
    let receipt = state.payments.create_payment(user, draft).await?;
    Ok(HttpResponse::Created().json(receipt))
}

/// Record a pending payment from the calling shipper.
///
/// No idempotency key is taken: every call creates a new payment.
#[utoipa::path(
    post,
    path = "/api/payments",
    request_body = CreatePaymentRequest,
    responses(
        (status = 201, description = "Payment recorded", body = PaymentReceipt),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Caller is not a shipper", body = Error),
        (status = 404, description = "Load or payee not found", body = Error)
    ),
    tags = ["payments"],
    operation_id = "createPayment"
)]
#[post("/payments")]
pub async fn create_payment(
    state: web::Data<HttpState>,
    user: CurrentUser,
    payload: web::Json<CreatePaymentRequest>,
) -> ApiResult<HttpResponse> {
    charge(&state, &user, payload.into_inner()).await
}

/// Alias of `POST /api/payments`.
#[utoipa::path(
    post,
    path = "/api/payments/charge",
    request_body = CreatePaymentRequest,
    responses(
        (status = 201, description = "Payment recorded", body = PaymentReceipt),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Caller is not a shipper", body = Error)
    ),
    tags = ["payments"],
    operation_id = "chargePayment"
)]
#[post("/payments/charge")]
pub async fn charge_payment(
    state: web::Data<HttpState>,
    user: CurrentUser,
    payload: web::Json<CreatePaymentRequest>,
) -> ApiResult<HttpResponse> {
    charge(&state, &user, payload.into_inner()).await
}

/// Mark a payment paid; only the payer or an admin may.
#[utoipa::path(
    post,
    path = "/api/payments/{id}/confirm",
    params(("id" = String, Path, description = "Payment id")),
    responses(
        (status = 200, description = "Payment confirmed", body = Payment),
        (status = 403, description = "Caller is not the payer", body = Error),
        (status = 404, description = "Payment not found", body = Error)
    ),
    tags = ["payments"],
    operation_id = "confirmPayment"
)]
#[post("/payments/{id}/confirm")]
pub async fn confirm_payment(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<Payment>> {
    let id = payment_id(path)?;
    Ok(web::Json(state.payments.confirm_payment(&user, id).await?))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::{LoadDraft, Role, User};
    use crate::inbound::http::test_utils::{TestBackend, bearer, caller};

    macro_rules! test_app {
        ($backend:expr) => {
            actix_test::init_service(
                App::new().app_data($backend.data()).service(
                    web::scope("/api")
                        // Literal segments first so `/payments/charge` never
                        // parses as an id.
                        .service(charge_payment)
                        .service(create_payment)
                        .service(list_payments)
                        .service(get_payment)
                        .service(get_invoice)
                        .service(confirm_payment),
                ),
            )
        };
    }

    async fn posted_load(backend: &TestBackend, shipper: &User) -> uuid::Uuid {
        backend
            .state()
            .loads
            .create_load(
                &caller(shipper),
                LoadDraft {
                    title: "Ceramic tiles".to_owned(),
                    goods_type: None,
                    weight_tons: 7.0,
                    pickup_location: "Morbi".to_owned(),
                    delivery_location: "Jaipur".to_owned(),
                    pickup_window_start: None,
                    pickup_window_end: None,
                    price_fixed: None,
                    bidding_enabled: None,
                },
            )
            .await
            .expect("load posted")
            .id
    }

    async fn charge_for(
        app: &impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
        uri: &str,
        token: &str,
        payload: Value,
    ) -> (StatusCode, Value) {
        let request = actix_test::TestRequest::post()
            .uri(uri)
            .insert_header(bearer(token))
            .set_json(payload)
            .to_request();
        let response = actix_test::call_service(app, request).await;
        let status = response.status();
        (status, actix_test::read_body_json(response).await)
    }

    #[actix_web::test]
    async fn charge_confirm_and_invoice() {
        let backend = TestBackend::new();
        let shipper = backend.user(Role::Shipper).await;
        let owner = backend.user(Role::FleetOwner).await;
        let load_id = posted_load(&backend, &shipper).await;
        let shipper_token = backend.token(&shipper);
        let app = test_app!(backend).await;

        let (status, receipt) = charge_for(
            &app,
            "/api/payments/charge",
            &shipper_token,
            json!({ "load_id": load_id, "payee_id": owner.id, "amount": 42000 }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(receipt["status"], "pending");
        assert_eq!(receipt["method"], "pending");
        let invoice_number = receipt["invoice_number"].as_str().expect("invoice number");
        assert!(invoice_number.starts_with("INV-"));
        let payment_id = receipt["id"].as_str().expect("id").to_owned();

        let request = actix_test::TestRequest::post()
            .uri(&format!("/api/payments/{payment_id}/confirm"))
            .insert_header(bearer(&backend.token(&owner)))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let request = actix_test::TestRequest::post()
            .uri(&format!("/api/payments/{payment_id}/confirm"))
            .insert_header(bearer(&shipper_token))
            .to_request();
        let paid: Value = actix_test::call_and_read_body_json(&app, request).await;
        assert_eq!(paid["status"], "paid");

        let request = actix_test::TestRequest::get()
            .uri(&format!("/api/payments/{payment_id}/invoice"))
            .insert_header(bearer(&backend.token(&owner)))
            .to_request();
        let invoice: Value = actix_test::call_and_read_body_json(&app, request).await;
        assert_eq!(invoice["invoice_number"], invoice_number);
        assert_eq!(invoice["payer"], json!(shipper.email));
        assert_eq!(invoice["payee"], json!(owner.email));
        assert_eq!(invoice["load"], "Ceramic tiles");
        assert_eq!(invoice["status"], "paid");
    }

    #[actix_web::test]
    async fn repeated_charges_create_distinct_payments() {
        let backend = TestBackend::new();
        let shipper = backend.user(Role::Shipper).await;
        let owner = backend.user(Role::FleetOwner).await;
        let load_id = posted_load(&backend, &shipper).await;
        let token = backend.token(&shipper);
        let app = test_app!(backend).await;
        let body = json!({ "load_id": load_id, "payee_id": owner.id, "amount": 100.5 });

        let (_, first) = charge_for(&app, "/api/payments", &token, body.clone()).await;
        let (_, second) = charge_for(&app, "/api/payments", &token, body).await;

        assert_ne!(first["id"], second["id"]);
    }

    #[actix_web::test]
    async fn outsiders_cannot_see_a_payment() {
        let backend = TestBackend::new();
        let shipper = backend.user(Role::Shipper).await;
        let owner = backend.user(Role::FleetOwner).await;
        let load_id = posted_load(&backend, &shipper).await;
        let outsider = backend.token_for(Role::Driver).await;
        let app = test_app!(backend).await;
        let (_, receipt) = charge_for(
            &app,
            "/api/payments",
            &backend.token(&shipper),
            json!({ "load_id": load_id, "payee_id": owner.id, "amount": 10 }),
        )
        .await;
        let payment_id = receipt["id"].as_str().expect("id").to_owned();

        for uri in [
            format!("/api/payments/{payment_id}"),
            format!("/api/payments/{payment_id}/invoice"),
        ] {
            let request = actix_test::TestRequest::get()
                .uri(&uri)
                .insert_header(bearer(&outsider))
                .to_request();
            let response = actix_test::call_service(&app, request).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND);
        }

        let request = actix_test::TestRequest::get()
            .uri("/api/payments")
            .insert_header(bearer(&outsider))
            .to_request();
        let visible: Value = actix_test::call_and_read_body_json(&app, request).await;
        assert_eq!(visible, json!([]));
    }

    #[actix_web::test]
    async fn amount_must_be_positive() {
        let backend = TestBackend::new();
        let token = backend.token_for(Role::Shipper).await;
        let app = test_app!(backend).await;

        let (status, body) = charge_for(
            &app,
            "/api/payments",
            &token,
            json!({
                "load_id": uuid::Uuid::new_v4(),
                "payee_id": uuid::Uuid::new_v4(),
                "amount": 0
            }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["field"], "amount");
    }
}
