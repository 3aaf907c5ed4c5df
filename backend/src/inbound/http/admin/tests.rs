//! Tests for admin handlers.

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::{
    DisputeDraft, LoadAssignment, LoadDraft, PodUpload, Role, TripDraft, User,
};
use crate::inbound::http::test_utils::{TestBackend, bearer, caller};

macro_rules! test_app {
    ($backend:expr) => {
        actix_test::init_service(
            App::new().app_data($backend.data()).service(
                web::scope("/api")
                    .service(list_users)
                    .service(reports)
                    .service(disputes)
                    .service(commission)
                    .service(set_commission)
                    .service(verify_document)
                    .service(suspend_user)
                    .service(dashboard_stats),
            ),
        )
    };
}

fn draft(title: &str) -> LoadDraft {
    LoadDraft {
        title: title.to_owned(),
        goods_type: None,
        weight_tons: 4.0,
        pickup_location: "Nagpur".to_owned(),
        delivery_location: "Raipur".to_owned(),
        pickup_window_start: None,
        pickup_window_end: None,
        price_fixed: None,
        bidding_enabled: None,
    }
}

/// Run a load through to a proof-of-delivery upload and return the document id.
async fn uploaded_pod(backend: &TestBackend) -> uuid::Uuid {
    let shipper = backend.user(Role::Shipper).await;
    let owner = backend.user(Role::FleetOwner).await;
    let driver = backend.user(Role::Driver).await;
    let truck = backend.truck(&owner, "MH31AB1234").await;
    let state = backend.state();
    let load = state
        .loads
        .create_load(&caller(&shipper), draft("Rice sacks"))
        .await
        .expect("load posted");
    state
        .loads
        .assign_load(
            &caller(&shipper),
            load.id,
            LoadAssignment {
                truck_id: truck.id,
                driver_id: driver.id,
                bid_id: None,
            },
        )
        .await
        .expect("load assigned");
    let trip = state
        .trips
        .create_trip(
            &caller(&shipper),
            TripDraft {
                load_id: load.id,
                truck_id: truck.id,
                driver_id: driver.id,
            },
        )
        .await
        .expect("trip created");
    state
        .trips
        .upload_pod(
            &caller(&driver),
            trip.id,
            PodUpload {
                file_ref: "pod/rice.jpg".to_owned(),
                notes: None,
            },
        )
        .await
        .expect("pod uploaded")
        .id
}

fn get(uri: &str, token: &str) -> actix_http::Request {
    actix_test::TestRequest::get()
        .uri(uri)
        .insert_header(bearer(token))
        .to_request()
}

fn post(uri: &str, token: &str, payload: Value) -> actix_http::Request {
    actix_test::TestRequest::post()
        .uri(uri)
        .insert_header(bearer(token))
        .set_json(payload)
        .to_request()
}

#[rstest]
#[case("/api/admin/users")]
#[case("/api/admin/reports")]
#[case("/api/admin/disputes")]
#[case("/api/admin/commission")]
#[actix_web::test]
async fn console_reads_are_admin_only(#[case] uri: &str) {
    let backend = TestBackend::new();
    let admin = backend.token_for(Role::Admin).await;
    let shipper = backend.token_for(Role::Shipper).await;
    let app = test_app!(backend).await;

    let response = actix_test::call_service(&app, get(uri, &shipper)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = actix_test::call_service(&app, get(uri, &admin)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[actix_web::test]
async fn commission_defaults_then_replaces() {
    let backend = TestBackend::new();
    let admin = backend.token_for(Role::Admin).await;
    let app = test_app!(backend).await;

    let initial: Value =
        actix_test::call_and_read_body_json(&app, get("/api/admin/commission", &admin)).await;
    assert_eq!(
        initial,
        json!({ "name": "Default", "percentage": 0.0, "active": false })
    );

    let response = actix_test::call_service(
        &app,
        post("/api/admin/commission", &admin, json!({ "percentage": 5 })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let first: Value = actix_test::read_body_json(response).await;
    assert_eq!(first["name"], "Platform Commission");

    let response = actix_test::call_service(
        &app,
        post(
            "/api/admin/commission",
            &admin,
            json!({ "name": "Festive", "percentage": 2.5 }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let active: Value =
        actix_test::call_and_read_body_json(&app, get("/api/admin/commission", &admin)).await;
    assert_eq!(active["name"], "Festive");
    assert_eq!(active["percentage"], 2.5);
    assert_eq!(active["active"], true);
    assert_ne!(active["id"], first["id"]);
}

#[rstest]
#[case::missing(json!({ "name": "Nothing" }))]
#[case::negative(json!({ "percentage": -1 }))]
#[case::too_large(json!({ "percentage": 100.5 }))]
#[actix_web::test]
async fn commission_percentage_is_validated(#[case] payload: Value) {
    let backend = TestBackend::new();
    let admin = backend.token_for(Role::Admin).await;
    let app = test_app!(backend).await;

    let response =
        actix_test::call_service(&app, post("/api/admin/commission", &admin, payload)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["field"], "percentage");
}

#[actix_web::test]
async fn suspending_and_reactivating_flip_verification() {
    let backend = TestBackend::new();
    let admin = backend.token_for(Role::Admin).await;
    let target = backend.user(Role::Driver).await;
    let app = test_app!(backend).await;
    let uri = format!("/api/admin/users/{}/suspend", target.id);
    let verified_flag = |users: &Value, id: &User| {
        users
            .as_array()
            .and_then(|list| list.iter().find(|user| user["id"] == json!(id.id)))
            .map(|user| user["verified"].clone())
    };

    let outcome: Value = actix_test::call_and_read_body_json(
        &app,
        post(&uri, &admin, json!({ "suspended": true })),
    )
    .await;
    assert_eq!(outcome, json!({ "ok": true, "message": "User suspended" }));
    let users: Value =
        actix_test::call_and_read_body_json(&app, get("/api/admin/users", &admin)).await;
    assert_eq!(verified_flag(&users, &target), Some(json!(false)));

    let outcome: Value = actix_test::call_and_read_body_json(
        &app,
        post(&uri, &admin, json!({ "suspended": false })),
    )
    .await;
    assert_eq!(outcome["message"], "User activated");
    let users: Value =
        actix_test::call_and_read_body_json(&app, get("/api/admin/users", &admin)).await;
    assert_eq!(verified_flag(&users, &target), Some(json!(true)));
}

#[rstest]
#[case::missing_flag(None, json!({}), StatusCode::BAD_REQUEST)]
#[case::unknown_user(Some(uuid::Uuid::new_v4()), json!({ "suspended": true }), StatusCode::NOT_FOUND)]
#[actix_web::test]
async fn suspend_rejections(
    #[case] user_id: Option<uuid::Uuid>,
    #[case] payload: Value,
    #[case] expected: StatusCode,
) {
    let backend = TestBackend::new();
    let admin = backend.token_for(Role::Admin).await;
    let existing = backend.user(Role::Shipper).await;
    let app = test_app!(backend).await;
    let id = user_id.unwrap_or(existing.id);

    let response = actix_test::call_service(
        &app,
        post(&format!("/api/admin/users/{id}/suspend"), &admin, payload),
    )
    .await;

    assert_eq!(response.status(), expected);
}

#[actix_web::test]
async fn verifying_documents() {
    let backend = TestBackend::new();
    let admin = backend.token_for(Role::Admin).await;
    let document_id = uploaded_pod(&backend).await;
    let someone = uuid::Uuid::new_v4();
    let uri = format!("/api/admin/users/{someone}/verify-document");
    let app = test_app!(backend).await;

    let ack: Value = actix_test::call_and_read_body_json(
        &app,
        post(&uri, &admin, json!({ "doc_id": document_id })),
    )
    .await;
    assert_eq!(ack, json!({ "ok": true }));

    let response = actix_test::call_service(
        &app,
        post(&uri, &admin, json!({ "doc_id": uuid::Uuid::new_v4() })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = actix_test::call_service(&app, post(&uri, &admin, json!({}))).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn admin_disputes_carry_party_emails() {
    let backend = TestBackend::new();
    let admin = backend.token_for(Role::Admin).await;
    let raiser = backend.user(Role::Shipper).await;
    let accused = backend.user(Role::FleetOwner).await;
    backend
        .state()
        .disputes
        .create_dispute(
            &caller(&raiser),
            DisputeDraft {
                reason: "Truck never arrived".to_owned(),
                trip_id: None,
                load_id: None,
                against_user_id: Some(accused.id),
            },
        )
        .await
        .expect("dispute raised");
    let app = test_app!(backend).await;

    let listed: Value =
        actix_test::call_and_read_body_json(&app, get("/api/admin/disputes?status=open", &admin))
            .await;
    assert_eq!(listed[0]["reason"], "Truck never arrived");
    assert_eq!(listed[0]["raised_by_email"], json!(raiser.email));
    assert_eq!(listed[0]["against_email"], json!(accused.email));

    let resolved: Value = actix_test::call_and_read_body_json(
        &app,
        get("/api/admin/disputes?status=resolved", &admin),
    )
    .await;
    assert_eq!(resolved, json!([]));
}

#[actix_web::test]
async fn reports_count_the_platform() {
    let backend = TestBackend::new();
    let admin = backend.token_for(Role::Admin).await;
    let shipper = backend.user(Role::Shipper).await;
    backend
        .state()
        .loads
        .create_load(&caller(&shipper), draft("Paper rolls"))
        .await
        .expect("load posted");
    let app = test_app!(backend).await;

    let report: Value =
        actix_test::call_and_read_body_json(&app, get("/api/admin/reports", &admin)).await;

    assert_eq!(report["total_users"], 2);
    assert_eq!(report["open_loads"], 1);
    assert_eq!(report["completed_loads"], 0);
    assert_eq!(report["total_revenue"], 0.0);
}

#[actix_web::test]
async fn dashboard_follows_the_caller_role() {
    let backend = TestBackend::new();
    let shipper = backend.user(Role::Shipper).await;
    let owner = backend.user(Role::FleetOwner).await;
    backend.truck(&owner, "GJ01XY0001").await;
    backend
        .state()
        .loads
        .create_load(&caller(&shipper), draft("Glass panes"))
        .await
        .expect("load posted");
    let admin = backend.token_for(Role::Admin).await;
    let app = test_app!(backend).await;

    let stats: Value = actix_test::call_and_read_body_json(
        &app,
        get("/api/admin/dashboard/stats", &backend.token(&shipper)),
    )
    .await;
    assert_eq!(stats["total_loads"], 1);
    assert_eq!(stats["open_loads"], 1);

    let stats: Value = actix_test::call_and_read_body_json(
        &app,
        get("/api/admin/dashboard/stats", &backend.token(&owner)),
    )
    .await;
    assert_eq!(
        stats,
        json!({ "total_trucks": 1, "available_trucks": 1, "active_jobs": 0 })
    );

    let stats: Value =
        actix_test::call_and_read_body_json(&app, get("/api/admin/dashboard/stats", &admin)).await;
    assert_eq!(stats, json!({}));
}
