//! Shared wiring for HTTP integration suites.

use std::sync::Arc;

use actix_http::Request;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, web};
use chrono::Duration;
use mockable::{Clock, DefaultClock};
use serde_json::{Value, json};

use fleetflow::domain::{DEMO_PASSWORD, DemoAccountSeeder};
use fleetflow::inbound::http::health::HealthState;
use fleetflow::inbound::http::state::{HttpState, HttpStatePorts};
use fleetflow::outbound::memory::MemoryStore;
use fleetflow::outbound::security::{Argon2PasswordHasher, JwtTokenService};

/// Application state over a fresh in-memory store with the demo accounts.
pub async fn seeded_state() -> (web::Data<HealthState>, web::Data<HttpState>) {
    let store = MemoryStore::new();
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let hasher = Arc::new(Argon2PasswordHasher);
    DemoAccountSeeder::new(Arc::new(store.clone()), hasher.clone(), clock.clone())
        .seed()
        .await
        .expect("demo accounts seeded");
    let state = HttpState::new(HttpStatePorts {
        users: Arc::new(store.clone()),
        fleet: Arc::new(store.clone()),
        loads: Arc::new(store.clone()),
        trips: Arc::new(store.clone()),
        payments: Arc::new(store.clone()),
        messages: Arc::new(store.clone()),
        disputes: Arc::new(store.clone()),
        reporting: Arc::new(store),
        hasher,
        tokens: Arc::new(JwtTokenService::new(
            b"integration-secret",
            Duration::hours(1),
            clock.clone(),
        )),
        clock,
    });
    let health = web::Data::new(HealthState::new());
    health.mark_ready();
    (health, web::Data::new(state))
}

/// Log in as a demo account and return its bearer token.
pub async fn login<S>(app: &S, email: &str) -> String
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let request = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": email, "password": DEMO_PASSWORD }))
        .to_request();
    let body: Value = test::call_and_read_body_json(app, request).await;
    body["token"].as_str().expect("token issued").to_owned()
}

/// Send `method uri` with an optional bearer token and JSON body.
pub async fn send<S>(
    app: &S,
    request: test::TestRequest,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let mut request = request;
    if let Some(token) = token {
        request = request.insert_header(("Authorization", format!("Bearer {token}")));
    }
    if let Some(body) = body {
        request = request.set_json(body);
    }
    let response = test::call_service(app, request.to_request()).await;
    let status = response.status();
    let bytes = test::read_body(response).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("JSON body")
    };
    (status, value)
}
