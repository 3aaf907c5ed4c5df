//! Direct messaging handlers.
//!
//! ```text
//! GET   /api/messages
//! GET   /api/messages/conversation/{user_id}
//! POST  /api/messages {"receiver_id":"..","content":"On my way"}
//! PATCH /api/messages/{id}/read
//! GET   /api/messages/unread/count
//! ```

use actix_web::{HttpResponse, get, patch, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{Error, Message, MessageDraft, UnreadCount};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::CurrentUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_optional_uuid, parse_required_uuid, parse_uuid, required_text,
};

/// Body for `POST /api/messages`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct SendMessageRequest {
    pub receiver_id: Option<String>,
    pub content: Option<String>,
    pub load_id: Option<String>,
}

impl TryFrom<SendMessageRequest> for MessageDraft {
    type Error = Error;

    fn try_from(value: SendMessageRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            receiver_id: parse_required_uuid(value.receiver_id, FieldName::new("receiver_id"))?,
            content: required_text(value.content, FieldName::new("content"))?,
            load_id: parse_optional_uuid(value.load_id, FieldName::new("load_id"))?,
        })
    }
}

/// Messages the caller sent or received.
#[utoipa::path(
    get,
    path = "/api/messages",
    responses(
        (status = 200, description = "Messages, newest first", body = [Message]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["messages"],
    operation_id = "listMessages"
)]
#[get("/messages")]
pub async fn list_messages(
    state: web::Data<HttpState>,
    user: CurrentUser,
) -> ApiResult<web::Json<Vec<Message>>> {
    Ok(web::Json(state.messaging.list_messages(&user).await?))
}

/// The latest messages exchanged with another user.
#[utoipa::path(
    get,
    path = "/api/messages/conversation/{user_id}",
    params(("user_id" = String, Path, description = "Other participant")),
    responses(
        (status = 200, description = "Up to 50 messages, newest first", body = [Message]),
        (status = 400, description = "Malformed id", body = Error)
    ),
    tags = ["messages"],
    operation_id = "conversation"
)]
#[get("/messages/conversation/{user_id}")]
pub async fn conversation(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<Message>>> {
    let other = parse_uuid(path.into_inner(), FieldName::new("user_id"))?;
    Ok(web::Json(state.messaging.conversation(&user, other).await?))
}

/// Send a message.
#[utoipa::path(
    post,
    path = "/api/messages",
    request_body = SendMessageRequest,
    responses(
        (status = 201, description = "Message sent", body = Message),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Receiver or load not found", body = Error)
    ),
    tags = ["messages"],
    operation_id = "sendMessage"
)]
#[post("/messages")]
pub async fn send_message(
    state: web::Data<HttpState>,
    user: CurrentUser,
    payload: web::Json<SendMessageRequest>,
) -> ApiResult<HttpResponse> {
    let draft = MessageDraft::try_from(payload.into_inner())?;
    let message = state.messaging.send_message(&user, draft).await?;
    Ok(HttpResponse::Created().json(message))
}

/// Mark a received message read. Unknown ids succeed silently.
#[utoipa::path(
    patch,
    path = "/api/messages/{id}/read",
    params(("id" = String, Path, description = "Message id")),
    responses(
        (status = 200, description = "Acknowledged"),
        (status = 400, description = "Malformed id", body = Error)
    ),
    tags = ["messages"],
    operation_id = "markMessageRead"
)]
#[patch("/messages/{id}/read")]
pub async fn mark_read(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_uuid(path.into_inner(), FieldName::new("id"))?;
    state.messaging.mark_read(&user, id).await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true })))
}

/// Number of unread messages addressed to the caller.
#[utoipa::path(
    get,
    path = "/api/messages/unread/count",
    responses(
        (status = 200, description = "Unread counter", body = UnreadCount),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["messages"],
    operation_id = "unreadCount"
)]
#[get("/messages/unread/count")]
pub async fn unread_count(
    state: web::Data<HttpState>,
    user: CurrentUser,
) -> ApiResult<web::Json<UnreadCount>> {
    Ok(web::Json(state.messaging.unread_count(&user).await?))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::Value;

    use super::*;
    use crate::domain::Role;
    use crate::inbound::http::test_utils::{TestBackend, bearer};

    macro_rules! test_app {
        ($backend:expr) => {
            actix_test::init_service(
                App::new().app_data($backend.data()).service(
                    web::scope("/api")
                        .service(list_messages)
                        .service(conversation)
                        .service(send_message)
                        .service(mark_read)
                        .service(unread_count),
                ),
            )
        };
    }

    fn unread_request(token: &str) -> actix_http::Request {
        actix_test::TestRequest::get()
            .uri("/api/messages/unread/count")
            .insert_header(bearer(token))
            .to_request()
    }

    #[actix_web::test]
    async fn send_count_and_read() {
        let backend = TestBackend::new();
        let shipper = backend.user(Role::Shipper).await;
        let driver = backend.user(Role::Driver).await;
        let shipper_token = backend.token(&shipper);
        let driver_token = backend.token(&driver);
        let app = test_app!(backend).await;

        let request = actix_test::TestRequest::post()
            .uri("/api/messages")
            .insert_header(bearer(&shipper_token))
            .set_json(json!({ "receiver_id": driver.id, "content": "Gate 4 please" }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let sent: Value = actix_test::read_body_json(response).await;
        assert_eq!(sent["read"], false);
        let message_id = sent["id"].as_str().expect("id").to_owned();

        let unread: Value =
            actix_test::call_and_read_body_json(&app, unread_request(&driver_token)).await;
        assert_eq!(unread, json!({ "unread_count": 1 }));

        // The sender cannot mark it read on the receiver's behalf.
        let request = actix_test::TestRequest::patch()
            .uri(&format!("/api/messages/{message_id}/read"))
            .insert_header(bearer(&shipper_token))
            .to_request();
        let ack: Value = actix_test::call_and_read_body_json(&app, request).await;
        assert_eq!(ack, json!({ "ok": true }));
        let unread: Value =
            actix_test::call_and_read_body_json(&app, unread_request(&driver_token)).await;
        assert_eq!(unread["unread_count"], 1);

        let request = actix_test::TestRequest::patch()
            .uri(&format!("/api/messages/{message_id}/read"))
            .insert_header(bearer(&driver_token))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let unread: Value =
            actix_test::call_and_read_body_json(&app, unread_request(&driver_token)).await;
        assert_eq!(unread["unread_count"], 0);
    }

    #[actix_web::test]
    async fn conversation_excludes_third_parties() {
        let backend = TestBackend::new();
        let alice = backend.user(Role::Shipper).await;
        let bob = backend.user(Role::Driver).await;
        let carol = backend.user(Role::FleetOwner).await;
        let app = test_app!(backend).await;
        for (from, to, content) in [
            (&alice, &bob, "first"),
            (&bob, &alice, "second"),
            (&carol, &alice, "noise"),
        ] {
            let request = actix_test::TestRequest::post()
                .uri("/api/messages")
                .insert_header(bearer(&backend.token(from)))
                .set_json(json!({ "receiver_id": to.id, "content": content }))
                .to_request();
            let response = actix_test::call_service(&app, request).await;
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let request = actix_test::TestRequest::get()
            .uri(&format!("/api/messages/conversation/{}", bob.id))
            .insert_header(bearer(&backend.token(&alice)))
            .to_request();
        let thread: Value = actix_test::call_and_read_body_json(&app, request).await;

        let contents: Vec<&str> = thread
            .as_array()
            .expect("array")
            .iter()
            .filter_map(|message| message["content"].as_str())
            .collect();
        assert_eq!(contents, ["second", "first"]);
    }

    #[rstest]
    #[case::no_content(json!({ "receiver_id": uuid::Uuid::new_v4() }), "content")]
    #[case::blank_content(json!({ "receiver_id": uuid::Uuid::new_v4(), "content": "  " }), "content")]
    #[case::no_receiver(json!({ "content": "hi" }), "receiver_id")]
    #[actix_web::test]
    async fn incomplete_messages_are_rejected(#[case] payload: Value, #[case] field: &str) {
        let backend = TestBackend::new();
        let token = backend.token_for(Role::Driver).await;
        let app = test_app!(backend).await;

        let request = actix_test::TestRequest::post()
            .uri("/api/messages")
            .insert_header(bearer(&token))
            .set_json(payload)
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["details"]["field"], field);
    }

    #[actix_web::test]
    async fn unknown_receiver_is_not_found() {
        let backend = TestBackend::new();
        let token = backend.token_for(Role::Driver).await;
        let app = test_app!(backend).await;

        let request = actix_test::TestRequest::post()
            .uri("/api/messages")
            .insert_header(bearer(&token))
            .set_json(json!({ "receiver_id": uuid::Uuid::new_v4(), "content": "anyone?" }))
            .to_request();
        let response = actix_test::call_service(&app, request).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
