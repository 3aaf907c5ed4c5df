//! Admin console and dashboard handlers.
//!
//! ```text
//! GET  /api/admin/users
//! GET  /api/admin/reports
//! GET  /api/admin/disputes?status=open
//! GET  /api/admin/commission
//! POST /api/admin/commission {"name":"Standard","percentage":5}
//! POST /api/admin/users/{id}/verify-document {"doc_id":".."}
//! POST /api/admin/users/{id}/suspend {"suspended":true}
//! GET  /api/admin/dashboard/stats
//! ```
//!
//! Every route except the dashboard requires the admin role.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{
    CommissionRule, CommissionView, DashboardStats, DisputeWithParties, Error, PlatformReport,
    User,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::CurrentUser;
use crate::inbound::http::disputes::DisputeQuery;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_required_uuid, parse_uuid, required};

/// Body for `POST /api/admin/commission`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct CommissionRequest {
    /// Defaults to "Platform Commission".
    pub name: Option<String>,
    #[schema(example = 5.0)]
    pub percentage: Option<f64>,
}

/// Body for `POST /api/admin/users/{id}/verify-document`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct VerifyDocumentRequest {
    pub doc_id: Option<String>,
}

/// Body for `POST /api/admin/users/{id}/suspend`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct SuspendRequest {
    /// `false` reactivates the account.
    pub suspended: Option<bool>,
}

/// Response for account status changes.
#[derive(Debug, Serialize, ToSchema)]
pub struct SuspendResponse {
    pub ok: bool,
    pub message: String,
}

/// Every account, newest first.
#[utoipa::path(
    get,
    path = "/api/admin/users",
    responses(
        (status = 200, description = "Users", body = [User]),
        (status = 403, description = "Caller is not an admin", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminListUsers"
)]
#[get("/admin/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    user: CurrentUser,
) -> ApiResult<web::Json<Vec<User>>> {
    Ok(web::Json(state.admin.list_users(&user).await?))
}

/// Platform-wide counters.
#[utoipa::path(
    get,
    path = "/api/admin/reports",
    responses(
        (status = 200, description = "Report", body = PlatformReport),
        (status = 403, description = "Caller is not an admin", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminReports"
)]
#[get("/admin/reports")]
pub async fn reports(
    state: web::Data<HttpState>,
    user: CurrentUser,
) -> ApiResult<web::Json<PlatformReport>> {
    Ok(web::Json(state.admin.reports(&user).await?))
}

/// Disputes with both parties' emails.
#[utoipa::path(
    get,
    path = "/api/admin/disputes",
    params(DisputeQuery),
    responses(
        (status = 200, description = "Disputes", body = [DisputeWithParties]),
        (status = 400, description = "Unknown status", body = Error),
        (status = 403, description = "Caller is not an admin", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminDisputes"
)]
#[get("/admin/disputes")]
pub async fn disputes(
    state: web::Data<HttpState>,
    user: CurrentUser,
    query: web::Query<DisputeQuery>,
) -> ApiResult<web::Json<Vec<DisputeWithParties>>> {
    let status = query.into_inner().status()?;
    Ok(web::Json(state.admin.disputes(&user, status).await?))
}

/// The active commission rule, or a zero default.
#[utoipa::path(
    get,
    path = "/api/admin/commission",
    responses(
        (status = 200, description = "Commission", body = CommissionView),
        (status = 403, description = "Caller is not an admin", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminCommission"
)]
#[get("/admin/commission")]
pub async fn commission(
    state: web::Data<HttpState>,
    user: CurrentUser,
) -> ApiResult<web::Json<CommissionView>> {
    Ok(web::Json(state.admin.commission(&user).await?))
}

/// Replace the active commission rule.
#[utoipa::path(
    post,
    path = "/api/admin/commission",
    request_body = CommissionRequest,
    responses(
        (status = 201, description = "Rule created", body = CommissionRule),
        (status = 400, description = "Percentage missing or out of range", body = Error),
        (status = 403, description = "Caller is not an admin", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminSetCommission"
)]
#[post("/admin/commission")]
pub async fn set_commission(
    state: web::Data<HttpState>,
    user: CurrentUser,
    payload: web::Json<CommissionRequest>,
) -> ApiResult<HttpResponse> {
    let CommissionRequest { name, percentage } = payload.into_inner();
    let percentage = required(percentage, FieldName::new("percentage"))?;
    let name = name.filter(|name| !name.trim().is_empty());
    let rule = state.admin.set_commission(&user, name, percentage).await?;
    Ok(HttpResponse::Created().json(rule))
}

/// Mark a document verified. The user id in the path is not checked
/// against the document's owner.
#[utoipa::path(
    post,
    path = "/api/admin/users/{id}/verify-document",
    params(("id" = String, Path, description = "User id")),
    request_body = VerifyDocumentRequest,
    responses(
        (status = 200, description = "Document verified"),
        (status = 400, description = "doc_id missing", body = Error),
        (status = 403, description = "Caller is not an admin", body = Error),
        (status = 404, description = "Document not found", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminVerifyDocument"
)]
#[post("/admin/users/{id}/verify-document")]
pub async fn verify_document(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<String>,
    payload: web::Json<VerifyDocumentRequest>,
) -> ApiResult<HttpResponse> {
    parse_uuid(path.into_inner(), FieldName::new("id"))?;
    let document_id =
        parse_required_uuid(payload.into_inner().doc_id, FieldName::new("doc_id"))?;
    state.admin.verify_document(&user, document_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "ok": true })))
}

/// Suspend or reactivate an account.
#[utoipa::path(
    post,
    path = "/api/admin/users/{id}/suspend",
    params(("id" = String, Path, description = "User id")),
    request_body = SuspendRequest,
    responses(
        (status = 200, description = "Status changed", body = SuspendResponse),
        (status = 400, description = "suspended missing", body = Error),
        (status = 403, description = "Caller is not an admin", body = Error),
        (status = 404, description = "User not found", body = Error)
    ),
    tags = ["admin"],
    operation_id = "adminSuspendUser"
)]
#[post("/admin/users/{id}/suspend")]
pub async fn suspend_user(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<String>,
    payload: web::Json<SuspendRequest>,
) -> ApiResult<web::Json<SuspendResponse>> {
    let user_id = parse_uuid(path.into_inner(), FieldName::new("id"))?;
    let suspended = required(payload.into_inner().suspended, FieldName::new("suspended"))?;
    let message = state.admin.suspend_user(&user, user_id, suspended).await?;
    Ok(web::Json(SuspendResponse {
        ok: true,
        message: message.to_owned(),
    }))
}

/// Role-specific counters for the caller. Admins get an empty object.
#[utoipa::path(
    get,
    path = "/api/admin/dashboard/stats",
    responses(
        (status = 200, description = "Dashboard counters", body = DashboardStats),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["admin"],
    operation_id = "dashboardStats"
)]
#[get("/admin/dashboard/stats")]
pub async fn dashboard_stats(
    state: web::Data<HttpState>,
    user: CurrentUser,
) -> ApiResult<web::Json<DashboardStats>> {
    Ok(web::Json(state.admin.dashboard_stats(&user).await?))
}

#[cfg(test)]
mod tests;
