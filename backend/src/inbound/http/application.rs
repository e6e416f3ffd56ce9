//! Application submission and review handlers.
//!
//! `POST` creates the application on first submission and refreshes it on
//! later ones. Only admins may choose a status; a status sent by anyone else
//! is dropped by the service and logged.
//!
//! ```text
//! POST /api/v1/application
//! POST /api/v1/users/{id}/application {"status":"accepted"}
//! ```

use std::str::FromStr;

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};

use crate::domain::{Application, ApplicationStatus, resolve_owner};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::MaybeCaller;
use crate::inbound::http::schemas::{ApplicationSchema, ErrorSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::status_error;

/// Optional body for application submission.
#[derive(Debug, Default, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitApplicationRequest {
    /// Requested review status; honoured for admins only.
    #[serde(default)]
    #[schema(example = "accepted")]
    pub status: Option<String>,
}

impl SubmitApplicationRequest {
    /// Decode a submission body. An empty body is a plain submission; any
    /// other body must decode, so a mistyped status never degrades into one.
    fn from_body(body: &[u8]) -> ApiResult<Self> {
        if body.trim_ascii().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_slice(body)
            .map_err(|err| status_error(format!("invalid submission body: {err}")))
    }

    fn requested_status(&self) -> ApiResult<Option<ApplicationStatus>> {
        self.status
            .as_deref()
            .map(|raw| ApplicationStatus::from_str(raw).map_err(|err| status_error(err.to_string())))
            .transpose()
    }
}

async fn fetch(
    state: &HttpState,
    caller: MaybeCaller,
    param: Option<&str>,
) -> ApiResult<web::Json<Application>> {
    let caller = caller.into_inner();
    let owner = resolve_owner(param, caller.as_ref());
    Ok(web::Json(
        state.applications_query.fetch(caller, owner).await?,
    ))
}

async fn submit(
    state: &HttpState,
    caller: MaybeCaller,
    param: Option<&str>,
    body: &[u8],
) -> ApiResult<web::Json<Application>> {
    let requested = SubmitApplicationRequest::from_body(body)?.requested_status()?;
    let caller = caller.into_inner();
    let owner = resolve_owner(param, caller.as_ref());
    Ok(web::Json(
        state.applications.submit(caller, owner, requested).await?,
    ))
}

/// Fetch the caller's application.
#[utoipa::path(
    get,
    path = "/api/v1/application",
    responses(
        (status = 200, description = "Application", body = ApplicationSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Nothing submitted yet", body = ErrorSchema)
    ),
    tags = ["application"],
    operation_id = "getOwnApplication"
)]
#[get("/application")]
pub async fn get_own_application(
    state: web::Data<HttpState>,
    caller: MaybeCaller,
) -> ApiResult<web::Json<Application>> {
    fetch(&state, caller, None).await
}

/// Submit or refresh the caller's application.
#[utoipa::path(
    post,
    path = "/api/v1/application",
    request_body(content = SubmitApplicationRequest, description = "Optional; omit for a plain submission"),
    responses(
        (status = 200, description = "Stored application", body = ApplicationSchema),
        (status = 400, description = "Unknown status", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["application"],
    operation_id = "submitOwnApplication"
)]
#[post("/application")]
pub async fn submit_own_application(
    state: web::Data<HttpState>,
    caller: MaybeCaller,
    body: web::Bytes,
) -> ApiResult<web::Json<Application>> {
    submit(&state, caller, None, &body).await
}

/// Fetch a user's application.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/application",
    params(("id" = String, Path, description = "Owner identifier")),
    responses(
        (status = 200, description = "Application", body = ApplicationSchema),
        (status = 400, description = "Invalid owner", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Nothing submitted yet", body = ErrorSchema)
    ),
    tags = ["application"],
    operation_id = "getUserApplication"
)]
#[get("/users/{id}/application")]
pub async fn get_user_application(
    state: web::Data<HttpState>,
    caller: MaybeCaller,
    path: web::Path<String>,
) -> ApiResult<web::Json<Application>> {
    fetch(&state, caller, Some(path.as_str())).await
}

/// Submit a user's application, or set its status as an admin.
#[utoipa::path(
    post,
    path = "/api/v1/users/{id}/application",
    params(("id" = String, Path, description = "Owner identifier")),
    request_body(content = SubmitApplicationRequest, description = "Optional; omit for a plain submission"),
    responses(
        (status = 200, description = "Stored application", body = ApplicationSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["application"],
    operation_id = "submitUserApplication"
)]
#[post("/users/{id}/application")]
pub async fn submit_user_application(
    state: web::Data<HttpState>,
    caller: MaybeCaller,
    path: web::Path<String>,
    body: web::Bytes,
) -> ApiResult<web::Json<Application>> {
    submit(&state, caller, Some(path.as_str()), &body).await
}
