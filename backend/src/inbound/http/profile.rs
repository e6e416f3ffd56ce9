//! Competence and availability profile handlers.
//!
//! Every resource is reachable twice: under `/profile/...` for the caller's
//! own profile and under `/users/{id}/...` for an explicit owner. Both
//! resolve the owner the same way (explicit id wins, else the token) and
//! leave the access decision to the services.
//!
//! ```text
//! GET /api/v1/profile/competences
//! PUT /api/v1/users/{id}/availability [{"fromDate":"2026-06-01","toDate":"2026-08-31"}]
//! ```

use actix_web::{get, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::{AvailabilityWindow, Caller, Competence, UserId, resolve_owner};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::MaybeCaller;
use crate::inbound::http::schemas::{AvailabilityWindowSchema, CompetenceSchema, ErrorSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{availability_error, competence_error};

/// One competence entry in a `PUT` body.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompetenceRequest {
    #[schema(example = 1)]
    pub competence_type_id: i32,
    #[schema(example = 3.5)]
    pub years_of_experience: f64,
}

/// One availability window in a `PUT` body. `id` is echoed back from a
/// previous read and ignored for matching, which is by dates.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRequest {
    #[serde(default)]
    pub id: Option<i64>,
    #[schema(example = "2026-06-01", format = Date)]
    pub from_date: String,
    #[schema(example = "2026-08-31", format = Date)]
    pub to_date: String,
}

fn parse_competences(items: &[CompetenceRequest]) -> ApiResult<Vec<Competence>> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            Competence::try_new(item.competence_type_id, item.years_of_experience)
                .map_err(|err| competence_error(index, &err))
        })
        .collect()
}

fn parse_availability(items: &[AvailabilityRequest]) -> ApiResult<Vec<AvailabilityWindow>> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            AvailabilityWindow::parse(item.id, &item.from_date, &item.to_date)
                .map_err(|err| availability_error(index, &err))
        })
        .collect()
}

fn owner_and_caller(caller: MaybeCaller, param: Option<&str>) -> (Option<Caller>, Option<UserId>) {
    let caller = caller.into_inner();
    let owner = resolve_owner(param, caller.as_ref());
    (caller, owner)
}

async fn read_competences(
    state: &HttpState,
    caller: MaybeCaller,
    param: Option<&str>,
) -> ApiResult<web::Json<Vec<Competence>>> {
    let (caller, owner) = owner_and_caller(caller, param);
    Ok(web::Json(state.profile_query.competences(caller, owner).await?))
}

async fn write_competences(
    state: &HttpState,
    caller: MaybeCaller,
    param: Option<&str>,
    body: &[CompetenceRequest],
) -> ApiResult<web::Json<Vec<Competence>>> {
    let desired = parse_competences(body)?;
    let (caller, owner) = owner_and_caller(caller, param);
    Ok(web::Json(
        state.profile.save_competences(caller, owner, desired).await?,
    ))
}

async fn read_availability(
    state: &HttpState,
    caller: MaybeCaller,
    param: Option<&str>,
) -> ApiResult<web::Json<Vec<AvailabilityWindow>>> {
    let (caller, owner) = owner_and_caller(caller, param);
    Ok(web::Json(state.profile_query.availability(caller, owner).await?))
}

async fn write_availability(
    state: &HttpState,
    caller: MaybeCaller,
    param: Option<&str>,
    body: &[AvailabilityRequest],
) -> ApiResult<web::Json<Vec<AvailabilityWindow>>> {
    let desired = parse_availability(body)?;
    let (caller, owner) = owner_and_caller(caller, param);
    Ok(web::Json(
        state.profile.save_availability(caller, owner, desired).await?,
    ))
}

/// List the caller's competences.
#[utoipa::path(
    get,
    path = "/api/v1/profile/competences",
    responses(
        (status = 200, description = "Competences", body = [CompetenceSchema]),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["profile"],
    operation_id = "getOwnCompetences"
)]
#[get("/profile/competences")]
pub async fn get_own_competences(
    state: web::Data<HttpState>,
    caller: MaybeCaller,
) -> ApiResult<web::Json<Vec<Competence>>> {
    read_competences(&state, caller, None).await
}

/// Replace the caller's competences with the submitted set.
///
/// Entries missing from the body are deleted, new ones inserted and changed
/// ones updated, all in one transaction.
#[utoipa::path(
    put,
    path = "/api/v1/profile/competences",
    request_body = [CompetenceRequest],
    responses(
        (status = 200, description = "Stored competences", body = [CompetenceSchema]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["profile"],
    operation_id = "putOwnCompetences"
)]
#[put("/profile/competences")]
pub async fn put_own_competences(
    state: web::Data<HttpState>,
    caller: MaybeCaller,
    body: web::Json<Vec<CompetenceRequest>>,
) -> ApiResult<web::Json<Vec<Competence>>> {
    write_competences(&state, caller, None, &body).await
}

/// List a user's competences.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/competences",
    params(("id" = String, Path, description = "Owner identifier")),
    responses(
        (status = 200, description = "Competences", body = [CompetenceSchema]),
        (status = 400, description = "Invalid owner", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["profile"],
    operation_id = "getUserCompetences"
)]
#[get("/users/{id}/competences")]
pub async fn get_user_competences(
    state: web::Data<HttpState>,
    caller: MaybeCaller,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<Competence>>> {
    read_competences(&state, caller, Some(path.as_str())).await
}

/// Replace a user's competences with the submitted set.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}/competences",
    params(("id" = String, Path, description = "Owner identifier")),
    request_body = [CompetenceRequest],
    responses(
        (status = 200, description = "Stored competences", body = [CompetenceSchema]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["profile"],
    operation_id = "putUserCompetences"
)]
#[put("/users/{id}/competences")]
pub async fn put_user_competences(
    state: web::Data<HttpState>,
    caller: MaybeCaller,
    path: web::Path<String>,
    body: web::Json<Vec<CompetenceRequest>>,
) -> ApiResult<web::Json<Vec<Competence>>> {
    write_competences(&state, caller, Some(path.as_str()), &body).await
}

/// List the caller's availability windows.
#[utoipa::path(
    get,
    path = "/api/v1/profile/availability",
    responses(
        (status = 200, description = "Availability", body = [AvailabilityWindowSchema]),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["profile"],
    operation_id = "getOwnAvailability"
)]
#[get("/profile/availability")]
pub async fn get_own_availability(
    state: web::Data<HttpState>,
    caller: MaybeCaller,
) -> ApiResult<web::Json<Vec<AvailabilityWindow>>> {
    read_availability(&state, caller, None).await
}

/// Replace the caller's availability windows with the submitted set.
#[utoipa::path(
    put,
    path = "/api/v1/profile/availability",
    request_body = [AvailabilityRequest],
    responses(
        (status = 200, description = "Stored availability", body = [AvailabilityWindowSchema]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["profile"],
    operation_id = "putOwnAvailability"
)]
#[put("/profile/availability")]
pub async fn put_own_availability(
    state: web::Data<HttpState>,
    caller: MaybeCaller,
    body: web::Json<Vec<AvailabilityRequest>>,
) -> ApiResult<web::Json<Vec<AvailabilityWindow>>> {
    write_availability(&state, caller, None, &body).await
}

/// List a user's availability windows.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}/availability",
    params(("id" = String, Path, description = "Owner identifier")),
    responses(
        (status = 200, description = "Availability", body = [AvailabilityWindowSchema]),
        (status = 400, description = "Invalid owner", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["profile"],
    operation_id = "getUserAvailability"
)]
#[get("/users/{id}/availability")]
pub async fn get_user_availability(
    state: web::Data<HttpState>,
    caller: MaybeCaller,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<AvailabilityWindow>>> {
    read_availability(&state, caller, Some(path.as_str())).await
}

/// Replace a user's availability windows with the submitted set.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}/availability",
    params(("id" = String, Path, description = "Owner identifier")),
    request_body = [AvailabilityRequest],
    responses(
        (status = 200, description = "Stored availability", body = [AvailabilityWindowSchema]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["profile"],
    operation_id = "putUserAvailability"
)]
#[put("/users/{id}/availability")]
pub async fn put_user_availability(
    state: web::Data<HttpState>,
    caller: MaybeCaller,
    path: web::Path<String>,
    body: web::Json<Vec<AvailabilityRequest>>,
) -> ApiResult<web::Json<Vec<AvailabilityWindow>>> {
    write_availability(&state, caller, Some(path.as_str()), &body).await
}
