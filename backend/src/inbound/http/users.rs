//! Account API handlers: login, token refresh, registration and password
//! reset.
//!
//! ```text
//! POST /api/v1/auth/login {"identifier":"ada@example.com","password":"correct horse"}
//! POST /api/v1/auth/refresh {"refreshToken":"..."}
//! POST /api/v1/auth/register {"name":"Ada",...}
//! PUT /api/v1/users/{id}/password {"password":"new secret"}
//! ```

use std::fmt;

use actix_web::{HttpResponse, post, put, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::domain::{
    Error, Identity, IssuedToken, LoginCredentials, NewPassword, Registration, RegistrationInput,
    resolve_owner,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::MaybeCaller;
use crate::inbound::http::schemas::{ErrorSchema, IdentitySchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::credential_error;

/// Login request body for `POST /api/v1/auth/login`.
///
/// `identifier` may be a username, an email address or a national id; the
/// kind is detected from its shape.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "ada@example.com")]
    pub identifier: String,
    pub password: String,
}

const REDACTED: &str = "<redacted>";

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("identifier", &self.identifier)
            .field("password", &REDACTED)
            .finish()
    }
}

/// Signed token and the instant it stops being accepted.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl From<IssuedToken> for TokenResponse {
    fn from(value: IssuedToken) -> Self {
        Self {
            token: value.token,
            expires_at: value.expires_at,
        }
    }
}

/// Successful login payload.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: TokenResponse,
    pub refresh_token: TokenResponse,
    #[schema(value_type = IdentitySchema)]
    pub user: Identity,
}

/// Refresh request body for `POST /api/v1/auth/refresh`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

impl fmt::Debug for RefreshRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshRequest")
            .field("refresh_token", &REDACTED)
            .finish()
    }
}

/// Refresh response: a new access token only.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: TokenResponse,
}

/// Registration request body for `POST /api/v1/auth/register`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[schema(example = "Ada")]
    pub name: String,
    #[schema(example = "Lovelace")]
    pub surname: String,
    #[schema(example = "19901215-1234")]
    pub national_id: String,
    #[schema(example = "ada")]
    pub username: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    pub password: String,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("name", &self.name)
            .field("surname", &self.surname)
            .field("national_id", &self.national_id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &REDACTED)
            .finish()
    }
}

impl RegisterRequest {
    fn to_registration(&self) -> Result<Registration, Error> {
        Registration::try_from_input(RegistrationInput {
            name: &self.name,
            surname: &self.surname,
            national_id: &self.national_id,
            username: &self.username,
            email: &self.email,
            password: &self.password,
        })
        .map_err(|err| credential_error(&err))
    }
}

/// Password reset body for `PUT /api/v1/users/{id}/password`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetRequest {
    pub password: String,
}

impl fmt::Debug for PasswordResetRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordResetRequest")
            .field("password", &REDACTED)
            .finish()
    }
}

/// Authenticate and mint an access/refresh token pair.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 503, description = "Credential store unavailable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let credentials = LoginCredentials::try_from_parts(&payload.identifier, &payload.password)
        .map_err(|err| credential_error(&err))?;
    let outcome = state.auth.login(&credentials).await?;
    Ok(web::Json(LoginResponse {
        access_token: outcome.tokens.access.into(),
        refresh_token: outcome.tokens.refresh.into(),
        user: outcome.user,
    }))
}

/// Exchange a refresh token for a new access token.
#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New access token", body = RefreshResponse),
        (status = 401, description = "Session expired", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "refresh",
    security([])
)]
#[post("/auth/refresh")]
pub async fn refresh(
    state: web::Data<HttpState>,
    payload: web::Json<RefreshRequest>,
) -> ApiResult<web::Json<RefreshResponse>> {
    let issued = state.auth.refresh(&payload.refresh_token).await?;
    Ok(web::Json(RefreshResponse {
        access_token: issued.into(),
    }))
}

/// Register a new applicant.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Identity created", body = IdentitySchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Username, email or national id taken", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration = payload.to_registration()?;
    let identity = state.auth.register(registration).await?;
    Ok(HttpResponse::Created().json(identity))
}

/// Replace a user's password. Callers may reset their own; admins any.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}/password",
    params(("id" = String, Path, description = "User identifier")),
    request_body = PasswordResetRequest,
    responses(
        (status = 204, description = "Password replaced"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "resetPassword"
)]
#[put("/users/{id}/password")]
pub async fn reset_password(
    state: web::Data<HttpState>,
    caller: MaybeCaller,
    path: web::Path<String>,
    payload: web::Json<PasswordResetRequest>,
) -> ApiResult<HttpResponse> {
    let password = NewPassword::new(&payload.password).map_err(|err| credential_error(&err))?;
    let caller = caller.into_inner();
    let owner = resolve_owner(Some(path.as_str()), caller.as_ref());
    state.auth.reset_password(caller, owner, password).await?;
    Ok(HttpResponse::NoContent().finish())
}
