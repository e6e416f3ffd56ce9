//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! document for the REST API. It registers:
//!
//! - **Paths**: every HTTP endpoint from the inbound layer (auth, users,
//!   profile, application, health)
//! - **Schemas**: domain type wrappers ([`ErrorSchema`], [`IdentitySchema`],
//!   ...) that provide OpenAPI definitions without coupling domain types to
//!   the utoipa framework, plus the request and response bodies
//! - **Security**: bearer access token authentication scheme
//!
//! The generated document is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::application::SubmitApplicationRequest;
use crate::inbound::http::profile::{AvailabilityRequest, CompetenceRequest};
use crate::inbound::http::schemas::{
    ApplicationSchema, ApplicationStatusSchema, AvailabilityWindowSchema, CompetenceSchema,
    ErrorCodeSchema, ErrorSchema, IdentitySchema, RoleSchema,
};
use crate::inbound::http::users::{
    LoginRequest, LoginResponse, PasswordResetRequest, RefreshRequest, RefreshResponse,
    RegisterRequest, TokenResponse,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Name of the bearer security scheme referenced by protected paths.
pub const BEARER_SCHEME: &str = "BearerToken";

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "Access token issued by POST /api/v1/auth/login or /api/v1/auth/refresh.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Recruitment backend API",
        description = "HTTP interface for applicant accounts, competence profiles and applications.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::users::login,
        crate::inbound::http::users::refresh,
        crate::inbound::http::users::register,
        crate::inbound::http::users::reset_password,
        crate::inbound::http::profile::get_own_competences,
        crate::inbound::http::profile::put_own_competences,
        crate::inbound::http::profile::get_user_competences,
        crate::inbound::http::profile::put_user_competences,
        crate::inbound::http::profile::get_own_availability,
        crate::inbound::http::profile::put_own_availability,
        crate::inbound::http::profile::get_user_availability,
        crate::inbound::http::profile::put_user_availability,
        crate::inbound::http::application::get_own_application,
        crate::inbound::http::application::submit_own_application,
        crate::inbound::http::application::get_user_application,
        crate::inbound::http::application::submit_user_application,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        RoleSchema,
        IdentitySchema,
        CompetenceSchema,
        AvailabilityWindowSchema,
        ApplicationStatusSchema,
        ApplicationSchema,
        LoginRequest,
        LoginResponse,
        TokenResponse,
        RefreshRequest,
        RefreshResponse,
        RegisterRequest,
        PasswordResetRequest,
        CompetenceRequest,
        AvailabilityRequest,
        SubmitApplicationRequest,
    )),
    tags(
        (name = "auth", description = "Login, token refresh and registration"),
        (name = "users", description = "Account maintenance"),
        (name = "profile", description = "Competence and availability profiles"),
        (name = "application", description = "Job applications and their status"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
