//! HTTP inbound adapter exposing REST endpoints.

pub mod application;
pub mod auth;
pub mod error;
pub mod health;
pub mod profile;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Prefix shared by every versioned endpoint.
pub const API_PREFIX: &str = "/api/v1";

/// Register every `/api/v1` endpoint.
///
/// Handlers expect `web::Data<HttpState>` in app data; health probes are
/// registered separately by the server.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use recruitment::inbound::http::configure;
///
/// let _app = App::new().configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope(API_PREFIX)
            .service(users::login)
            .service(users::refresh)
            .service(users::register)
            .service(users::reset_password)
            .service(profile::get_own_competences)
            .service(profile::put_own_competences)
            .service(profile::get_user_competences)
            .service(profile::put_user_competences)
            .service(profile::get_own_availability)
            .service(profile::put_own_availability)
            .service(profile::get_user_availability)
            .service(profile::put_user_availability)
            .service(application::get_own_application)
            .service(application::submit_own_application)
            .service(application::get_user_application)
            .service(application::submit_user_application),
    );
}
