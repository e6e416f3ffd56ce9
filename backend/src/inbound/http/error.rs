//! Rendering of domain errors as HTTP responses.
//!
//! Every failure leaves the API as the same JSON envelope (`code`, `message`,
//! optional `details`, optional `traceId`). Internal errors are collapsed to a
//! generic message before serialisation so repository and hashing failures
//! never reach applicants. Authentication failures carry a bearer challenge
//! as described in RFC 6750.

use actix_web::http::header::WWW_AUTHENTICATE;
use actix_web::{HttpResponse, HttpResponseBuilder, ResponseError, http::StatusCode};
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

pub use crate::domain::ApiResult;

/// Realm advertised in bearer challenges.
pub(crate) const BEARER_REALM: &str = "recruitment";

const INTERNAL_MESSAGE: &str = "Internal server error";

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self.code() {
            ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        challenge(&mut builder, self.code());
        builder.json(public_view(self))
    }
}

/// Attach a `WWW-Authenticate` header for 401 and 403 responses.
fn challenge(builder: &mut HttpResponseBuilder, code: ErrorCode) {
    let value = match code {
        ErrorCode::Unauthorized => format!(r#"Bearer realm="{BEARER_REALM}""#),
        ErrorCode::Forbidden => {
            format!(r#"Bearer realm="{BEARER_REALM}", error="insufficient_scope""#)
        }
        _ => return,
    };
    builder.insert_header((WWW_AUTHENTICATE, value));
}

/// The error as clients may see it; internal failures keep only the trace id.
fn public_view(error: &Error) -> Error {
    if error.code() != ErrorCode::InternalError {
        return error.clone();
    }
    match error.trace_id() {
        Some(id) => Error::internal(INTERNAL_MESSAGE).with_trace_id(id.to_owned()),
        None => Error::internal(INTERNAL_MESSAGE),
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "framework error surfaced as internal failure");
        Error::internal(INTERNAL_MESSAGE)
    }
}

#[cfg(test)]
mod tests;
