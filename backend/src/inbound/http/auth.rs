//! Bearer token extraction for HTTP handlers.
//!
//! Handlers receive a typed [`MaybeCaller`] instead of reading headers. A
//! missing `Authorization` header yields an anonymous caller and leaves the
//! decision to the authorization gate; a header that is present but does
//! not carry a valid access token is rejected with `401` straight away.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};
use tracing::warn;

use crate::domain::{Caller, Error, TokenError, TokenKind};

use super::state::HttpState;

const BEARER_PREFIX: &str = "Bearer ";

/// Verified caller, if the request carried an access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaybeCaller(pub Option<Caller>);

impl MaybeCaller {
    pub fn into_inner(self) -> Option<Caller> {
        self.0
    }
}

fn bearer_token(req: &HttpRequest) -> Result<Option<&str>, Error> {
    let Some(value) = req.headers().get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|_| Error::from(TokenError::Malformed))?;
    value
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(Some)
        .ok_or_else(|| Error::from(TokenError::Malformed))
}

fn caller_from_request(req: &HttpRequest) -> Result<MaybeCaller, Error> {
    let Some(token) = bearer_token(req)? else {
        return Ok(MaybeCaller(None));
    };
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("HTTP state is not configured"))?;
    match state.tokens.verify(token, TokenKind::Access) {
        Ok(claims) => Ok(MaybeCaller(Some(Caller::from(&claims)))),
        Err(reason) => {
            warn!(%reason, path = %req.path(), "rejected bearer token");
            Err(reason.into())
        }
    }
}

impl FromRequest for MaybeCaller {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(caller_from_request(req))
    }
}
