use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::errors::AppError;

/// Header set by the upstream session layer once it has authenticated the
/// browser session. This service trusts it as the member identity.
pub const MEMBER_ID_HEADER: &str = "x-member-id";

/// Authenticated member identity, required by every order and point
/// endpoint. Missing or malformed header means no session: 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberId(pub Uuid);

impl FromRequest for MemberId {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let parsed = req
            .headers()
            .get(MEMBER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| Uuid::parse_str(s).ok());

        ready(match parsed {
            Some(id) => Ok(MemberId(id)),
            None => Err(AppError(DomainError::Unauthenticated)),
        })
    }
}
