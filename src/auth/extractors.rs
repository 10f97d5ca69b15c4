use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::error::AppError;
use crate::models::User;

/// The authenticated caller, as resolved by `AuthMiddleware`.
///
/// Carries the user record and the exact token string the request
/// presented. Logout revokes that specific token, so handlers need it,
/// not just the user id.
///
/// If the session is missing from request extensions (the middleware did
/// not run, or the route was wired up without it), extraction fails with
/// `AppError::Unauthorized` rather than panicking.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub token: String,
}

impl FromRequest for AuthSession {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthSession>().cloned() {
            Some(session) => ready(Ok(session)),
            None => {
                let err =
                    AppError::Unauthorized("no authenticated session on this request".to_string());
                ready(Err(err.into()))
            }
        }
    }
}
