use std::rc::Rc;

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::Method,
    web, Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use sqlx::PgPool;

use crate::auth::extractors::AuthSession;
use crate::config::Config;
use crate::error::AppError;
use crate::models::User;

/// Guard for protected routes.
///
/// Reads the token from the `x-auth` header and resolves it through the
/// credential store, which requires both a valid signature and membership
/// in the user's stored token list. On success the resolved user and the
/// exact presented token are attached to the request for extractors and
/// handlers; on any failure the request is answered 401 with an empty body
/// before it reaches a handler.
pub struct AuthMiddleware;

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    // Rc because the async body below outlives the `call` borrow.
    service: Rc<S>,
}

fn is_public(req: &ServiceRequest) -> bool {
    let path = req.path();
    (path == "/users" && req.method() == Method::POST)
        || (path == "/users/login" && req.method() == Method::POST)
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            // Signup and login are the only ways in without a token.
            if is_public(&req) {
                return service.call(req).await;
            }

            let token = req
                .headers()
                .get("x-auth")
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);

            let token = match token {
                Some(token) => token,
                None => return Err(AppError::Unauthorized("missing token".into()).into()),
            };

            let pool = req
                .app_data::<web::Data<PgPool>>()
                .cloned()
                .ok_or_else(|| {
                    AppError::InternalServerError("database pool not configured".into())
                })?;
            let config = req.app_data::<web::Data<Config>>().cloned().ok_or_else(|| {
                AppError::InternalServerError("configuration not available".into())
            })?;

            let user =
                User::find_by_token(&pool, config.jwt_secret.as_bytes(), &token).await?;

            req.extensions_mut().insert(AuthSession { user, token });
            service.call(req).await
        })
    }
}
