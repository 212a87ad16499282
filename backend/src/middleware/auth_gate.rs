//! Two-stage authentication gate for protected scopes.
//!
//! [`RequireSession`] verifies the `auth_token` cookie and stores the
//! resulting [`Principal`] in the request extensions. [`RequireRole`] then
//! admits only principals holding the scope's role. Handlers read the
//! identity through the [`AuthenticatedPrincipal`] extractor.
//!
//! Actix applies the most recently registered `wrap` first, so scopes wire the
//! stages as `.wrap(RequireRole::new(role)).wrap(RequireSession::new(tokens))`.
//! Neither stage touches storage; trust rests on the token alone.

use std::sync::Arc;
use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{FromRequest, HttpMessage, HttpRequest, ResponseError};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::debug;

use crate::domain::{Error, Principal, Role, TokenService};
use crate::inbound::http::session::token_from_request;

/// Message returned for every authentication failure.
const UNAUTHENTICATED: &str = "authentication required";

fn authenticate(tokens: &TokenService, req: &HttpRequest) -> Result<Principal, Error> {
    let Some(token) = token_from_request(req) else {
        debug!(path = %req.path(), "request rejected: no session cookie");
        return Err(Error::unauthorized(UNAUTHENTICATED));
    };
    tokens
        .verify(&token)
        .map(|claims| claims.principal)
        .map_err(|error| {
            debug!(path = %req.path(), %error, "request rejected: session token refused");
            Error::unauthorized(UNAUTHENTICATED)
        })
}

fn authorise(principal: Option<Principal>, required: Role) -> Result<Principal, Error> {
    match principal {
        Some(principal) if principal.has_role(required) => Ok(principal),
        Some(principal) => {
            debug!(
                user_id = principal.user_id().get(),
                role = principal.role().as_str(),
                required = required.as_str(),
                "request rejected: role mismatch"
            );
            Err(Error::forbidden("insufficient role for this resource"))
        }
        None => Err(Error::forbidden("insufficient role for this resource")),
    }
}

fn reject<B>(req: ServiceRequest, error: &Error) -> ServiceResponse<EitherBody<B>> {
    req.into_response(error.error_response())
        .map_into_right_body()
}

/// Stage one: require a valid session token.
///
/// # Examples
/// ```no_run
/// use std::sync::Arc;
///
/// use actix_web::{App, web};
/// use backend::domain::{SigningKey, TokenService};
/// use backend::middleware::RequireSession;
/// use mockable::DefaultClock;
///
/// let key = SigningKey::new(vec![7; 32]);
/// let tokens = Arc::new(TokenService::new(&key, Arc::new(DefaultClock)));
/// let _app = App::new().service(web::scope("/api/doctor").wrap(RequireSession::new(tokens)));
/// ```
#[derive(Clone)]
pub struct RequireSession {
    tokens: Arc<TokenService>,
}

impl RequireSession {
    /// Gate requests on tokens verified by `tokens`.
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self { tokens }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireSession
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = RequireSessionMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireSessionMiddleware {
            service,
            tokens: self.tokens.clone(),
        }))
    }
}

/// Service wrapper produced by [`RequireSession`].
pub struct RequireSessionMiddleware<S> {
    service: S,
    tokens: Arc<TokenService>,
}

impl<S, B> Service<ServiceRequest> for RequireSessionMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        match authenticate(&self.tokens, req.request()) {
            Ok(principal) => {
                req.extensions_mut().insert(principal);
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(error) => Box::pin(ready(Ok(reject(req, &error)))),
        }
    }
}

/// Stage two: require the principal to hold a specific role.
#[derive(Clone, Copy)]
pub struct RequireRole {
    role: Role,
}

impl RequireRole {
    /// Admit only principals holding `role`.
    pub const fn new(role: Role) -> Self {
        Self { role }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireRole
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = RequireRoleMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireRoleMiddleware {
            service,
            role: self.role,
        }))
    }
}

/// Service wrapper produced by [`RequireRole`].
pub struct RequireRoleMiddleware<S> {
    service: S,
    role: Role,
}

impl<S, B> Service<ServiceRequest> for RequireRoleMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let principal = req.extensions().get::<Principal>().copied();
        match authorise(principal, self.role) {
            Ok(_) => {
                let fut = self.service.call(req);
                Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
            }
            Err(error) => Box::pin(ready(Ok(reject(req, &error)))),
        }
    }
}

/// Extractor yielding the principal admitted by [`RequireSession`].
///
/// Fails with `401` when used on a route outside a gated scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedPrincipal(pub Principal);

impl AuthenticatedPrincipal {
    /// The admitted principal.
    pub fn principal(&self) -> Principal {
        self.0
    }
}

impl FromRequest for AuthenticatedPrincipal {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<Principal>()
                .copied()
                .map(Self)
                .ok_or_else(|| Error::unauthorized(UNAUTHENTICATED)),
        )
    }
}
