//! JWT authentication middleware for protecting API endpoints.
//!
//! Two modes exist:
//! 1. Access mode: verifies an access token (Bearer header, falling back to
//!    the `token` query parameter), loads the user and optionally checks its role
//! 2. Refresh mode: verifies a refresh token from the Bearer header and
//!    attaches the raw token together with the user id

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    web, Error, FromRequest, HttpMessage, HttpRequest,
};
use async_trait::async_trait;
use futures_util::future::LocalBoxFuture;
use std::{
    collections::HashMap,
    future::{ready, Ready},
    rc::Rc,
    task::{Context, Poll},
};
use uuid::Uuid;

use rv_core::{
    domain::entities::user::{User, UserRole},
    errors::{AuthError, DomainError},
    repositories::{TokenRepository, UserRepository},
    services::AuthService,
};

use crate::handlers::ApiError;

/// Authenticated user attached to the request by access mode
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Verified refresh token attached to the request by refresh mode
#[derive(Debug, Clone)]
pub struct RefreshContext {
    pub user_id: Uuid,
    pub refresh_token: String,
}

/// Token verification as seen by the middleware
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Verify an access token and load its user
    async fn authenticate(&self, access_token: &str) -> Result<User, DomainError>;

    /// Verify a refresh token and return the user id it was issued to
    fn authenticate_refresh(&self, refresh_token: &str) -> Result<Uuid, DomainError>;
}

#[async_trait]
impl<U, T> Authenticator for AuthService<U, T>
where
    U: UserRepository + 'static,
    T: TokenRepository + 'static,
{
    async fn authenticate(&self, access_token: &str) -> Result<User, DomainError> {
        AuthService::authenticate(self, access_token).await
    }

    fn authenticate_refresh(&self, refresh_token: &str) -> Result<Uuid, DomainError> {
        AuthService::authenticate_refresh(self, refresh_token)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    Access,
    Refresh,
}

/// JWT authentication middleware factory
#[derive(Debug, Clone)]
pub struct JwtAuth {
    kind: TokenKind,
    /// Roles admitted; empty admits every authenticated user
    roles: Rc<[UserRole]>,
}

impl JwtAuth {
    /// Access token guard admitting any authenticated user
    pub fn access() -> Self {
        Self {
            kind: TokenKind::Access,
            roles: Rc::from(Vec::new()),
        }
    }

    /// Refresh token guard
    pub fn refresh() -> Self {
        Self {
            kind: TokenKind::Refresh,
            roles: Rc::from(Vec::new()),
        }
    }

    /// Restrict an access guard to the given roles
    pub fn roles(mut self, roles: impl IntoIterator<Item = UserRole>) -> Self {
        self.roles = roles.into_iter().collect::<Vec<_>>().into();
        self
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
            kind: self.kind,
            roles: Rc::clone(&self.roles),
        }))
    }
}

/// JWT authentication middleware service
pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
    kind: TokenKind,
    roles: Rc<[UserRole]>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let kind = self.kind;
        let roles = Rc::clone(&self.roles);

        Box::pin(async move {
            // Rejections are answered as responses, not `Err`
            if let Err(error) = authorize(&req, kind, &roles).await {
                return Ok(req.error_response(error).map_into_right_body());
            }

            service.call(req).await.map(ServiceResponse::map_into_left_body)
        })
    }
}

/// Verify the request's token and attach what it proves
async fn authorize(req: &ServiceRequest, kind: TokenKind, roles: &[UserRole]) -> Result<(), ApiError> {
    let authenticator = req
        .app_data::<web::Data<dyn Authenticator>>()
        .cloned()
        .ok_or_else(|| ApiError::Internal("Authentication is not configured".to_string()))?;

    match kind {
        TokenKind::Access => {
            let token = extract_bearer_token(req)
                .or_else(|| extract_query_token(req))
                .ok_or_else(unauthorized)?;
            let user = authenticator.authenticate(&token).await.map_err(|e| {
                tracing::debug!(error = %e, "Access token rejected");
                auth_failure(e)
            })?;

            if !roles.is_empty() && !roles.contains(&user.role) {
                tracing::warn!(user_id = %user.id, role = %user.role, path = req.path(), "Role not permitted");
                return Err(ApiError::from(DomainError::from(AuthError::InsufficientPermissions)));
            }
            req.extensions_mut().insert(CurrentUser(user));
        }
        TokenKind::Refresh => {
            let token = extract_bearer_token(req).ok_or_else(unauthorized)?;
            let user_id = authenticator
                .authenticate_refresh(&token)
                .map_err(auth_failure)?;
            req.extensions_mut().insert(RefreshContext {
                user_id,
                refresh_token: token,
            });
        }
    }

    Ok(())
}

fn unauthorized() -> ApiError {
    ApiError::Unauthorized("Unauthorized".to_string())
}

/// Token problems read as 401; lookups that fail for other reasons keep their status
fn auth_failure(error: DomainError) -> ApiError {
    match error {
        DomainError::Token(_) => unauthorized(),
        other => ApiError::from(other),
    }
}

/// Extracts Bearer token from Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extracts the `token` query parameter
fn extract_query_token(req: &ServiceRequest) -> Option<String> {
    web::Query::<HashMap<String, String>>::from_query(req.query_string())
        .ok()?
        .get("token")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extractor for the authenticated user
impl FromRequest for CurrentUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| unauthorized().into());

        ready(result)
    }
}

/// Extractor for the verified refresh token
impl FromRequest for RefreshContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<RefreshContext>()
            .cloned()
            .ok_or_else(|| unauthorized().into());

        ready(result)
    }
}
