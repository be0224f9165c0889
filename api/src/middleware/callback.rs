//! Shared-key guard for endpoints called back by the matching service

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    task::{Context, Poll},
};

use rv_core::errors::{AuthError, DomainError};

use crate::handlers::ApiError;

/// Header carrying the shared callback key
pub const CALLBACK_KEY_HEADER: &str = "x-callback-key";

/// Guard factory; without a configured key every call is admitted
#[derive(Debug, Clone, Default)]
pub struct CallbackKey {
    key: Option<Rc<str>>,
}

impl CallbackKey {
    pub fn new(key: Option<&str>) -> Self {
        Self {
            key: key.filter(|k| !k.is_empty()).map(Rc::from),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for CallbackKey
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = CallbackKeyMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CallbackKeyMiddleware {
            service: Rc::new(service),
            key: self.key.clone(),
        }))
    }
}

pub struct CallbackKeyMiddleware<S> {
    service: Rc<S>,
    key: Option<Rc<str>>,
}

impl<S, B> Service<ServiceRequest> for CallbackKeyMiddleware<S>
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

        if let Some(expected) = &self.key {
            let presented = req
                .headers()
                .get(CALLBACK_KEY_HEADER)
                .and_then(|value| value.to_str().ok());

            if presented != Some(expected.as_ref()) {
                tracing::warn!(path = req.path(), "Callback rejected: bad or missing key");
                let error = ApiError::from(DomainError::from(AuthError::InvalidCallbackKey));
                return Box::pin(async move { Ok(req.error_response(error).map_into_right_body()) });
            }
        }

        Box::pin(async move { service.call(req).await.map(ServiceResponse::map_into_left_body) })
    }
}
