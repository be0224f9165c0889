//! Renders every error with the request's path and method

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::InternalError,
    Error, HttpResponse, ResponseError,
};
use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;

use crate::handlers::ApiError;

/// Middleware for standardizing error responses
pub struct ErrorEnvelope;

impl<S, B> Transform<S, ServiceRequest> for ErrorEnvelope
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = ErrorEnvelopeService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ErrorEnvelopeService {
            service: Rc::new(service),
        }))
    }
}

pub struct ErrorEnvelopeService<S> {
    service: Rc<S>,
}

/// Envelope for an error raised anywhere below this middleware
fn envelope(error: &Error, path: &str, method: &str) -> HttpResponse {
    match error.as_error::<ApiError>() {
        Some(api_error) => api_error.render(path, method),
        None => {
            let status = error.as_response_error().status_code();
            let api_error = if status.is_server_error() {
                ApiError::Internal("Internal server error".to_string())
            } else {
                ApiError::BadRequest(error.to_string())
            };
            let mut response = api_error.render(path, method);
            *response.status_mut() = status;
            response
        }
    }
}

impl<S, B> Service<ServiceRequest> for ErrorEnvelopeService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // Routing needs the request uniquely owned; keep only path and method
        let service = Rc::clone(&self.service);
        let path = req.path().to_string();
        let method = req.method().to_string();

        Box::pin(async move {
            match service.call(req).await {
                Ok(response) => {
                    let rendered = response
                        .response()
                        .error()
                        .map(|error| envelope(error, &path, &method));

                    Ok(match rendered {
                        Some(replacement) => response.into_response(replacement).map_into_right_body(),
                        None => response.map_into_left_body(),
                    })
                }
                Err(error) => {
                    let replacement = envelope(&error, &path, &method);
                    Err(InternalError::from_response(error, replacement).into())
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web, App};

    async fn failing() -> Result<HttpResponse, ApiError> {
        Err(ApiError::NotFound("Organization with ID 1 not found".to_string()))
    }

    #[actix_web::test]
    async fn test_envelope_carries_request_context() {
        let app = test::init_service(
            App::new()
                .wrap(ErrorEnvelope)
                .route("/organizations/1", web::get().to(failing)),
        )
        .await;

        let req = test::TestRequest::get().uri("/organizations/1").to_request();
        let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["statusCode"], 404);
        assert_eq!(body["path"], "/organizations/1");
        assert_eq!(body["method"], "GET");
        assert_eq!(body["message"], "Organization with ID 1 not found");
    }

    #[actix_web::test]
    async fn test_path_parameters_route_through_envelope() {
        async fn echo(path: web::Path<String>) -> HttpResponse {
            HttpResponse::Ok().body(path.into_inner())
        }

        let app = test::init_service(
            App::new()
                .wrap(ErrorEnvelope)
                .route("/echo/{name}", web::get().to(echo)),
        )
        .await;

        let req = test::TestRequest::get().uri("/echo/retina").to_request();
        let body = test::call_and_read_body(&app, req).await;
        assert_eq!(body, "retina");

        let req = test::TestRequest::get().uri("/missing").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), actix_web::http::StatusCode::NOT_FOUND);
    }
}
