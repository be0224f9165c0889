//! Retina validation against an organization's enrolled employees

use actix_multipart::Multipart;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use rv_core::{Backend, DomainError, UserRole, ValidationRequest};

use crate::app::{ApiSettings, AppState};
use crate::handlers::{read_form, ApiError, ApiResult};
use crate::middleware::{CallbackKey, CurrentUser, JwtAuth};

/// Header carrying the correlation id of an asynchronous matching response
pub const MESSAGE_ID_HEADER: &str = "x-message-id";

pub fn configure<B: Backend>(cfg: &mut web::ServiceConfig, settings: &ApiSettings) {
    cfg.service(
        web::scope("/validation")
            .service(
                web::resource("/retina")
                    .wrap(JwtAuth::access().roles([
                        UserRole::SuperAdmin,
                        UserRole::OrgAdmin,
                        UserRole::Validator,
                    ]))
                    .route(web::post().to(validate_retina::<B>)),
            )
            .service(
                web::resource("/callback")
                    .wrap(CallbackKey::new(settings.callback_key.as_deref()))
                    .route(web::post().to(matching_callback::<B>)),
            ),
    );
}

#[derive(Debug, Serialize)]
struct CallbackAck {
    accepted: bool,
}

/// Handler for POST /validation/retina (multipart `file` + `organizationId`)
///
/// Waits for the matching service and always answers 200 with a
/// `{status, matchingEmployeeId?, similarity?, message?}` body, except for
/// access violations and unexpected failures.
pub async fn validate_retina<B: Backend>(
    state: web::Data<AppState<B>>,
    CurrentUser(actor): CurrentUser,
    payload: Multipart,
) -> ApiResult<HttpResponse> {
    let form = read_form(payload, state.settings.max_upload_size).await?;
    let organization_id = match form.field("organizationId") {
        Some(raw) => Some(Uuid::parse_str(raw).map_err(|_| {
            ApiError::Validation(vec!["organizationId: must be a UUID".to_string()])
        })?),
        None => None,
    };

    let request = ValidationRequest {
        file: form.file,
        organization_id,
    };
    let response = state
        .services
        .validation
        .validate(&actor, request)
        .await
        .map_err(|e| match e {
            DomainError::Internal { message } => {
                tracing::error!(error = %message, "Retina validation failed");
                ApiError::Internal("Failed to validate retina image".to_string())
            }
            other => ApiError::from(other),
        })?;

    Ok(HttpResponse::Ok().json(response))
}

/// Handler for POST /validation/callback
///
/// Delivers an asynchronous matching response to the request waiting for it.
pub async fn matching_callback<B: Backend>(
    state: web::Data<AppState<B>>,
    req: HttpRequest,
    body: web::Json<Value>,
) -> HttpResponse {
    let header_message_id = req
        .headers()
        .get(MESSAGE_ID_HEADER)
        .and_then(|value| value.to_str().ok());

    let accepted = state
        .services
        .validation
        .receive_response(header_message_id, &body)
        .await;

    HttpResponse::Accepted().json(CallbackAck { accepted })
}
