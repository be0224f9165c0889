//! Image storage and retina enrolment

use actix_multipart::Multipart;
use actix_web::{http::header::ContentType, web, HttpResponse};
use serde::Serialize;
use uuid::Uuid;

use rv_core::{Backend, ImageProcessingResult, UserRole};
use rv_shared::types::MessageResponse;

use crate::app::{ApiSettings, AppState};
use crate::handlers::{read_form, ApiError, ApiResult};
use crate::middleware::{CallbackKey, CurrentUser, JwtAuth};

const RETINAS: &str = "/organizations/{organization_id}/employees/{employee_id}/retinas";

fn admins() -> JwtAuth {
    JwtAuth::access().roles([UserRole::SuperAdmin, UserRole::OrgAdmin])
}

pub fn configure<B: Backend>(cfg: &mut web::ServiceConfig, settings: &ApiSettings) {
    cfg.service(
        web::scope("/storage")
            .service(
                web::resource("/analysis-callback")
                    .wrap(CallbackKey::new(settings.callback_key.as_deref()))
                    .route(web::post().to(analysis_callback::<B>)),
            )
            .service(
                web::resource("/images/{name:.*}")
                    .wrap(admins())
                    .route(web::get().to(get_image::<B>)),
            )
            .service(
                web::resource("/upload")
                    .wrap(admins())
                    .route(web::post().to(upload_image::<B>)),
            )
            .service(
                web::resource(RETINAS)
                    .wrap(admins())
                    .route(web::post().to(upload_retina::<B>))
                    .route(web::get().to(list_retinas::<B>)),
            )
            .service(
                web::resource(format!("{}/{{retina_id}}", RETINAS))
                    .wrap(admins())
                    .route(web::get().to(get_retina::<B>))
                    .route(web::delete().to(delete_retina::<B>)),
            ),
    );
}

#[derive(Debug, Serialize)]
struct UploadResponse {
    url: String,
}

#[derive(Debug, Serialize)]
struct RetinaUploadResponse {
    url: String,
    id: Uuid,
}

#[derive(Debug, Serialize)]
struct AnalysisAck {
    processed: bool,
}

/// Handler for GET /storage/images/{name..}
pub async fn get_image<B: Backend>(
    state: web::Data<AppState<B>>,
    name: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let (bytes, content_type) = state.services.retinas.get_image(&name).await?;
    Ok(HttpResponse::Ok().content_type(content_type).body(bytes))
}

/// Handler for POST /storage/upload (multipart, field `file`)
pub async fn upload_image<B: Backend>(
    state: web::Data<AppState<B>>,
    payload: Multipart,
) -> ApiResult<HttpResponse> {
    let form = read_form(payload, state.settings.max_upload_size).await?;
    let file = form
        .file
        .ok_or_else(|| ApiError::BadRequest("No file uploaded".to_string()))?;

    let stored = state.services.retinas.upload_image(file).await?;
    Ok(HttpResponse::Ok().json(UploadResponse { url: stored.url }))
}

/// Handler for POST /storage/organizations/{orgId}/employees/{employeeId}/retinas
///
/// Stores the photo, records it and queues it for template extraction.
///
/// # Response
///
/// ## Success (201 Created)
/// `{ "url": "...", "id": "..." }`
///
/// ## Errors
/// - 400 Bad Request: No file uploaded
/// - 403 Forbidden: Organization of another tenant
/// - 404 Not Found: Employee not in the organization
pub async fn upload_retina<B: Backend>(
    state: web::Data<AppState<B>>,
    CurrentUser(actor): CurrentUser,
    path: web::Path<(Uuid, Uuid)>,
    payload: Multipart,
) -> ApiResult<HttpResponse> {
    let (organization_id, employee_id) = path.into_inner();
    let form = read_form(payload, state.settings.max_upload_size).await?;
    let file = form
        .file
        .ok_or_else(|| ApiError::BadRequest("No file uploaded".to_string()))?;

    let uploaded = state
        .services
        .retinas
        .upload_retina(&actor, organization_id, employee_id, file)
        .await?;

    Ok(HttpResponse::Created().json(RetinaUploadResponse {
        url: uploaded.url,
        id: uploaded.id,
    }))
}

pub async fn list_retinas<B: Backend>(
    state: web::Data<AppState<B>>,
    CurrentUser(actor): CurrentUser,
    path: web::Path<(Uuid, Uuid)>,
) -> ApiResult<HttpResponse> {
    let (organization_id, employee_id) = path.into_inner();
    let retinas = state
        .services
        .retinas
        .list_retinas(&actor, organization_id, employee_id)
        .await?;
    Ok(HttpResponse::Ok().json(retinas))
}

pub async fn get_retina<B: Backend>(
    state: web::Data<AppState<B>>,
    CurrentUser(actor): CurrentUser,
    path: web::Path<(Uuid, Uuid, Uuid)>,
) -> ApiResult<HttpResponse> {
    let (organization_id, employee_id, retina_id) = path.into_inner();
    let bytes = state
        .services
        .retinas
        .get_retina(&actor, organization_id, employee_id, retina_id)
        .await?;
    Ok(HttpResponse::Ok().content_type(ContentType::jpeg()).body(bytes))
}

pub async fn delete_retina<B: Backend>(
    state: web::Data<AppState<B>>,
    CurrentUser(actor): CurrentUser,
    path: web::Path<(Uuid, Uuid, Uuid)>,
) -> ApiResult<HttpResponse> {
    let (organization_id, employee_id, retina_id) = path.into_inner();
    state
        .services
        .retinas
        .delete_retina(&actor, organization_id, employee_id, retina_id)
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Retina photo deleted successfully")))
}

/// Handler for POST /storage/analysis-callback
///
/// Called by the analysis service once a retina template is ready.
/// Repeated deliveries answer `processed: false`.
pub async fn analysis_callback<B: Backend>(
    state: web::Data<AppState<B>>,
    result: web::Json<ImageProcessingResult>,
) -> ApiResult<HttpResponse> {
    let processed = state
        .services
        .retinas
        .apply_analysis_result(result.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(AnalysisAck { processed }))
}
