//! Organizations, their members and their employees
//!
//! Roles are checked per route: structural changes are reserved to super
//! admins, member and employee management is open to organization admins
//! of the organization concerned.

use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use rv_core::{Backend, UserRole};
use rv_shared::types::MessageResponse;

use crate::app::AppState;
use crate::dto::{
    AddOrganizationUserRequest, CreateEmployeeRequest, CreateOrganizationRequest,
    OrganizationListResponse, OrganizationUsersResponse, PaginationQuery, UpdateEmployeeRequest,
    UpdateOrganizationRequest, UpdateOrganizationUserRequest,
};
use crate::handlers::ApiResult;
use crate::middleware::{CurrentUser, JwtAuth};

fn super_admin() -> JwtAuth {
    JwtAuth::access().roles([UserRole::SuperAdmin])
}

fn admins() -> JwtAuth {
    JwtAuth::access().roles([UserRole::SuperAdmin, UserRole::OrgAdmin])
}

pub fn configure<B: Backend>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/organizations")
            .service(
                web::resource("")
                    .route(web::post().to(create_organization::<B>).wrap(super_admin()))
                    .route(web::get().to(list_organizations::<B>).wrap(super_admin())),
            )
            .service(
                web::resource("/employees/{employee_id}")
                    .wrap(admins())
                    .route(web::get().to(get_employee::<B>))
                    .route(web::patch().to(update_employee::<B>))
                    .route(web::delete().to(delete_employee::<B>)),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_organization::<B>).wrap(admins()))
                    .route(web::put().to(update_organization::<B>).wrap(super_admin()))
                    .route(web::delete().to(delete_organization::<B>).wrap(super_admin())),
            )
            .service(
                web::resource("/{id}/users")
                    .wrap(admins())
                    .route(web::get().to(list_organization_users::<B>))
                    .route(web::post().to(add_organization_user::<B>)),
            )
            .service(
                web::resource("/{id}/users/{user_id}")
                    .wrap(admins())
                    .route(web::put().to(update_organization_user::<B>))
                    .route(web::delete().to(remove_organization_user::<B>)),
            )
            .service(
                web::resource("/{id}/employees")
                    .wrap(admins())
                    .route(web::post().to(create_employee::<B>))
                    .route(web::get().to(list_employees::<B>)),
            ),
    );
}

/// Handler for POST /organizations
pub async fn create_organization<B: Backend>(
    state: web::Data<AppState<B>>,
    request: web::Json<CreateOrganizationRequest>,
) -> ApiResult<HttpResponse> {
    request.validate()?;
    let organization = state
        .services
        .organizations
        .create(request.into_inner().name)
        .await?;
    Ok(HttpResponse::Created().json(organization))
}

/// Handler for GET /organizations?page=&limit=
///
/// Each organization carries `_count` with its users and employees.
pub async fn list_organizations<B: Backend>(
    state: web::Data<AppState<B>>,
    query: web::Query<PaginationQuery>,
) -> ApiResult<HttpResponse> {
    query.validate()?;
    let (organizations, meta) = state
        .services
        .organizations
        .list(query.pagination())
        .await?;
    Ok(HttpResponse::Ok().json(OrganizationListResponse { organizations, meta }))
}

pub async fn get_organization<B: Backend>(
    state: web::Data<AppState<B>>,
    CurrentUser(actor): CurrentUser,
    id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let organization = state
        .services
        .organizations
        .get(&actor, id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(organization))
}

pub async fn update_organization<B: Backend>(
    state: web::Data<AppState<B>>,
    id: web::Path<Uuid>,
    request: web::Json<UpdateOrganizationRequest>,
) -> ApiResult<HttpResponse> {
    request.validate()?;
    let organization = state
        .services
        .organizations
        .update(id.into_inner(), request.into_inner().name)
        .await?;
    Ok(HttpResponse::Ok().json(organization))
}

/// Handler for DELETE /organizations/{id}; employees and their retinas go with it
pub async fn delete_organization<B: Backend>(
    state: web::Data<AppState<B>>,
    id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let organization = state
        .services
        .organizations
        .delete(id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(organization))
}

pub async fn list_organization_users<B: Backend>(
    state: web::Data<AppState<B>>,
    CurrentUser(actor): CurrentUser,
    id: web::Path<Uuid>,
    query: web::Query<PaginationQuery>,
) -> ApiResult<HttpResponse> {
    query.validate()?;
    let (users, total) = state
        .services
        .organizations
        .list_users(&actor, id.into_inner(), query.pagination())
        .await?;
    Ok(HttpResponse::Ok().json(OrganizationUsersResponse { users, total }))
}

/// Handler for POST /organizations/{id}/users; answers with the organization
pub async fn add_organization_user<B: Backend>(
    state: web::Data<AppState<B>>,
    CurrentUser(actor): CurrentUser,
    id: web::Path<Uuid>,
    request: web::Json<AddOrganizationUserRequest>,
) -> ApiResult<HttpResponse> {
    request.validate()?;
    let organization = state
        .services
        .organizations
        .add_user(&actor, id.into_inner(), request.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(organization))
}

pub async fn update_organization_user<B: Backend>(
    state: web::Data<AppState<B>>,
    CurrentUser(actor): CurrentUser,
    path: web::Path<(Uuid, Uuid)>,
    request: web::Json<UpdateOrganizationUserRequest>,
) -> ApiResult<HttpResponse> {
    request.validate()?;
    let (id, user_id) = path.into_inner();
    let user = state
        .services
        .organizations
        .update_user(&actor, id, user_id, request.into_inner().into())
        .await?;
    Ok(HttpResponse::Ok().json(user))
}

pub async fn remove_organization_user<B: Backend>(
    state: web::Data<AppState<B>>,
    CurrentUser(actor): CurrentUser,
    path: web::Path<(Uuid, Uuid)>,
) -> ApiResult<HttpResponse> {
    let (id, user_id) = path.into_inner();
    state
        .services
        .organizations
        .remove_user(&actor, id, user_id)
        .await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("User removed from organization")))
}

pub async fn create_employee<B: Backend>(
    state: web::Data<AppState<B>>,
    CurrentUser(actor): CurrentUser,
    id: web::Path<Uuid>,
    request: web::Json<CreateEmployeeRequest>,
) -> ApiResult<HttpResponse> {
    request.validate()?;
    let employee = state
        .services
        .organizations
        .create_employee(&actor, id.into_inner(), request.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(employee))
}

pub async fn list_employees<B: Backend>(
    state: web::Data<AppState<B>>,
    CurrentUser(actor): CurrentUser,
    id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let employees = state
        .services
        .organizations
        .list_employees(&actor, id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(employees))
}

pub async fn get_employee<B: Backend>(
    state: web::Data<AppState<B>>,
    CurrentUser(actor): CurrentUser,
    employee_id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let employee = state
        .services
        .organizations
        .get_employee(&actor, employee_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(employee))
}

pub async fn update_employee<B: Backend>(
    state: web::Data<AppState<B>>,
    CurrentUser(actor): CurrentUser,
    employee_id: web::Path<Uuid>,
    request: web::Json<UpdateEmployeeRequest>,
) -> ApiResult<HttpResponse> {
    request.validate()?;
    let employee = state
        .services
        .organizations
        .update_employee(&actor, employee_id.into_inner(), request.into_inner().into())
        .await?;
    Ok(HttpResponse::Ok().json(employee))
}

pub async fn delete_employee<B: Backend>(
    state: web::Data<AppState<B>>,
    CurrentUser(actor): CurrentUser,
    employee_id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let employee = state
        .services
        .organizations
        .delete_employee(&actor, employee_id.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(employee))
}
