//! User administration, reserved to super admins

use actix_web::{web, HttpResponse};
use uuid::Uuid;
use validator::Validate;

use rv_core::{Backend, UserRole};

use crate::app::AppState;
use crate::dto::{CreateUserRequest, EmailQuery, ListUsersQuery, UpdateUserRequest, UserListResponse};
use crate::handlers::ApiResult;
use crate::middleware::JwtAuth;

pub fn configure<B: Backend>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .wrap(JwtAuth::access().roles([UserRole::SuperAdmin]))
            .service(
                web::resource("")
                    .route(web::post().to(create_user::<B>))
                    .route(web::get().to(list_users::<B>)),
            )
            // Registered before `/{id}` so it is not taken for an id
            .route("/email/find", web::get().to(find_by_email::<B>))
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_user::<B>))
                    .route(web::put().to(update_user::<B>))
                    .route(web::delete().to(delete_user::<B>)),
            ),
    );
}

/// Handler for POST /users
pub async fn create_user<B: Backend>(
    state: web::Data<AppState<B>>,
    request: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    request.validate()?;
    let user = state.services.users.create(request.into_inner().into()).await?;
    Ok(HttpResponse::Created().json(user))
}

/// Handler for GET /users?page=&limit=&role=
pub async fn list_users<B: Backend>(
    state: web::Data<AppState<B>>,
    query: web::Query<ListUsersQuery>,
) -> ApiResult<HttpResponse> {
    query.validate()?;
    let (users, meta) = state
        .services
        .users
        .list(query.pagination(), query.role)
        .await?;
    Ok(HttpResponse::Ok().json(UserListResponse { users, meta }))
}

/// Handler for GET /users/email/find?email=
pub async fn find_by_email<B: Backend>(
    state: web::Data<AppState<B>>,
    query: web::Query<EmailQuery>,
) -> ApiResult<HttpResponse> {
    query.validate()?;
    let user = state.services.users.find_by_email(&query.email).await?;
    Ok(HttpResponse::Ok().json(user))
}

pub async fn get_user<B: Backend>(
    state: web::Data<AppState<B>>,
    id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let user = state.services.users.find_by_id(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(user))
}

pub async fn update_user<B: Backend>(
    state: web::Data<AppState<B>>,
    id: web::Path<Uuid>,
    request: web::Json<UpdateUserRequest>,
) -> ApiResult<HttpResponse> {
    request.validate()?;
    let user = state
        .services
        .users
        .update(id.into_inner(), request.into_inner().into())
        .await?;
    Ok(HttpResponse::Ok().json(user))
}

/// Handler for DELETE /users/{id}; answers with the deleted user
pub async fn delete_user<B: Backend>(
    state: web::Data<AppState<B>>,
    id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let user = state.services.users.delete(id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(user))
}
