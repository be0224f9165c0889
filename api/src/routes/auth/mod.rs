//! Authentication route handlers
//!
//! - Registration and login
//! - Token refresh
//! - Logout (single session or every session)
//! - Current user lookup

pub mod login;
pub mod logout;
pub mod me;
pub mod refresh;
pub mod register;

use actix_web::web;

use rv_core::Backend;

use crate::middleware::JwtAuth;

pub fn configure<B: Backend>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/register", web::post().to(register::register::<B>))
            .route("/login", web::post().to(login::login::<B>))
            .route(
                "/refresh",
                web::post()
                    .to(refresh::refresh::<B>)
                    .wrap(JwtAuth::refresh()),
            )
            .route(
                "/logout",
                web::post()
                    .to(logout::logout::<B>)
                    .wrap(JwtAuth::refresh()),
            )
            .route(
                "/logout-all",
                web::post()
                    .to(logout::logout_all::<B>)
                    .wrap(JwtAuth::access()),
            )
            .route("/me", web::get().to(me::me).wrap(JwtAuth::access())),
    );
}
