//! Route registration
//!
//! Each submodule owns one URL prefix and exposes `configure`.

pub mod auth;
pub mod health;
pub mod organizations;
pub mod statistics;
pub mod storage;
pub mod users;
pub mod validation;

use actix_web::web;

use rv_core::Backend;

use crate::app::ApiSettings;

/// Registers every route of the API
pub fn configure<B: Backend>(cfg: &mut web::ServiceConfig, settings: &ApiSettings) {
    health::configure::<B>(cfg);
    auth::configure::<B>(cfg);
    users::configure::<B>(cfg);
    organizations::configure::<B>(cfg);
    storage::configure::<B>(cfg, settings);
    validation::configure::<B>(cfg, settings);
    statistics::configure::<B>(cfg);
}
