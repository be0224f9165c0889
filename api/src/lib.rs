//! HTTP layer of the RetinaVerify backend
//!
//! Exposes the application factory so the binary and the HTTP tests build
//! the exact same routes and middleware.

pub mod app;
pub mod bootstrap;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod telemetry;

pub use app::{create_app, ApiSettings, AppState};
