//! Request and response bodies of the HTTP API

pub mod auth;
pub mod common;
pub mod organization;
pub mod statistics;
pub mod user;

pub use auth::*;
pub use common::*;
pub use organization::*;
pub use statistics::*;
pub use user::*;
