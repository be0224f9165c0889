//! # RetinaVerify Core
//!
//! Domain layer of the RetinaVerify backend: entities, repository
//! interfaces with in-memory implementations, business services and
//! error types.

pub mod backend;
pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use backend::{Backend, Components, MockBackend, ServiceSettings, Services};
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
