//! Type definitions shared by the API and the domain layer
//!
//! - `pagination` - Pagination for list endpoints
//! - `response` - Error envelope, message and health responses

pub mod pagination;
pub mod response;

pub use pagination::{PageMeta, Pagination};
pub use response::{ErrorResponse, HealthResponse, MessageResponse};
