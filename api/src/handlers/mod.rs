//! Request-independent handler helpers: error mapping and multipart reading

pub mod error;
pub mod upload;

pub use error::{ApiError, ApiResult};
pub use upload::{read_form, UploadForm};
