pub mod auth;
pub mod callback;
pub mod cors;
pub mod error_envelope;
pub mod security;

pub use auth::{Authenticator, CurrentUser, JwtAuth, RefreshContext};
pub use callback::{CallbackKey, CALLBACK_KEY_HEADER};
pub use cors::create_cors;
pub use error_envelope::ErrorEnvelope;
pub use security::SecurityHeaders;
