#[path = "trait.rs"]
mod trait_;
pub mod mock;

pub use mock::MockTokenRepository;
pub use trait_::TokenRepository;
