#[path = "trait.rs"]
mod trait_;
pub mod mock;

pub use mock::MockUserRepository;
pub use trait_::{UserFilter, UserRepository};
