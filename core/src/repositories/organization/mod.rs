#[path = "trait.rs"]
mod trait_;
pub mod mock;

pub use mock::MockOrganizationRepository;
pub use trait_::OrganizationRepository;
