#[path = "trait.rs"]
mod trait_;
pub mod mock;

pub use mock::MockRetinaImageRepository;
pub use trait_::RetinaImageRepository;
