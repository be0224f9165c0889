#[path = "trait.rs"]
mod trait_;
pub mod mock;

pub use mock::MockValidationStatisticsRepository;
pub use trait_::ValidationStatisticsRepository;
