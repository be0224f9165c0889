#[path = "trait.rs"]
mod trait_;
pub mod mock;

pub use mock::MockEmployeeRepository;
pub use trait_::EmployeeRepository;
