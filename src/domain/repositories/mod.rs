// Repository ports
// Implemented by adapters in crate::infrastructure::repositories

pub mod project_repository;
pub mod team_repository;
pub mod user_repository;

pub use project_repository::{ProjectRepository, StatusUpdate};
pub use team_repository::TeamRepository;
pub use user_repository::UserRepository;
