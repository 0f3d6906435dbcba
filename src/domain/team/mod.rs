// Team domain module
// Contains the team aggregate root and its value objects

#![allow(clippy::module_inception)]

pub mod team;
pub mod value_objects;

// Re-export main types for convenience
pub use team::{NewTeam, Team, TeamChanges, TeamPatch};
pub use value_objects::{ExpertiseLevel, TeamStatus};
