// Project domain module
// Contains the project aggregate root and its status value object

#![allow(clippy::module_inception)]

pub mod project;
pub mod value_objects;

pub use project::{NewProject, Project, ProjectChanges, ProjectPatch};
pub use value_objects::ProjectStatus;
