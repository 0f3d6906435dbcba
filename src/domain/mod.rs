// Domain layer module exports
// Following Hexagonal Architecture and DDD principles
// Domain is independent of infrastructure concerns

pub mod error;
pub mod project;
pub mod repositories;
pub mod team;
pub mod user;
pub mod validation;

pub use error::DomainError;
