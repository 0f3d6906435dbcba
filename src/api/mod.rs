// API layer module (adapters for the GraphQL endpoint)
// Follows Hexagonal Architecture - API is an adapter

pub mod errors;
pub mod graphql;
pub mod middleware;
pub mod router;

pub use router::{build_router, AppState};
