//! GraphQL schema
//!
//! Resolvers are thin: they read the request's [`Session`] from the context,
//! parse ids, call into [`Services`] and convert the results into the
//! output records in [`types`]. Policy and validation live in the services.

pub mod mutation;
pub mod query;
pub mod types;

use async_graphql::{Context, EmptySubscription, Schema, ID};
use uuid::Uuid;

use crate::auth::Session;
use crate::domain::error::DomainError;
use crate::services::Services;

pub use mutation::MutationRoot;
pub use query::QueryRoot;

pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(services: Services) -> AppSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(services)
        .finish()
}

static ANONYMOUS: Session = Session::Anonymous;

/// The caller's session; requests executed without one are anonymous
fn session<'a>(ctx: &Context<'a>) -> &'a Session {
    ctx.data_opt::<Session>().unwrap_or(&ANONYMOUS)
}

fn services<'a>(ctx: &Context<'a>) -> async_graphql::Result<&'a Services> {
    ctx.data::<Services>()
}

/// Id argument of a lookup query
///
/// A malformed id becomes the nil UUID, which no stored record carries, so
/// the lookup still runs its capability check and then finds nothing.
fn lookup_id(id: &ID) -> Uuid {
    Uuid::parse_str(id.as_str()).unwrap_or(Uuid::nil())
}

/// Parses an id argument; a malformed id names nothing that exists
fn parse_id(id: &ID, entity: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(id.as_str()).map_err(|_| DomainError::missing(entity, id.as_str()))
}

fn parse_ids(ids: &[ID], entity: &str) -> Result<Vec<Uuid>, DomainError> {
    ids.iter().map(|id| parse_id(id, entity)).collect()
}
