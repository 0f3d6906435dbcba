use async_graphql::{Error, ErrorExtensions};

use crate::domain::error::DomainError;

/// Renders a domain error as a GraphQL error carrying `extensions.code`
impl ErrorExtensions for DomainError {
    fn extend(&self) -> Error {
        Error::new(self.to_string()).extend_with(|_, ext| ext.set("code", self.code()))
    }
}
