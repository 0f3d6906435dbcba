use axum::{
    extract::FromRequestParts,
    http::{
        header::{AUTHORIZATION, COOKIE},
        request::Parts,
        HeaderMap,
    },
};
use std::convert::Infallible;

use crate::api::router::AppState;
use crate::auth::cookie::{read_cookie, CLEARED_VALUE, TOKEN_COOKIE};
use crate::auth::Session;

/// Session extractor for the GraphQL endpoint
///
/// Never rejects: requests without a usable token get `Session::Anonymous`
/// and the resolvers decide what an anonymous caller may do.
///
/// Usage:
/// ```rust,ignore
/// async fn handler(CurrentSession(session): CurrentSession) -> String {
///     format!("admin: {}", session.is_admin())
/// }
/// ```
pub struct CurrentSession(pub Session);

impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(&parts.headers);
        Ok(CurrentSession(state.services.auth.authenticate(token).await))
    }
}

/// Token from the `token` cookie, falling back to `Authorization: Bearer`
pub fn extract_token(headers: &HeaderMap) -> Option<&str> {
    let from_cookie = headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|header| read_cookie(header, TOKEN_COOKIE))
        .filter(|token| !token.is_empty() && *token != CLEARED_VALUE);

    from_cookie.or_else(|| {
        headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
    })
}
