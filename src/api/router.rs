use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::State,
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    response::{Html, IntoResponse},
    routing::get,
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::graphql::{build_schema, AppSchema};
use crate::api::middleware::auth::CurrentSession;
use crate::services::Services;

/// Shared state handed to every route
#[derive(Clone)]
pub struct AppState {
    pub schema: AppSchema,
    pub services: Services,
}

impl AppState {
    pub fn new(services: Services) -> Self {
        Self {
            schema: build_schema(services.clone()),
            services,
        }
    }
}

/// Builds the HTTP surface: `/graphql` (POST queries, GET GraphiQL) and `/health`
///
/// `cors_origin` is the single browser origin allowed to call the API with
/// credentials; an unparsable origin disables cross-origin access.
pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    let cors = match HeaderValue::from_str(cors_origin) {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_credentials(true)
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([CONTENT_TYPE, AUTHORIZATION]),
        Err(_) => {
            tracing::warn!(origin = cors_origin, "invalid CORS origin, cross-origin requests disabled");
            CorsLayer::new()
        }
    };

    Router::new()
        .route("/health", get(health_check))
        .route("/graphql", get(graphiql).post(graphql_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Health check endpoint
///
/// GET /health
pub async fn health_check() -> &'static str {
    "OK"
}

/// Executes a GraphQL request under the caller's session
///
/// POST /graphql
async fn graphql_handler(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
    req: GraphQLRequest,
) -> GraphQLResponse {
    state.schema.execute(req.into_inner().data(session)).await.into()
}

/// GET /graphql
async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}
