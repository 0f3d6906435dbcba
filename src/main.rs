use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use teamboard_api::api::{build_router, AppState};
use teamboard_api::config::{AppConfig, StorageBackend};
use teamboard_api::infrastructure::database;
use teamboard_api::infrastructure::repositories::InMemoryStore;
use teamboard_api::services::{Repositories, Services};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    tracing::info!(environment = %config.environment, "configuration loaded");

    let repos = match config.storage {
        StorageBackend::Postgres => {
            let pool = database::connect(&config.database_url, config.database_max_connections)
                .await
                .context("failed to connect to database")?;
            Repositories::postgres(pool)
        }
        StorageBackend::Memory => {
            tracing::warn!("using in-memory storage, data is lost on restart");
            Repositories::in_memory(&InMemoryStore::new())
        }
    };

    let state = AppState::new(Services::new(repos, &config));
    let app = build_router(state, &config.cors_origin);

    let addr = config.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await.context("server failed")?;
    Ok(())
}
