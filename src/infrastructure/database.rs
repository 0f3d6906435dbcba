// PostgreSQL pool construction and schema migrations

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

/// Connects to PostgreSQL and applies the embedded migrations
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database connected and migrated");

    Ok(pool)
}
