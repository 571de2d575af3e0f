use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::config::AppConfig;

/// Open the connection pool and bring the schema up to date.
pub async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    let db = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await
        .context("connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&db)
        .await
        .context("run migrations")?;

    tracing::info!("database ready");
    Ok(db)
}

/// Wait for in-flight queries and drop all connections.
pub async fn close(db: PgPool) {
    db.close().await;
    tracing::info!("database pool closed");
}
