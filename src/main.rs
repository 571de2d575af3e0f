use std::{net::SocketAddr, sync::Arc};

mod app;
mod auth;
mod config;
mod db;
mod error;
mod extractors;
#[cfg(test)]
mod memory;
mod state;
mod tasks;

use crate::{config::AppConfig, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "taskboard=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = Arc::new(AppConfig::from_env()?);
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    let pool = db::connect(&config).await?;
    let state = AppState::postgres(pool.clone(), config);
    let app = app::build_app(state)?;

    let served = app::serve(app, addr).await;
    db::close(pool).await;
    served
}
