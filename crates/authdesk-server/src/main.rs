//! AuthDesk Server — application entry point.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod handlers;
mod routes;
mod state;

use authdesk_db::{DbConfig, DbManager, run_migrations};
use authdesk_sync::RegistryClient;
use config::Settings;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,authdesk=debug,tower_http=debug")),
        )
        .json()
        .init();

    let settings = Settings::load().context("Failed to load configuration")?;
    info!("Starting AuthDesk server v{}", env!("CARGO_PKG_VERSION"));

    let db_config = DbConfig {
        url: settings.database.url.clone(),
        namespace: settings.database.namespace.clone(),
        database: settings.database.database.clone(),
        username: settings.database.username.clone(),
        password: settings.database.password.clone(),
    };
    let db = DbManager::connect(&db_config)
        .await
        .context("Failed to connect to SurrealDB")?;
    run_migrations(db.client())
        .await
        .context("Failed to run migrations")?;

    if settings.registry.endpoint.is_none() {
        info!("No registry endpoint configured, registry sync disabled");
    }
    let registry = RegistryClient::from_endpoint(
        settings.registry.endpoint.clone(),
        settings.registry.bearer_token.clone(),
    );

    let state = AppState::new(db, registry);
    let app = routes::create_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port)
        .parse()
        .context("Invalid server address")?;
    info!("Server listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
