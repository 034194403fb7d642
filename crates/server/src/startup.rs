use std::net::SocketAddr;

use axum::Router;
use configs::AppConfig;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes;
use crate::state::ServerState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load `config.toml` (or `CONFIG_PATH`); fall back to env variables only
/// when the file does not exist.
pub fn load_config() -> anyhow::Result<AppConfig> {
    match AppConfig::load_and_validate() {
        Ok(cfg) => Ok(cfg),
        Err(e) if is_missing_file(&e) => AppConfig::from_env(),
        Err(e) => Err(StartupError::InvalidConfig(e.to_string()).into()),
    }
}

fn is_missing_file(e: &anyhow::Error) -> bool {
    e.downcast_ref::<std::io::Error>()
        .map(|io| io.kind() == std::io::ErrorKind::NotFound)
        .unwrap_or(false)
}

fn bind_addr(cfg: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.server.host, cfg.server.port).parse()?)
}

/// Connect, make sure the votes table exists, and build the router.
pub async fn build_app(cfg: &AppConfig) -> anyhow::Result<Router> {
    if cfg.auth.uses_dev_secret() {
        warn!(event = "dev_jwt_secret", "JWT_SECRET is not set; bearer tokens are signed with the public development secret");
    }
    let db = models::db::connect_with_config(&cfg.database).await?;
    let created = migration::ensure_schema(&db)
        .await
        .map_err(|e| StartupError::Schema(e.to_string()))?;
    if created {
        info!("votes table created");
    }
    let state = ServerState::new(db, cfg).map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    Ok(routes::build_router(state, build_cors()))
}

/// Public entry: build the app and run the HTTP server
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let app = build_app(&cfg).await?;

    let addr = bind_addr(&cfg)?;
    info!(%addr, "starting vote server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}
