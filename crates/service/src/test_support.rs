#![cfg(test)]
use std::path::Path;
use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::votes::repo::seaorm::SeaOrmVoteRepository;
use crate::votes::VoteService;

/// In-memory SQLite with the votes table created.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    let db = models::db::connect_memory().await?;
    migration::ensure_schema(&db).await?;
    Ok(db)
}

pub async fn seaorm_service() -> Result<VoteService<SeaOrmVoteRepository>, anyhow::Error> {
    let db = get_db().await?;
    Ok(VoteService::new(Arc::new(SeaOrmVoteRepository { db })))
}

/// File-backed SQLite behind a multi-connection pool, so transactions on
/// different tasks really overlap.
pub async fn pooled_seaorm_service(dir: &Path) -> Result<VoteService<SeaOrmVoteRepository>, anyhow::Error> {
    let cfg = configs::DatabaseConfig {
        url: format!("sqlite:{}?mode=rwc", dir.join("votes.db").display()),
        max_connections: 8,
        min_connections: 1,
        ..Default::default()
    };
    let db = models::db::connect_with_config(&cfg).await?;
    migration::ensure_schema(&db).await?;
    Ok(VoteService::new(Arc::new(SeaOrmVoteRepository { db })))
}
