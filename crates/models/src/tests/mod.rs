

use std::path::Path;

use sea_orm::DatabaseConnection;

/// Fresh in-memory database with the votes table in place.
pub(crate) async fn setup_test_db() -> anyhow::Result<DatabaseConnection> {
    let db = crate::db::connect_memory().await?;
    migration::ensure_schema(&db).await?;
    Ok(db)
}

/// File-backed database behind an 8-connection pool, for tests where
/// transactions must actually run side by side.
pub(crate) async fn setup_pooled_db(dir: &Path) -> anyhow::Result<DatabaseConnection> {
    let cfg = configs::DatabaseConfig {
        url: format!("sqlite:{}?mode=rwc", dir.join("votes.db").display()),
        max_connections: 8,
        min_connections: 1,
        ..Default::default()
    };
    let db = crate::db::connect_with_config(&cfg).await?;
    migration::ensure_schema(&db).await?;
    Ok(db)
}
