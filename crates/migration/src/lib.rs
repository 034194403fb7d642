//! Migrator for the vote table plus the startup schema check.
//!
//! The server asks [`needs_upgrade`] once at boot instead of probing the
//! table with a query and treating failure as "missing".
pub use sea_orm_migration::prelude::*;

use sea_orm_migration::sea_orm::DatabaseConnection;
use tracing::info;

mod m20240101_000001_create_votes;

pub use m20240101_000001_create_votes::VOTES_TABLE;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20240101_000001_create_votes::Migration)]
    }
}

/// `true` when the votes table does not exist yet.
pub async fn needs_upgrade(db: &DatabaseConnection) -> Result<bool, DbErr> {
    let manager = SchemaManager::new(db);
    Ok(!manager.has_table(VOTES_TABLE).await?)
}

/// Create the votes table when absent. Returns whether anything ran.
pub async fn ensure_schema(db: &DatabaseConnection) -> Result<bool, DbErr> {
    if !needs_upgrade(db).await? {
        info!(table = VOTES_TABLE, "schema up to date");
        return Ok(false);
    }
    info!(table = VOTES_TABLE, "votes table missing, running migrations");
    Migrator::up(db, None).await?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm_migration::sea_orm::{ConnectOptions, Database};

    async fn memory_db() -> Result<DatabaseConnection, DbErr> {
        let mut opts = ConnectOptions::new("sqlite::memory:");
        opts.max_connections(1).min_connections(1).sqlx_logging(false);
        Database::connect(opts).await
    }

    #[tokio::test]
    async fn fresh_database_needs_upgrade_once() -> Result<(), DbErr> {
        let db = memory_db().await?;
        assert!(needs_upgrade(&db).await?);

        assert!(ensure_schema(&db).await?);
        assert!(!needs_upgrade(&db).await?);

        // second call is a no-op
        assert!(!ensure_schema(&db).await?);
        Ok(())
    }

    #[tokio::test]
    async fn migrator_up_and_down() -> Result<(), DbErr> {
        let db = memory_db().await?;
        Migrator::up(&db, None).await?;
        assert!(!needs_upgrade(&db).await?);
        Migrator::down(&db, None).await?;
        assert!(needs_upgrade(&db).await?);
        Ok(())
    }
}
