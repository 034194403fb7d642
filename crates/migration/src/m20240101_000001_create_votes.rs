//! Create `votes` table.
//!
//! One row per (resource, username) with a non-zero vote; the key spans
//! all three columns.
use sea_orm_migration::prelude::*;

pub const VOTES_TABLE: &str = "votes";

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Votes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Votes::Resource).text().not_null())
                    .col(ColumnDef::new(Votes::Username).text().not_null())
                    .col(ColumnDef::new(Votes::Vote).integer().not_null())
                    .primary_key(
                        Index::create()
                            .name("pk_votes")
                            .col(Votes::Resource)
                            .col(Votes::Username)
                            .col(Votes::Vote),
                    )
                    .to_owned(),
            )
            .await?;

        // aggregate count filters on resource alone
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_votes_resource")
                    .table(Votes::Table)
                    .col(Votes::Resource)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Votes::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Votes { Table, Resource, Username, Vote }
