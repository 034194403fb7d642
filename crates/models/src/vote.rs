use sea_orm::entity::prelude::*;
use sea_orm::{
    ConnectionTrait, DatabaseConnection, DbBackend, QuerySelect, Set, Statement, TransactionTrait,
};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

/// A stored vote. Zero votes are never stored; the row is removed instead.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "votes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub resource: String,
    #[sea_orm(primary_key, auto_increment = false, column_type = "Text")]
    pub username: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub vote: i32,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef { panic!("no relations defined here") }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_vote(vote: i32) -> Result<(), ModelError> {
    if !(-1..=1).contains(&vote) {
        return Err(ModelError::Validation(format!("vote must be -1, 0 or 1, got {vote}")));
    }
    Ok(())
}

/// Sum of all votes for `resource`; 0 when nobody voted.
pub async fn sum_for_resource<C>(db: &C, resource: &str) -> Result<i64, ModelError>
where
    C: ConnectionTrait,
{
    let total: Option<Option<i64>> = Entity::find()
        .select_only()
        .column_as(Column::Vote.sum(), "total")
        .filter(Column::Resource.eq(resource))
        .into_tuple()
        .one(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?;
    Ok(total.flatten().unwrap_or(0))
}

/// The vote `username` holds on `resource`, if any.
pub async fn find_vote<C>(db: &C, resource: &str, username: &str) -> Result<Option<i32>, ModelError>
where
    C: ConnectionTrait,
{
    Entity::find()
        .select_only()
        .column(Column::Vote)
        .filter(Column::Resource.eq(resource))
        .filter(Column::Username.eq(username))
        .into_tuple::<i32>()
        .one(db)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))
}

/// Delete the (resource, username) row and insert `vote` unless it is zero,
/// all inside one transaction.
pub async fn replace(db: &DatabaseConnection, resource: &str, username: &str, vote: i32) -> Result<(), ModelError> {
    validate_vote(vote)?;
    let txn = db.begin().await.map_err(|e| ModelError::Db(e.to_string()))?;

    // Postgres READ COMMITTED lets two deletes of a missing row both pass;
    // the advisory lock orders same-key writers until commit.
    if txn.get_database_backend() == DbBackend::Postgres {
        txn.execute(Statement::from_sql_and_values(
            DbBackend::Postgres,
            "SELECT pg_advisory_xact_lock(hashtext($1))",
            [lock_key(resource, username).into()],
        ))
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?;
    }

    Entity::delete_many()
        .filter(Column::Resource.eq(resource))
        .filter(Column::Username.eq(username))
        .exec(&txn)
        .await
        .map_err(|e| ModelError::Db(e.to_string()))?;

    if vote != 0 {
        let am = ActiveModel {
            resource: Set(resource.to_string()),
            username: Set(username.to_string()),
            vote: Set(vote),
        };
        Entity::insert(am)
            .exec_without_returning(&txn)
            .await
            .map_err(|e| ModelError::Db(e.to_string()))?;
    }

    txn.commit().await.map_err(|e| ModelError::Db(e.to_string()))
}

fn lock_key(resource: &str, username: &str) -> String {
    format!("votes:{resource}\u{1f}{username}")
}
