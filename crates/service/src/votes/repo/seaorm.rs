use sea_orm::DatabaseConnection;

use crate::votes::domain::VoteValue;
use crate::votes::errors::VoteError;
use crate::votes::repository::VoteRepository;

pub struct SeaOrmVoteRepository {
    pub db: DatabaseConnection,
}

#[async_trait::async_trait]
impl VoteRepository for SeaOrmVoteRepository {
    async fn sum_votes(&self, resource: &str) -> Result<i64, VoteError> {
        Ok(models::vote::sum_for_resource(&self.db, resource).await?)
    }

    async fn find_vote(&self, resource: &str, username: &str) -> Result<Option<VoteValue>, VoteError> {
        let stored = models::vote::find_vote(&self.db, resource, username).await?;
        // a row outside -1..=1 means the table was written by something else
        stored
            .map(|v| VoteValue::try_from(v as i64).map_err(|_| VoteError::Storage(format!("stored vote {v} out of range"))))
            .transpose()
    }

    async fn replace_vote(&self, resource: &str, username: &str, vote: VoteValue) -> Result<(), VoteError> {
        Ok(models::vote::replace(&self.db, resource, username, vote.as_i32()).await?)
    }
}
