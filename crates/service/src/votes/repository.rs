use async_trait::async_trait;

use super::domain::VoteValue;
use super::errors::VoteError;

/// Persistence for votes. Resources arrive already normalized.
#[async_trait]
pub trait VoteRepository: Send + Sync {
    async fn sum_votes(&self, resource: &str) -> Result<i64, VoteError>;
    async fn find_vote(&self, resource: &str, username: &str) -> Result<Option<VoteValue>, VoteError>;
    /// Atomically drop any vote for the key, then store `vote` unless neutral.
    async fn replace_vote(&self, resource: &str, username: &str, vote: VoteValue) -> Result<(), VoteError>;
}

/// Simple in-memory repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MemoryVoteRepository {
        rows: Mutex<HashMap<(String, String), VoteValue>>, // key: (resource, username)
        failing: AtomicBool,
    }

    impl MemoryVoteRepository {
        /// Make every following call fail with a storage error.
        pub fn fail_storage(&self, failing: bool) {
            self.failing.store(failing, Ordering::SeqCst);
        }

        pub fn row_count(&self) -> usize {
            self.rows.lock().map(|r| r.len()).unwrap_or_default()
        }

        fn rows(&self) -> Result<std::sync::MutexGuard<'_, HashMap<(String, String), VoteValue>>, VoteError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(VoteError::Storage("memory repository set to fail".into()));
            }
            self.rows.lock().map_err(|_| VoteError::Storage("memory repository poisoned".into()))
        }
    }

    #[async_trait]
    impl VoteRepository for MemoryVoteRepository {
        async fn sum_votes(&self, resource: &str) -> Result<i64, VoteError> {
            let rows = self.rows()?;
            Ok(rows
                .iter()
                .filter(|((r, _), _)| r == resource)
                .map(|(_, v)| v.as_i32() as i64)
                .sum())
        }

        async fn find_vote(&self, resource: &str, username: &str) -> Result<Option<VoteValue>, VoteError> {
            let rows = self.rows()?;
            Ok(rows.get(&(resource.to_string(), username.to_string())).copied())
        }

        async fn replace_vote(&self, resource: &str, username: &str, vote: VoteValue) -> Result<(), VoteError> {
            let mut rows = self.rows()?;
            let key = (resource.to_string(), username.to_string());
            rows.remove(&key);
            if vote != VoteValue::Neutral {
                rows.insert(key, vote);
            }
            Ok(())
        }
    }
}
