use std::sync::Arc;

use tracing::{debug, info, instrument};

use super::domain::{normalize_resource, toggle, CallerContext, Direction, Permission, VoteSummary, VoteValue};
use super::errors::VoteError;
use super::repository::VoteRepository;

/// Vote business service independent of web framework
pub struct VoteService<R: VoteRepository> {
    repo: Arc<R>,
}

impl<R: VoteRepository> VoteService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Sum of all votes on a resource, 0 when nobody voted.
    #[instrument(skip(self, caller), fields(user = %caller.user_id))]
    pub async fn get_vote_count(&self, caller: &CallerContext, resource: &str) -> Result<i64, VoteError> {
        caller.require(Permission::VoteView)?;
        let resource = canonical(resource)?;
        self.repo.sum_votes(&resource).await
    }

    /// The caller's own vote, `Neutral` when none is stored.
    #[instrument(skip(self, caller), fields(user = %caller.user_id))]
    pub async fn get_vote(&self, caller: &CallerContext, resource: &str) -> Result<VoteValue, VoteError> {
        caller.require(Permission::VoteView)?;
        let resource = canonical(resource)?;
        self.current_vote(caller, &resource).await
    }

    /// Replace the caller's vote. `Neutral` clears it.
    ///
    /// # Examples
    /// ```
    /// use service::votes::{repository::mock::MemoryVoteRepository, CallerContext, VoteService, VoteValue};
    /// use std::sync::Arc;
    /// let svc = VoteService::new(Arc::new(MemoryVoteRepository::default()));
    /// let alice = CallerContext::authenticated("alice");
    /// tokio_test::block_on(svc.set_vote(&alice, "/ticket/5", VoteValue::Up)).unwrap();
    /// assert_eq!(tokio_test::block_on(svc.get_vote(&alice, "ticket/5")).unwrap(), VoteValue::Up);
    /// ```
    #[instrument(skip(self, caller), fields(user = %caller.user_id))]
    pub async fn set_vote(&self, caller: &CallerContext, resource: &str, vote: VoteValue) -> Result<(), VoteError> {
        caller.require(Permission::VoteModify)?;
        let resource = canonical(resource)?;
        self.repo.replace_vote(&resource, &caller.user_id, vote).await?;
        info!(resource = %resource, user = %caller.user_id, vote = vote.as_i32(), "vote_changed");
        Ok(())
    }

    /// Like [`set_vote`](Self::set_vote) for values straight off the wire;
    /// anything outside -1..=1 is rejected before storage is touched.
    pub async fn set_vote_raw(&self, caller: &CallerContext, resource: &str, vote: i64) -> Result<(), VoteError> {
        caller.require(Permission::VoteModify)?;
        let vote = VoteValue::try_from(vote)?;
        self.set_vote(caller, resource, vote).await
    }

    /// Cast a directional vote; casting the current direction again clears it.
    ///
    /// # Examples
    /// ```
    /// use service::votes::{repository::mock::MemoryVoteRepository, CallerContext, Direction, VoteService, VoteValue};
    /// use std::sync::Arc;
    /// let svc = VoteService::new(Arc::new(MemoryVoteRepository::default()));
    /// let bob = CallerContext::authenticated("bob");
    /// let first = tokio_test::block_on(svc.cast(&bob, "wiki", Direction::Up)).unwrap();
    /// assert_eq!(first.count_display, "+1");
    /// let second = tokio_test::block_on(svc.cast(&bob, "/wiki/", Direction::Up)).unwrap();
    /// assert_eq!(second.vote, VoteValue::Neutral);
    /// assert_eq!(second.resource, "wiki/WikiStart");
    /// ```
    #[instrument(skip(self, caller), fields(user = %caller.user_id))]
    pub async fn cast(&self, caller: &CallerContext, resource: &str, direction: Direction) -> Result<VoteSummary, VoteError> {
        // the reply carries the tally, so casting needs view as well
        caller.require(Permission::VoteView)?;
        caller.require(Permission::VoteModify)?;
        let resource = canonical(resource)?;
        let old = self.current_vote(caller, &resource).await?;
        let new = toggle(old, direction);
        debug!(old = old.as_i32(), new = new.as_i32(), "toggle decided");
        self.repo.replace_vote(&resource, &caller.user_id, new).await?;
        info!(resource = %resource, user = %caller.user_id, vote = new.as_i32(), "vote_changed");
        let count = self.repo.sum_votes(&resource).await?;
        Ok(VoteSummary::new(resource, count, new))
    }

    /// Aggregate count plus the caller's own state for one resource.
    #[instrument(skip(self, caller), fields(user = %caller.user_id))]
    pub async fn summary(&self, caller: &CallerContext, resource: &str) -> Result<VoteSummary, VoteError> {
        caller.require(Permission::VoteView)?;
        let resource = canonical(resource)?;
        let vote = self.current_vote(caller, &resource).await?;
        let count = self.repo.sum_votes(&resource).await?;
        Ok(VoteSummary::new(resource, count, vote))
    }

    async fn current_vote(&self, caller: &CallerContext, resource: &str) -> Result<VoteValue, VoteError> {
        Ok(self.repo.find_vote(resource, &caller.user_id).await?.unwrap_or(VoteValue::Neutral))
    }
}

fn canonical(resource: &str) -> Result<String, VoteError> {
    let normalized = normalize_resource(resource);
    if normalized.is_empty() {
        return Err(VoteError::InvalidResource(resource.to_string()));
    }
    Ok(normalized)
}
