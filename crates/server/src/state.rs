use std::sync::Arc;

use sea_orm::DatabaseConnection;
use service::votes::repo::seaorm::SeaOrmVoteRepository;
use service::VoteService;

use crate::identity::VotePaths;

#[derive(Clone)]
pub struct ServerAuthConfig {
    pub jwt_secret: String,
}

/// What anonymous callers are granted.
#[derive(Clone, Copy, Debug)]
pub struct AnonymousAccess {
    pub view: bool,
    pub modify: bool,
}

#[derive(Clone)]
pub struct ServerState {
    pub votes: Arc<VoteService<SeaOrmVoteRepository>>,
    pub auth: ServerAuthConfig,
    pub anonymous: AnonymousAccess,
    pub vote_paths: Arc<VotePaths>,
}

impl ServerState {
    pub fn new(db: DatabaseConnection, cfg: &configs::AppConfig) -> anyhow::Result<Self> {
        let repo = SeaOrmVoteRepository { db };
        Ok(Self {
            votes: Arc::new(VoteService::new(Arc::new(repo))),
            auth: ServerAuthConfig { jwt_secret: cfg.auth.jwt_secret.clone() },
            anonymous: AnonymousAccess { view: cfg.vote.anonymous_view, modify: cfg.vote.anonymous_modify },
            vote_paths: Arc::new(VotePaths::new(&cfg.vote.paths)?),
        })
    }
}
