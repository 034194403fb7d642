use thiserror::Error;

use super::domain::Permission;

/// Errors surfaced by vote operations
#[derive(Debug, Error)]
pub enum VoteError {
    #[error("permission denied: {0} required")]
    PermissionDenied(Permission),
    #[error("invalid vote value {0}; expected -1, 0 or 1")]
    InvalidVoteValue(i64),
    #[error("invalid resource: {0:?}")]
    InvalidResource(String),
    #[error("storage failure: {0}")]
    Storage(String),
}

impl VoteError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            VoteError::PermissionDenied(_) => 1001,
            VoteError::InvalidVoteValue(_) => 1002,
            VoteError::InvalidResource(_) => 1003,
            VoteError::Storage(_) => 1200,
        }
    }
}

impl From<models::errors::ModelError> for VoteError {
    fn from(e: models::errors::ModelError) -> Self {
        VoteError::Storage(e.to_string())
    }
}
