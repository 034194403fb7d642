//! Vote module: domain, repository and service layers.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;
pub mod repo;

pub use domain::{CallerContext, Direction, Permission, VoteSummary, VoteValue};
pub use errors::VoteError;
pub use service::VoteService;
