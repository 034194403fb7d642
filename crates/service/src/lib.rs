//! Vote store: business rules on top of the `models` crate.
//! - Permission and value checks happen here, before any storage call.
//! - Persistence sits behind `VoteRepository` so the rules can be tested
//!   without a database.

pub mod votes;
#[cfg(test)]
pub mod test_support;

pub use votes::{CallerContext, Direction, VoteError, VoteService, VoteSummary, VoteValue};
