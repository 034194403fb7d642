use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::VoteError;

/// Resource id the bare `wiki` path resolves to.
pub const WIKI_START: &str = "wiki/WikiStart";

/// One user's stance on a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i8", try_from = "i64")]
pub enum VoteValue {
    Down,
    Neutral,
    Up,
}

impl VoteValue {
    pub fn as_i32(self) -> i32 {
        match self {
            VoteValue::Down => -1,
            VoteValue::Neutral => 0,
            VoteValue::Up => 1,
        }
    }
}

impl TryFrom<i64> for VoteValue {
    type Error = VoteError;

    fn try_from(v: i64) -> Result<Self, Self::Error> {
        match v {
            -1 => Ok(VoteValue::Down),
            0 => Ok(VoteValue::Neutral),
            1 => Ok(VoteValue::Up),
            other => Err(VoteError::InvalidVoteValue(other)),
        }
    }
}

impl From<VoteValue> for i8 {
    fn from(v: VoteValue) -> Self {
        v.as_i32() as i8
    }
}

/// Requested direction of a toggle vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl From<Direction> for VoteValue {
    fn from(d: Direction) -> Self {
        match d {
            Direction::Up => VoteValue::Up,
            Direction::Down => VoteValue::Down,
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            other => Err(format!("unknown vote direction {other:?}")),
        }
    }
}

/// Actions a caller may be granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    VoteView,
    VoteModify,
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Permission::VoteView => "VOTE_VIEW",
            Permission::VoteModify => "VOTE_MODIFY",
        })
    }
}

/// Who is asking and what they may do. Passed explicitly into every
/// vote operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerContext {
    pub user_id: String,
    pub can_view: bool,
    pub can_modify: bool,
}

impl CallerContext {
    pub fn new(user_id: impl Into<String>, can_view: bool, can_modify: bool) -> Self {
        Self { user_id: user_id.into(), can_view, can_modify }
    }

    /// Authenticated users may view and vote.
    pub fn authenticated(user_id: impl Into<String>) -> Self {
        Self::new(user_id, true, true)
    }

    pub fn require(&self, permission: Permission) -> Result<(), VoteError> {
        let granted = match permission {
            Permission::VoteView => self.can_view,
            Permission::VoteModify => self.can_modify,
        };
        if granted { Ok(()) } else { Err(VoteError::PermissionDenied(permission)) }
    }
}

/// What a presentation layer needs to draw the voter widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteSummary {
    pub resource: String,
    pub count: i64,
    /// Count with explicit sign, e.g. `+3`, `-1`, `+0`.
    pub count_display: String,
    pub vote: VoteValue,
    pub up_active: bool,
    pub down_active: bool,
}

impl VoteSummary {
    pub fn new(resource: String, count: i64, vote: VoteValue) -> Self {
        Self {
            resource,
            count,
            count_display: format_count(count),
            vote,
            up_active: vote == VoteValue::Up,
            down_active: vote == VoteValue::Down,
        }
    }
}

/// Strip surrounding slashes; the bare `wiki` path means the start page.
pub fn normalize_resource(raw: &str) -> String {
    let trimmed = raw.trim_matches('/');
    if trimmed == "wiki" {
        return WIKI_START.to_string();
    }
    trimmed.to_string()
}

pub fn format_count(count: i64) -> String {
    format!("{count:+}")
}

/// New vote after casting `requested` on top of `current`: repeating the
/// current direction clears it.
pub fn toggle(current: VoteValue, requested: Direction) -> VoteValue {
    let requested = VoteValue::from(requested);
    if current == requested { VoteValue::Neutral } else { requested }
}
