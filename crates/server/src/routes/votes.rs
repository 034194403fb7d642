use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use service::votes::domain::normalize_resource;
use service::votes::Permission;
use service::{Direction, VoteSummary};

use crate::errors::JsonApiError;
use crate::identity::resolve_caller;
use crate::metrics;
use crate::state::ServerState;

#[derive(Debug, Deserialize)]
pub struct SetVoteInput {
    pub vote: i64,
}

fn ensure_voteable(state: &ServerState, resource: &str) -> Result<(), JsonApiError> {
    let normalized = normalize_resource(resource);
    if !state.vote_paths.is_voteable(&normalized) {
        return Err(JsonApiError::not_found(format!("voting is not enabled for /{normalized}")));
    }
    Ok(())
}

/// Vote count and the caller's own vote for a resource
#[utoipa::path(
    get,
    path = "/votes/{resource}",
    tag = "votes",
    params(("resource" = String, Path, description = "Resource path, e.g. ticket/5")),
    responses(
        (status = 200, description = "Current tally", body = crate::openapi::VoteSummaryDoc),
        (status = 403, description = "Caller may not view votes"),
        (status = 404, description = "Resource does not accept votes")
    )
)]
pub async fn get_summary(
    State(state): State<ServerState>,
    Path(resource): Path<String>,
    headers: HeaderMap,
    jar: CookieJar,
) -> Result<(CookieJar, Json<VoteSummary>), JsonApiError> {
    ensure_voteable(&state, &resource)?;
    let (caller, jar) = resolve_caller(&state, &headers, jar)?;
    let summary = state.votes.summary(&caller, &resource).await?;
    Ok((jar, Json(summary)))
}

/// Toggle an up or down vote
#[utoipa::path(
    post,
    path = "/vote/{direction}/{resource}",
    tag = "votes",
    params(
        ("direction" = String, Path, description = "`up` or `down`"),
        ("resource" = String, Path, description = "Resource path, e.g. wiki/WikiStart")
    ),
    responses(
        (status = 200, description = "Vote toggled", body = crate::openapi::VoteSummaryDoc),
        (status = 401, description = "Invalid bearer token"),
        (status = 403, description = "Caller may not vote"),
        (status = 404, description = "Unknown direction or resource does not accept votes")
    )
)]
pub async fn cast_vote(
    State(state): State<ServerState>,
    Path((direction, resource)): Path<(String, String)>,
    headers: HeaderMap,
    jar: CookieJar,
) -> Result<(CookieJar, Json<VoteSummary>), JsonApiError> {
    let direction: Direction = direction.parse().map_err(JsonApiError::not_found)?;
    ensure_voteable(&state, &resource)?;
    let (caller, jar) = resolve_caller(&state, &headers, jar)?;
    let summary = state.votes.cast(&caller, &resource, direction).await?;
    metrics::record_vote(summary.vote.as_i32());
    Ok((jar, Json(summary)))
}

/// Set the caller's vote explicitly; 0 clears it
#[utoipa::path(
    put,
    path = "/votes/{resource}",
    tag = "votes",
    params(("resource" = String, Path, description = "Resource path")),
    request_body = crate::openapi::SetVoteRequest,
    responses(
        (status = 200, description = "Vote stored", body = crate::openapi::VoteSummaryDoc),
        (status = 400, description = "Vote outside -1..=1"),
        (status = 403, description = "Caller may not vote")
    )
)]
pub async fn put_vote(
    State(state): State<ServerState>,
    Path(resource): Path<String>,
    headers: HeaderMap,
    jar: CookieJar,
    Json(input): Json<SetVoteInput>,
) -> Result<(CookieJar, Json<VoteSummary>), JsonApiError> {
    ensure_voteable(&state, &resource)?;
    let (caller, jar) = resolve_caller(&state, &headers, jar)?;
    // the reply is a summary; refuse before writing if it cannot be shown
    caller.require(Permission::VoteView)?;
    state.votes.set_vote_raw(&caller, &resource, input.vote).await?;
    metrics::record_vote(input.vote as i32);
    let summary = state.votes.summary(&caller, &resource).await?;
    Ok((jar, Json(summary)))
}
