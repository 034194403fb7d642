//! Caller identity and voteable-path matching.
//!
//! A bearer token names an authenticated user; everyone else is an
//! anonymous caller keyed by a session cookie.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::http::{header, HeaderMap};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use regex::Regex;
use serde::{Deserialize, Serialize};
use service::CallerContext;
use uuid::Uuid;

use crate::errors::JsonApiError;
use crate::state::ServerState;

pub const SESSION_COOKIE: &str = "vote_session";
pub const ANONYMOUS_PREFIX: &str = "anonymous:";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

/// Sign an HS256 token for `username`, valid for `ttl`.
pub fn issue_token(secret: &str, username: &str, ttl: Duration) -> Result<String, jsonwebtoken::errors::Error> {
    let exp = SystemTime::now()
        .checked_add(ttl)
        .unwrap_or_else(SystemTime::now)
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as usize)
        .unwrap_or_default();
    let claims = Claims { sub: username.to_string(), exp };
    encode(&JwtHeader::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Build the caller for this request. Returns the jar so a freshly issued
/// session cookie reaches the response.
pub fn resolve_caller(state: &ServerState, headers: &HeaderMap, jar: CookieJar) -> Result<(CallerContext, CookieJar), JsonApiError> {
    if let Some(token) = bearer_token(headers) {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(state.auth.jwt_secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|e| JsonApiError::unauthorized(e.to_string()))?;
        let sub = data.claims.sub.trim();
        if sub.is_empty() {
            return Err(JsonApiError::unauthorized("token subject is empty"));
        }
        return Ok((CallerContext::authenticated(sub), jar));
    }

    let existing = jar
        .get(SESSION_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|v| !v.trim().is_empty());
    let (session, jar) = match existing {
        Some(session) => (session, jar),
        None => {
            let session = Uuid::new_v4().to_string();
            let mut cookie = Cookie::new(SESSION_COOKIE, session.clone());
            cookie.set_path("/");
            cookie.set_http_only(true);
            cookie.set_same_site(SameSite::Lax);
            (session, jar.add(cookie))
        }
    };
    let caller = CallerContext::new(
        format!("{ANONYMOUS_PREFIX}{session}"),
        state.anonymous.view,
        state.anonymous.modify,
    );
    Ok((caller, jar))
}

/// Configured patterns that decide which resources accept votes. Each is a
/// regular expression anchored at the start of the path.
#[derive(Debug)]
pub struct VotePaths {
    patterns: Vec<Regex>,
}

impl VotePaths {
    pub fn new(patterns: &[String]) -> Result<Self, regex::Error> {
        let patterns = patterns
            .iter()
            .map(|p| Regex::new(&format!("^(?:{})", p.trim())))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// `resource` is the normalized id, without the leading slash.
    pub fn is_voteable(&self, resource: &str) -> bool {
        let path = format!("/{resource}");
        self.patterns.iter().any(|re| re.is_match(&path))
    }
}
