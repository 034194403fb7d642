use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use server::identity::issue_token;
use server::routes;
use server::state::ServerState;

const SECRET: &str = "test-secret";

fn cors() -> tower_http::cors::CorsLayer { tower_http::cors::CorsLayer::very_permissive() }

async fn build_app(anonymous_modify: bool) -> anyhow::Result<Router> {
    build_app_with(true, anonymous_modify).await
}

async fn build_app_with(anonymous_view: bool, anonymous_modify: bool) -> anyhow::Result<Router> {
    let db = models::db::connect_memory().await?;
    migration::ensure_schema(&db).await?;
    let mut cfg = configs::AppConfig::default();
    cfg.auth.jwt_secret = SECRET.into();
    cfg.vote.anonymous_view = anonymous_view;
    cfg.vote.anonymous_modify = anonymous_modify;
    let state = ServerState::new(db, &cfg)?;
    Ok(routes::build_router(state, cors()))
}

fn bearer(user: &str) -> String {
    format!("Bearer {}", issue_token(SECRET, user, Duration::from_secs(600)).expect("sign token"))
}

async fn send(app: &Router, req: Request<Body>) -> anyhow::Result<(StatusCode, Value)> {
    let resp = app.clone().oneshot(req).await?;
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok((status, body))
}

fn post_vote(direction: &str, resource: &str, user: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/vote/{direction}/{resource}"))
        .header(header::AUTHORIZATION, bearer(user))
        .body(Body::empty())
        .expect("request")
}

#[tokio::test]
async fn health_is_ok() -> anyhow::Result<()> {
    let app = build_app(false).await?;
    let req = Request::builder().uri("/health").body(Body::empty())?;
    let (status, body) = send(&app, req).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn toggle_scenario_over_http() -> anyhow::Result<()> {
    let app = build_app(false).await?;

    let (status, body) = send(&app, post_vote("up", "ticket/5", "alice")).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert_eq!(body["count_display"], "+1");
    assert_eq!(body["vote"], 1);
    assert_eq!(body["up_active"], true);

    let (_, body) = send(&app, post_vote("down", "ticket/5", "bob")).await?;
    assert_eq!(body["count_display"], "+0");
    assert_eq!(body["down_active"], true);

    let (_, body) = send(&app, post_vote("up", "ticket/5", "alice")).await?;
    assert_eq!(body["count"], -1);
    assert_eq!(body["vote"], 0);
    assert_eq!(body["up_active"], false);
    Ok(())
}

#[tokio::test]
async fn anonymous_can_view_but_not_vote_by_default() -> anyhow::Result<()> {
    let app = build_app(false).await?;

    let req = Request::builder().method("POST").uri("/vote/up/wiki").body(Body::empty())?;
    let (status, body) = send(&app, req).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 1001);

    let req = Request::builder().uri("/votes/wiki").body(Body::empty())?;
    let resp = app.clone().oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = resp.headers().get(header::SET_COOKIE).and_then(|v| v.to_str().ok()).unwrap_or_default();
    assert!(cookie.starts_with("vote_session="));
    Ok(())
}

#[tokio::test]
async fn anonymous_session_votes_when_allowed() -> anyhow::Result<()> {
    let app = build_app(true).await?;
    let vote = |cookie: &'static str| {
        Request::builder()
            .method("POST")
            .uri("/vote/down/wiki/")
            .header(header::COOKIE, cookie)
            .body(Body::empty())
            .expect("request")
    };

    let (status, body) = send(&app, vote("vote_session=abc")).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["resource"], "wiki/WikiStart");
    assert_eq!(body["count"], -1);

    // same session toggles off, a different one adds its own vote
    let (_, body) = send(&app, vote("vote_session=abc")).await?;
    assert_eq!(body["count"], 0);
    let (_, body) = send(&app, vote("vote_session=xyz")).await?;
    assert_eq!(body["count"], -1);
    Ok(())
}

#[tokio::test]
async fn start_page_spellings_share_votes() -> anyhow::Result<()> {
    let app = build_app(false).await?;
    send(&app, post_vote("up", "wiki", "alice")).await?;
    let req = Request::builder()
        .uri("/votes/wiki/WikiStart")
        .header(header::AUTHORIZATION, bearer("alice"))
        .body(Body::empty())?;
    let (_, body) = send(&app, req).await?;
    assert_eq!(body["count"], 1);
    assert_eq!(body["vote"], 1);
    Ok(())
}

#[tokio::test]
async fn put_sets_and_clears() -> anyhow::Result<()> {
    let app = build_app(false).await?;
    let put = |vote: i64| {
        Request::builder()
            .method("PUT")
            .uri("/votes/ticket/9")
            .header(header::AUTHORIZATION, bearer("carol"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "vote": vote }).to_string()))
            .expect("request")
    };

    let (status, body) = send(&app, put(-1)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], -1);

    let (status, body) = send(&app, put(0)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);
    assert_eq!(body["vote"], 0);

    let (status, body) = send(&app, put(5)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 1002);
    Ok(())
}

#[tokio::test]
async fn unknown_direction_and_path_are_not_found() -> anyhow::Result<()> {
    let app = build_app(false).await?;
    let (status, _) = send(&app, post_vote("sideways", "ticket/1", "alice")).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, post_vote("up", "timeline", "alice")).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn bad_token_is_unauthorized() -> anyhow::Result<()> {
    let app = build_app(false).await?;
    let forged = issue_token("other-secret", "mallory", Duration::from_secs(600))?;
    let req = Request::builder()
        .method("POST")
        .uri("/vote/up/ticket/1")
        .header(header::AUTHORIZATION, format!("Bearer {forged}"))
        .body(Body::empty())?;
    let (status, _) = send(&app, req).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn metrics_exposed() -> anyhow::Result<()> {
    let app = build_app(false).await?;
    send(&app, post_vote("up", "ticket/77", "dave")).await?;
    let resp = app.clone().oneshot(Request::builder().uri("/metrics").body(Body::empty())?).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let text = String::from_utf8(axum::body::to_bytes(resp.into_body(), usize::MAX).await?.to_vec())?;
    assert!(text.contains("votes_cast_total"));
    Ok(())
}

#[tokio::test]
async fn modify_without_view_is_refused_and_not_stored() -> anyhow::Result<()> {
    let app = build_app_with(false, true).await?;

    let req = Request::builder()
        .method("PUT")
        .uri("/votes/ticket/1")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "vote": 1 }).to_string()))?;
    let (status, body) = send(&app, req).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 1001);

    let req = Request::builder().method("POST").uri("/vote/down/ticket/1").body(Body::empty())?;
    let (status, _) = send(&app, req).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // neither refused request left a vote behind
    let (status, body) = send(&app, post_vote("up", "ticket/1", "alice")).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    Ok(())
}
