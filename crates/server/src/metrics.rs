use once_cell::sync::Lazy;
use prometheus::{register_int_counter, Encoder, IntCounter, TextEncoder};

// Prometheus metrics (default registry)
pub static VOTES_CAST_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("votes_cast_total", "Votes stored with a non-zero value")
        .expect("register votes_cast_total")
});

pub static VOTES_CLEARED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("votes_cleared_total", "Votes cleared by toggle or explicit zero")
        .expect("register votes_cleared_total")
});

pub static VOTE_REQUESTS_DENIED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("vote_requests_denied_total", "Vote requests refused for missing permission")
        .expect("register vote_requests_denied_total")
});

pub static VOTE_STORAGE_ERRORS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("vote_storage_errors_total", "Vote operations failed in the database")
        .expect("register vote_storage_errors_total")
});

pub fn record_vote(value: i32) {
    if value == 0 {
        VOTES_CLEARED_TOTAL.inc();
    } else {
        VOTES_CAST_TOTAL.inc();
    }
}

pub fn encode_metrics() -> (axum::http::StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (
        axum::http::StatusCode::OK,
        String::from_utf8(buffer).unwrap_or_default(),
    )
}
