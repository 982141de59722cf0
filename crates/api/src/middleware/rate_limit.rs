//! Login attempt throttling.
//!
//! Fixed-window counter keyed by client address: at most `max_attempts`
//! login requests per window, after which requests are rejected with 429
//! until the window rolls over. State is in-process only.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::{
    Json,
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use serde_json::json;
use tracing::info;

use crate::AppState;

/// Map size above which expired windows are pruned on insert.
const PRUNE_THRESHOLD: usize = 10_000;

/// A per-client attempt window.
#[derive(Debug, Clone, Copy)]
struct Window {
    started_at: Instant,
    attempts: u32,
}

/// Fixed-window login throttle shared across requests.
#[derive(Debug)]
pub struct LoginRateLimiter {
    max_attempts: u32,
    window: Duration,
    windows: DashMap<String, Window>,
}

impl LoginRateLimiter {
    /// Creates a throttle allowing `max_attempts` per `window` per client.
    #[must_use]
    pub fn new(max_attempts: u32, window: Duration) -> Self {
        Self {
            max_attempts,
            window,
            windows: DashMap::new(),
        }
    }

    /// Records an attempt for `key` and returns whether it is allowed.
    pub fn check(&self, key: &str) -> bool {
        let now = Instant::now();

        if self.windows.len() > PRUNE_THRESHOLD && !self.windows.contains_key(key) {
            let window = self.window;
            self.windows
                .retain(|_, w| now.duration_since(w.started_at) < window);
        }

        let mut entry = self.windows.entry(key.to_string()).or_insert(Window {
            started_at: now,
            attempts: 0,
        });

        if now.duration_since(entry.started_at) >= self.window {
            entry.started_at = now;
            entry.attempts = 0;
        }

        entry.attempts += 1;
        entry.attempts <= self.max_attempts
    }
}

/// Throttling middleware for the login route.
pub async fn login_rate_limit_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let key = client_key(&request);

    if !state.login_limiter.check(&key) {
        info!(client = %key, "Login attempt throttled");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({
                "error": "too_many_attempts",
                "message": "Too many login attempts. Please try again later."
            })),
        )
            .into_response();
    }

    next.run(request).await
}

/// Derives the throttle key for a request.
///
/// Prefers the first X-Forwarded-For hop, falling back to the peer socket
/// address when the service is reached directly.
fn client_key(request: &Request) -> String {
    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty())
        .or_else(|| {
            request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ci| ci.0.ip().to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_up_to_max_attempts() {
        let limiter = LoginRateLimiter::new(5, Duration::from_secs(600));

        for _ in 0..5 {
            assert!(limiter.check("10.0.0.1"));
        }
        assert!(!limiter.check("10.0.0.1"));
        assert!(!limiter.check("10.0.0.1"));
    }

    #[test]
    fn test_clients_are_throttled_independently() {
        let limiter = LoginRateLimiter::new(1, Duration::from_secs(600));

        assert!(limiter.check("10.0.0.1"));
        assert!(!limiter.check("10.0.0.1"));
        assert!(limiter.check("10.0.0.2"));
    }

    #[test]
    fn test_window_rollover_resets_count() {
        let limiter = LoginRateLimiter::new(1, Duration::from_millis(10));

        assert!(limiter.check("10.0.0.1"));
        assert!(!limiter.check("10.0.0.1"));

        std::thread::sleep(Duration::from_millis(20));
        assert!(limiter.check("10.0.0.1"));
    }
}
