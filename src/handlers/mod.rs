// Two handler tiers: public (no auth) and protected (admin session required).
pub mod protected;
pub mod public;

use std::net::SocketAddr;

use axum::http::HeaderMap;

use crate::error::ApiError;
use crate::rate_limit::{FixedWindowLimiter, RateLimitDecision};
use crate::state::AppState;

/// Rate-limit key for a request: the first hop of `x-forwarded-for` when a
/// proxy set one, otherwise the peer address.
pub(crate) fn client_key(headers: &HeaderMap, peer: SocketAddr) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|ip| ip.trim().to_string())
        .filter(|ip| !ip.is_empty())
        .unwrap_or_else(|| peer.ip().to_string())
}

/// Apply a limiter unless rate limiting is disabled for this environment.
pub(crate) fn enforce_limit(
    state: &AppState,
    limiter: &FixedWindowLimiter,
    key: &str,
) -> Result<(), ApiError> {
    if !state.config.limits.enabled {
        return Ok(());
    }
    match limiter.check(key) {
        RateLimitDecision::Allowed => Ok(()),
        RateLimitDecision::Denied { retry_after } => Err(ApiError::too_many_requests(retry_after)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn forwarded_header_wins_over_peer_address() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.9, 10.0.0.1"),
        );
        let peer: SocketAddr = "127.0.0.1:9999".parse().unwrap();
        assert_eq!(client_key(&headers, peer), "203.0.113.9");
    }

    #[test]
    fn falls_back_to_peer_address() {
        let peer: SocketAddr = "192.0.2.7:1234".parse().unwrap();
        assert_eq!(client_key(&HeaderMap::new(), peer), "192.0.2.7");
    }
}
