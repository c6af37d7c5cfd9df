use std::{net::SocketAddr, num::NonZeroU32, sync::Arc, time::Duration};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::Method,
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{DefaultKeyedRateLimiter, Quota};

use crate::{config::RateLimitConfig, error::SubmissionError};

/// Idle keys are pruned once the limiter tracks more clients than this.
const PRUNE_THRESHOLD: usize = 10_000;

/// Per-client limiter: a burst of `max_requests`, refilled evenly over the
/// window.
pub struct RateLimiter {
    limiter: DefaultKeyedRateLimiter<String>,
    trust_forwarded: bool,
}

impl RateLimiter {
    /// `None` when the window is too short to spread `max_requests` over.
    pub fn new(max_requests: NonZeroU32, window: Duration, trust_forwarded: bool) -> Option<Self> {
        let quota = Quota::with_period(window / max_requests.get())?.allow_burst(max_requests);

        Some(Self {
            limiter: governor::RateLimiter::keyed(quota),
            trust_forwarded,
        })
    }

    pub fn from_config(config: &RateLimitConfig) -> Option<Arc<Self>> {
        if !config.enabled {
            return None;
        }

        let max_requests = NonZeroU32::new(config.max_requests)?;
        Self::new(
            max_requests,
            Duration::from_secs(config.window_secs),
            config.trust_forwarded,
        )
        .map(Arc::new)
    }

    /// Counts one request for `key`; `false` once the quota is used up.
    pub fn check(&self, key: &str) -> bool {
        if self.limiter.len() > PRUNE_THRESHOLD {
            self.limiter.retain_recent();
        }

        self.limiter.check_key(&key.to_owned()).is_ok()
    }

    /// Peer address, or the first `X-Forwarded-For` hop when the proxy is
    /// trusted.
    fn client_key(&self, request: &Request) -> String {
        let forwarded = self
            .trust_forwarded
            .then(|| request.headers().get("x-forwarded-for"))
            .flatten()
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|value| !value.is_empty());

        if let Some(forwarded) = forwarded {
            return forwarded.to_owned();
        }

        request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
            .unwrap_or_else(|| "unknown".to_owned())
    }
}

/// Only submissions count against the quota; preflight requests pass.
pub async fn enforce(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    if request.method() == Method::POST {
        let key = limiter.client_key(&request);
        if !limiter.check(&key) {
            tracing::warn!(client = %key, "Form submission rate limit exceeded");
            return SubmissionError::RateLimited.into_response();
        }
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, http};

    use super::*;

    fn limiter(max_requests: u32, window: Duration, trust_forwarded: bool) -> RateLimiter {
        RateLimiter::new(
            NonZeroU32::new(max_requests).unwrap(),
            window,
            trust_forwarded,
        )
        .unwrap()
    }

    #[test]
    fn test_quota_per_key() {
        let limiter = limiter(2, Duration::from_secs(60), false);

        assert!(limiter.check("a"));
        assert!(limiter.check("a"));
        assert!(!limiter.check("a"));
        assert!(limiter.check("b"));
    }

    #[test]
    fn test_quota_refills_after_window() {
        let limiter = limiter(1, Duration::from_millis(100), false);

        assert!(limiter.check("a"));
        assert!(!limiter.check("a"));

        std::thread::sleep(Duration::from_millis(250));
        assert!(limiter.check("a"));
    }

    #[test]
    fn test_disabled_config_builds_nothing() {
        assert!(RateLimiter::from_config(&RateLimitConfig::default()).is_none());
    }

    #[test]
    fn test_enabled_config_builds_limiter() {
        let config = RateLimitConfig {
            enabled: true,
            ..Default::default()
        };

        assert!(RateLimiter::from_config(&config).is_some());
    }

    #[test]
    fn test_forwarded_header_ignored_by_default() {
        let limiter = limiter(1, Duration::from_secs(60), false);

        let mut request = http::Request::builder()
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .body(Body::empty())
            .unwrap();
        assert_eq!(limiter.client_key(&request), "unknown");

        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([192, 0, 2, 1], 4000))));
        assert_eq!(limiter.client_key(&request), "192.0.2.1");
    }

    #[test]
    fn test_forwarded_header_used_when_trusted() {
        let limiter = limiter(1, Duration::from_secs(60), true);

        let mut request = http::Request::builder()
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .body(Body::empty())
            .unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([192, 0, 2, 1], 4000))));
        assert_eq!(limiter.client_key(&request), "203.0.113.7");

        let request = http::Request::builder().body(Body::empty()).unwrap();
        assert_eq!(limiter.client_key(&request), "unknown");
    }
}
