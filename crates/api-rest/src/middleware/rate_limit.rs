//! Rate limiting middleware.
//!
//! Fixed-window counter per client address, kept in memory. Successful
//! (2xx) responses give their slot back, so only failing attempts count.
//! The clock is tokio's, which lets tests pause and advance it.

use crate::error::ApiError;
use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{HeaderMap, HeaderName, HeaderValue, Request, Response},
    response::IntoResponse,
};
use parking_lot::RwLock;
use std::{
    collections::HashMap,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::Arc,
    time::Duration,
};
use tokio::time::Instant;
use tower::{Layer, Service};
use tracing::warn;

const RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("ratelimit-limit");
const RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("ratelimit-remaining");
const RATELIMIT_RESET: HeaderName = HeaderName::from_static("ratelimit-reset");

/// Expired windows are swept once the table grows past this
const SWEEP_THRESHOLD: usize = 4096;

/// Rate limit configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum counted requests per window
    pub max_requests: u32,

    /// Time window duration
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 5,
            window: Duration::from_secs(120),
        }
    }
}

impl From<&foodhub_common::config::RateLimitConfig> for RateLimitConfig {
    fn from(config: &foodhub_common::config::RateLimitConfig) -> Self {
        Self {
            max_requests: config.login_max_requests,
            window: Duration::from_secs(config.login_window_seconds),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// Outcome of taking a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decision {
    Allowed { remaining: u32, reset: Duration, started: Instant },
    Limited { reset: Duration },
}

/// Rate limiter state
#[derive(Debug)]
struct RateLimiter {
    windows: HashMap<IpAddr, Window>,
    config: RateLimitConfig,
}

impl RateLimiter {
    fn new(config: RateLimitConfig) -> Self {
        Self {
            windows: HashMap::new(),
            config,
        }
    }

    fn acquire(&mut self, ip: IpAddr, now: Instant) -> Decision {
        if self.windows.len() > SWEEP_THRESHOLD {
            self.sweep(now);
        }

        let window_len = self.config.window;
        let window = self.windows.entry(ip).or_insert(Window {
            started: now,
            count: 0,
        });
        if now.duration_since(window.started) >= window_len {
            *window = Window {
                started: now,
                count: 0,
            };
        }

        let reset = window_len.saturating_sub(now.duration_since(window.started));
        if window.count >= self.config.max_requests {
            return Decision::Limited { reset };
        }

        window.count += 1;
        Decision::Allowed {
            remaining: self.config.max_requests - window.count,
            reset,
            started: window.started,
        }
    }

    /// Give back a slot taken in the window that started at `started`
    fn refund(&mut self, ip: IpAddr, started: Instant) {
        if let Some(window) = self.windows.get_mut(&ip) {
            if window.started == started {
                window.count = window.count.saturating_sub(1);
            }
        }
    }

    fn remaining(&self, ip: IpAddr) -> u32 {
        self.windows
            .get(&ip)
            .map(|w| self.config.max_requests.saturating_sub(w.count))
            .unwrap_or(self.config.max_requests)
    }

    fn sweep(&mut self, now: Instant) {
        let window_len = self.config.window;
        self.windows
            .retain(|_, w| now.duration_since(w.started) < window_len);
    }
}

/// Client address: socket peer, then the first `X-Forwarded-For` entry, then loopback
pub fn client_ip<B>(req: &Request<B>) -> IpAddr {
    if let Some(ConnectInfo(addr)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
        return addr.ip();
    }
    forwarded_for(req.headers()).unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST))
}

fn forwarded_for(headers: &HeaderMap) -> Option<IpAddr> {
    headers
        .get("x-forwarded-for")?
        .to_str()
        .ok()?
        .split(',')
        .next()?
        .trim()
        .parse()
        .ok()
}

/// Whole seconds, rounded up
fn ceil_secs(d: Duration) -> u64 {
    d.as_secs() + u64::from(d.subsec_nanos() > 0)
}

fn set_header(headers: &mut HeaderMap, name: HeaderName, value: u64) {
    if let Ok(v) = HeaderValue::from_str(&value.to_string()) {
        headers.insert(name, v);
    }
}

/// Layer for rate limiting.
///
/// Clones share one table, so a layer applied to several routes limits them together.
#[derive(Clone)]
pub struct RateLimitLayer {
    limiter: Arc<RwLock<RateLimiter>>,
}

impl RateLimitLayer {
    /// Create a new rate limit layer with default config
    pub fn new() -> Self {
        Self::with_config(RateLimitConfig::default())
    }

    /// Create a new rate limit layer with custom config
    pub fn with_config(config: RateLimitConfig) -> Self {
        Self {
            limiter: Arc::new(RwLock::new(RateLimiter::new(config))),
        }
    }
}

impl Default for RateLimitLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Layer<S> for RateLimitLayer {
    type Service = RateLimitService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RateLimitService {
            inner,
            limiter: self.limiter.clone(),
        }
    }
}

/// Service that performs rate limiting
#[derive(Clone)]
pub struct RateLimitService<S> {
    inner: S,
    limiter: Arc<RwLock<RateLimiter>>,
}

impl<S> Service<Request<Body>> for RateLimitService<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = futures::future::BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let limiter = self.limiter.clone();
        // The clone may not be ready; drive the instance poll_ready was called on
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);

        Box::pin(async move {
            let ip = client_ip(&req);
            let (decision, limit) = {
                let mut limiter = limiter.write();
                let limit = limiter.config.max_requests;
                (limiter.acquire(ip, Instant::now()), limit)
            };

            let (reset, started) = match decision {
                Decision::Limited { reset } => {
                    warn!(client = %ip, "Rate limit exceeded");
                    let mut response = ApiError::RateLimitExceeded {
                        retry_after: ceil_secs(reset),
                    }
                    .into_response();
                    let headers = response.headers_mut();
                    set_header(headers, RATELIMIT_LIMIT, u64::from(limit));
                    set_header(headers, RATELIMIT_REMAINING, 0);
                    set_header(headers, RATELIMIT_RESET, ceil_secs(reset));
                    return Ok(response);
                }
                Decision::Allowed { reset, started, .. } => (reset, started),
            };

            let mut response = inner.call(req).await?;

            let remaining = {
                let mut limiter = limiter.write();
                if response.status().is_success() {
                    limiter.refund(ip, started);
                }
                limiter.remaining(ip)
            };
            let headers = response.headers_mut();
            set_header(headers, RATELIMIT_LIMIT, u64::from(limit));
            set_header(headers, RATELIMIT_REMAINING, u64::from(remaining));
            set_header(headers, RATELIMIT_RESET, ceil_secs(reset));
            Ok(response)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(max: u32) -> RateLimiter {
        RateLimiter::new(RateLimitConfig {
            max_requests: max,
            window: Duration::from_secs(120),
        })
    }

    const CLIENT: IpAddr = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));

    #[tokio::test(start_paused = true)]
    async fn test_fixed_window() {
        let mut rl = limiter(2);
        let now = Instant::now();
        assert!(matches!(rl.acquire(CLIENT, now), Decision::Allowed { remaining: 1, .. }));
        assert!(matches!(rl.acquire(CLIENT, now), Decision::Allowed { remaining: 0, .. }));
        assert!(matches!(rl.acquire(CLIENT, now), Decision::Limited { .. }));

        // other clients are unaffected
        let other = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2));
        assert!(matches!(rl.acquire(other, now), Decision::Allowed { .. }));

        let later = now + Duration::from_secs(120);
        assert!(matches!(rl.acquire(CLIENT, later), Decision::Allowed { remaining: 1, .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_refund_only_applies_to_the_same_window() {
        let mut rl = limiter(1);
        let now = Instant::now();
        let Decision::Allowed { started, .. } = rl.acquire(CLIENT, now) else {
            panic!("first request must pass");
        };
        rl.refund(CLIENT, started);
        assert_eq!(rl.remaining(CLIENT), 1);

        rl.acquire(CLIENT, now);
        let later = now + Duration::from_secs(121);
        rl.acquire(CLIENT, later);
        rl.refund(CLIENT, started);
        assert_eq!(rl.remaining(CLIENT), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_after_counts_down() {
        let mut rl = limiter(1);
        let now = Instant::now();
        rl.acquire(CLIENT, now);
        match rl.acquire(CLIENT, now + Duration::from_millis(30_500)) {
            Decision::Limited { reset } => assert_eq!(ceil_secs(reset), 90),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_client_ip_fallbacks() {
        let req = Request::builder()
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .body(())
            .unwrap();
        assert_eq!(client_ip(&req), "203.0.113.7".parse::<IpAddr>().unwrap());

        let req = Request::builder().body(()).unwrap();
        assert_eq!(client_ip(&req), IpAddr::V4(Ipv4Addr::LOCALHOST));

        let mut req = Request::builder()
            .header("x-forwarded-for", "203.0.113.7")
            .body(())
            .unwrap();
        req.extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([192, 168, 1, 9], 4000))));
        assert_eq!(client_ip(&req), "192.168.1.9".parse::<IpAddr>().unwrap());
    }
}
