//! Fixed-window request limiting per client IP.
//!
//! Each route group wraps its scope in its own [`RateLimiter`], so the user
//! and ticket groups count independently. Counters live in process memory
//! and are not shared between instances.

use std::collections::HashMap;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderMap, HeaderName, HeaderValue, RETRY_AFTER};
use actix_web::Error;
use futures::future::{ready, LocalBoxFuture, Ready};
use parking_lot::Mutex;
use tracing::warn;

use crate::shared::api::ApiResponse;

const LIMIT_HEADER: &str = "x-ratelimit-limit";
const REMAINING_HEADER: &str = "x-ratelimit-remaining";

#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub window: Duration,
    pub max_requests: u32,
    /// Returned to clients that exceed the limit
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed { remaining: u32 },
    Limited { retry_after: Duration },
}

#[derive(Debug)]
struct Window {
    started: Instant,
    count: u32,
}

#[derive(Debug)]
struct Counters {
    windows: HashMap<String, Window>,
    last_pruned: Instant,
}

/// Counts requests per key within fixed windows.
#[derive(Debug)]
pub struct FixedWindowCounter {
    config: RateLimitConfig,
    counters: Mutex<Counters>,
}

impl FixedWindowCounter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            counters: Mutex::new(Counters {
                windows: HashMap::new(),
                last_pruned: Instant::now(),
            }),
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    pub fn check(&self, key: &str, now: Instant) -> Decision {
        let window_len = self.config.window;
        let max = self.config.max_requests;
        let mut counters = self.counters.lock();

        if now.saturating_duration_since(counters.last_pruned) >= window_len {
            counters
                .windows
                .retain(|_, w| now.saturating_duration_since(w.started) < window_len);
            counters.last_pruned = now;
        }

        let window = counters
            .windows
            .entry(key.to_string())
            .or_insert(Window {
                started: now,
                count: 0,
            });

        let elapsed = now.saturating_duration_since(window.started);
        if elapsed >= window_len {
            window.started = now;
            window.count = 0;
        }

        if window.count >= max {
            let left = window_len.saturating_sub(now.saturating_duration_since(window.started));
            return Decision::Limited {
                retry_after: left.max(Duration::from_secs(1)),
            };
        }

        window.count += 1;
        Decision::Allowed {
            remaining: max - window.count,
        }
    }

    #[cfg(test)]
    fn tracked_keys(&self) -> usize {
        self.counters.lock().windows.len()
    }
}

/// Middleware factory. Build it once outside the `HttpServer` factory
/// closure so every worker shares the same counters.
#[derive(Clone)]
pub struct RateLimiter {
    counter: Arc<FixedWindowCounter>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            counter: Arc::new(FixedWindowCounter::new(config)),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimiter
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service,
            counter: Arc::clone(&self.counter),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: S,
    counter: Arc<FixedWindowCounter>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let client = client_key(&req);
        let config = self.counter.config();
        let limit = config.max_requests;

        match self.counter.check(&client, Instant::now()) {
            Decision::Limited { retry_after } => {
                warn!(client = %client, path = %req.path(), "Rate limit exceeded");
                let mut response = ApiResponse::too_many_requests(&config.message);
                let headers = response.headers_mut();
                set_limit_headers(headers, limit, 0);
                headers.insert(RETRY_AFTER, HeaderValue::from(retry_after.as_secs()));
                let res = req.into_response(response).map_into_right_body();
                Box::pin(async move { Ok(res) })
            }
            Decision::Allowed { remaining } => {
                let fut = self.service.call(req);
                Box::pin(async move {
                    let mut res = fut.await?;
                    set_limit_headers(res.headers_mut(), limit, remaining);
                    Ok(res.map_into_left_body())
                })
            }
        }
    }
}

/// Keys on the socket peer. Forwarding headers are client-controlled and
/// are not trusted here.
fn client_key(req: &ServiceRequest) -> String {
    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn set_limit_headers(headers: &mut HeaderMap, limit: u32, remaining: u32) {
    headers.insert(
        HeaderName::from_static(LIMIT_HEADER),
        HeaderValue::from(limit),
    );
    headers.insert(
        HeaderName::from_static(REMAINING_HEADER),
        HeaderValue::from(remaining),
    );
}
