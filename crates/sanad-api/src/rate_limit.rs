//! Per-client token-bucket throttling as a tower layer.
//!
//! Buckets are keyed by the client IP taken from `X-Forwarded-For` (first
//! hop). Requests with no attributable client pass through untouched.
//! Rejections are batched into a once-a-minute warn log, and buckets idle
//! past the eviction window are swept out so the map stays bounded.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tower::{Layer, Service};
use tracing::warn;

const LOG_INTERVAL: Duration = Duration::from_secs(60);
const EVICT_AFTER: Duration = Duration::from_secs(300);

#[derive(Clone)]
pub struct ThrottleLayer {
    rate_per_sec: f64,
    burst: f64,
}

impl ThrottleLayer {
    pub fn new(rate_per_sec: u32, burst: u32) -> Self {
        Self {
            rate_per_sec: rate_per_sec as f64,
            burst: burst as f64,
        }
    }
}

impl<S> Layer<S> for ThrottleLayer {
    type Service = Throttle<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Throttle {
            inner,
            shared: Arc::new(Shared {
                buckets: DashMap::new(),
                rejected: AtomicU64::new(0),
                last_log: Mutex::new(Instant::now()),
                last_sweep: Mutex::new(Instant::now()),
            }),
            rate_per_sec: self.rate_per_sec,
            burst: self.burst,
        }
    }
}

#[derive(Clone)]
pub struct Throttle<S> {
    inner: S,
    shared: Arc<Shared>,
    rate_per_sec: f64,
    burst: f64,
}

struct Shared {
    buckets: DashMap<String, Bucket>,
    rejected: AtomicU64,
    last_log: Mutex<Instant>,
    last_sweep: Mutex<Instant>,
}

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    touched: Instant,
}

impl<S, ReqBody> Service<axum::http::Request<ReqBody>> for Throttle<S>
where
    S: Service<axum::http::Request<ReqBody>, Response = axum::http::Response<axum::body::Body>>
        + Send
        + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: axum::http::Request<ReqBody>) -> Self::Future {
        if let Some(client) = forwarded_client(&req)
            && !self.admit(&client)
        {
            self.shared.rejected.fetch_add(1, Ordering::Relaxed);
            flush_rejection_log(&self.shared);
            return Box::pin(async move {
                Ok(axum::http::Response::builder()
                    .status(axum::http::StatusCode::TOO_MANY_REQUESTS)
                    .body(axum::body::Body::from("rate limited"))
                    .unwrap())
            });
        }

        let fut = self.inner.call(req);
        Box::pin(fut)
    }
}

/// First address in `X-Forwarded-For`, if the proxy set one.
fn forwarded_client<B>(req: &axum::http::Request<B>) -> Option<String> {
    req.headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|addr| addr.trim().to_string())
        .filter(|addr| !addr.is_empty())
}

impl<S> Throttle<S> {
    fn admit(&self, client: &str) -> bool {
        self.sweep_idle_buckets();
        let now = Instant::now();
        let mut bucket = self
            .shared
            .buckets
            .entry(client.to_string())
            .or_insert(Bucket {
                tokens: self.burst,
                touched: now,
            });
        let elapsed = now.saturating_duration_since(bucket.touched).as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed * self.rate_per_sec).min(self.burst);
        bucket.touched = now;
        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    fn sweep_idle_buckets(&self) {
        let now = Instant::now();
        {
            let mut last = self.shared.last_sweep.lock().unwrap();
            if now.saturating_duration_since(*last) < EVICT_AFTER {
                return;
            }
            *last = now;
        }
        self.shared
            .buckets
            .retain(|_, bucket| now.saturating_duration_since(bucket.touched) < EVICT_AFTER);
    }
}

fn flush_rejection_log(shared: &Shared) {
    let now = Instant::now();
    let mut last = shared.last_log.lock().unwrap();
    if now.saturating_duration_since(*last) >= LOG_INTERVAL {
        let rejected = shared.rejected.swap(0, Ordering::Relaxed);
        if rejected > 0 {
            warn!("throttled {rejected} requests in the last minute");
        }
        *last = now;
    }
}
