use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use shared_types::{AppError, RateLimitConfig, RateRule};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Route groups that get their own budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateCategory {
    Login,
    Booking,
    Checkout,
    Webhook,
    Admin,
}

impl RateCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            RateCategory::Login => "login",
            RateCategory::Booking => "booking",
            RateCategory::Checkout => "checkout",
            RateCategory::Webhook => "webhook",
            RateCategory::Admin => "admin",
        }
    }

    fn rule(&self, config: &RateLimitConfig) -> RateRule {
        match self {
            RateCategory::Login => config.login,
            RateCategory::Booking => config.booking,
            RateCategory::Checkout => config.checkout,
            RateCategory::Webhook => config.webhook,
            RateCategory::Admin => config.admin,
        }
    }
}

struct Window {
    started: Instant,
    count: u32,
    length: Duration,
}

/// Fixed-window counters keyed by `(category, client ip)`.
///
/// Process-local: every instance keeps its own counts.
#[derive(Clone)]
pub struct RateLimitState {
    inner: Arc<Mutex<RateLimitInner>>,
}

struct RateLimitInner {
    config: RateLimitConfig,
    windows: HashMap<(RateCategory, String), Window>,
}

impl RateLimitState {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(RateLimitInner {
                config,
                windows: HashMap::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, RateLimitInner> {
        // A panic mid-update leaves the counters usable.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Count one request. `Err` carries the seconds until the window resets.
    pub fn check(&self, category: RateCategory, client: &str) -> Result<(), u64> {
        self.check_at(category, client, Instant::now())
    }

    pub fn check_at(&self, category: RateCategory, client: &str, now: Instant) -> Result<(), u64> {
        let mut inner = self.lock();
        let rule = category.rule(&inner.config);
        let length = Duration::from_secs(rule.window_secs);

        let window = inner
            .windows
            .entry((category, client.to_string()))
            .or_insert(Window {
                started: now,
                count: 0,
                length,
            });

        if now.duration_since(window.started) >= window.length {
            window.started = now;
            window.count = 0;
            window.length = length;
        }

        if window.count >= rule.max_requests {
            let elapsed = now.duration_since(window.started);
            let remaining = window.length.saturating_sub(elapsed).as_secs().max(1);
            return Err(remaining);
        }

        window.count += 1;
        Ok(())
    }

    /// Drop windows that have expired. Returns how many were removed.
    pub fn sweep(&self) -> usize {
        self.sweep_at(Instant::now())
    }

    pub fn sweep_at(&self, now: Instant) -> usize {
        let mut inner = self.lock();
        let before = inner.windows.len();
        inner
            .windows
            .retain(|_, w| now.duration_since(w.started) < w.length);
        before - inner.windows.len()
    }

    /// Number of live windows, for logging.
    pub fn tracked(&self) -> usize {
        self.lock().windows.len()
    }
}

/// Client address: first `X-Forwarded-For` entry, then `X-Real-IP`, then
/// the socket peer, then `"unknown"`.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());
    if let Some(ip) = forwarded {
        return ip.to_string();
    }

    let real_ip = headers
        .get("x-real-ip")
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty());
    if let Some(ip) = real_ip {
        return ip.to_string();
    }

    peer.map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

async fn enforce(
    state: RateLimitState,
    category: RateCategory,
    request: Request,
    next: Next,
) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let client = client_ip(request.headers(), peer);

    if let Err(retry_after) = state.check(category, &client) {
        tracing::warn!(category = category.as_str(), %client, "Rate limit exceeded");
        let mut response =
            AppError::rate_limited("Rate limit exceeded. Please try again later.").into_response();
        response
            .headers_mut()
            .insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
        return response;
    }

    next.run(request).await
}

pub async fn limit_login(State(state): State<RateLimitState>, request: Request, next: Next) -> Response {
    enforce(state, RateCategory::Login, request, next).await
}

pub async fn limit_booking(State(state): State<RateLimitState>, request: Request, next: Next) -> Response {
    enforce(state, RateCategory::Booking, request, next).await
}

pub async fn limit_checkout(State(state): State<RateLimitState>, request: Request, next: Next) -> Response {
    enforce(state, RateCategory::Checkout, request, next).await
}

pub async fn limit_webhook(State(state): State<RateLimitState>, request: Request, next: Next) -> Response {
    enforce(state, RateCategory::Webhook, request, next).await
}

pub async fn limit_admin(State(state): State<RateLimitState>, request: Request, next: Next) -> Response {
    enforce(state, RateCategory::Admin, request, next).await
}
