use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::{
    collections::HashMap,
    net::{IpAddr, SocketAddr},
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::RwLock;
use tracing::debug;

use super::error::AppError;

/// Rate limiting configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum number of requests per window
    pub max_requests: u32,
    /// Time window duration
    pub window_duration: Duration,
    /// Whether to trust X-Forwarded-For header for IP extraction
    pub trust_forwarded_headers: bool,
    /// How often the access-triggered eviction sweep may run
    pub sweep_interval: Duration,
    /// Entries older than this many windows are evicted by the sweep
    pub retention_windows: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 60,
            window_duration: Duration::from_secs(60),
            trust_forwarded_headers: false,
            sweep_interval: Duration::from_secs(300),
            retention_windows: 4,
        }
    }
}

/// Per-client window counter
#[derive(Debug, Clone, Copy)]
struct ClientWindow {
    count: u32,
    window_start: Instant,
}

#[derive(Debug)]
struct LimiterState {
    clients: HashMap<IpAddr, ClientWindow>,
    last_sweep: Instant,
}

/// Fixed-window per-client request counter, shared across concurrent
/// requests
///
/// The window boundary is a hard cutoff: a client can burst up to 2N-1
/// requests spanning a boundary. That is accepted behavior, not a bug.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    config: RateLimitConfig,
    state: Arc<RwLock<LimiterState>>,
}

/// Outcome of an admission check, with the advisory header values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
}

impl RateLimitDecision {
    /// Attach the advisory budget headers to a response
    pub fn add_headers(&self, headers: &mut HeaderMap) {
        if let Ok(limit) = HeaderValue::from_str(&self.limit.to_string()) {
            headers.insert("x-rate-limit-limit", limit);
        }
        if let Ok(remaining) = HeaderValue::from_str(&self.remaining.to_string()) {
            headers.insert("x-rate-limit-remaining", remaining);
        }
    }
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        let state = LimiterState { clients: HashMap::new(), last_sweep: Instant::now() };
        Self { config, state: Arc::new(RwLock::new(state)) }
    }

    /// Admit or deny one request from `client`
    ///
    /// The lookup, comparison, and counter update happen under a single
    /// write lock so that concurrent requests from the same client cannot
    /// lose updates. A denied request does not increment the counter.
    pub async fn admit(&self, client: IpAddr) -> RateLimitDecision {
        let limit = self.config.max_requests;
        let now = Instant::now();
        let mut state = self.state.write().await;

        let window = state
            .clients
            .entry(client)
            .or_insert(ClientWindow { count: 0, window_start: now });

        let decision = if now.duration_since(window.window_start) > self.config.window_duration {
            // Hard cutoff: the previous window is discarded wholesale
            window.count = 1;
            window.window_start = now;
            RateLimitDecision { allowed: true, limit, remaining: limit.saturating_sub(1) }
        } else if window.count >= limit {
            RateLimitDecision { allowed: false, limit, remaining: 0 }
        } else {
            window.count += 1;
            RateLimitDecision { allowed: true, limit, remaining: limit - window.count }
        };

        if now.duration_since(state.last_sweep) > self.config.sweep_interval {
            self.sweep(&mut state, now);
        }

        decision
    }

    /// Evict entries whose window is long past, bounding memory under many
    /// distinct clients
    fn sweep(&self, state: &mut LimiterState, now: Instant) {
        let retention = self.config.window_duration * self.config.retention_windows;
        let before = state.clients.len();
        state.clients.retain(|_, window| now.duration_since(window.window_start) <= retention);
        state.last_sweep = now;
        debug!(evicted = before - state.clients.len(), "Rate limiter sweep completed");
    }

    /// Number of client entries currently tracked
    pub async fn tracked_clients(&self) -> usize {
        self.state.read().await.clients.len()
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }
}

/// Extract client IP address from request
fn extract_client_ip(request: &Request, trust_forwarded: bool) -> IpAddr {
    if trust_forwarded {
        if let Some(forwarded) = request.headers().get("x-forwarded-for") {
            if let Ok(forwarded_str) = forwarded.to_str() {
                // Take the first IP (client IP)
                if let Some(first_ip) = forwarded_str.split(',').next() {
                    if let Ok(ip) = first_ip.trim().parse::<IpAddr>() {
                        return ip;
                    }
                }
            }
        }

        if let Some(real_ip) = request.headers().get("x-real-ip") {
            if let Ok(ip_str) = real_ip.to_str() {
                if let Ok(ip) = ip_str.parse::<IpAddr>() {
                    return ip;
                }
            }
        }
    }

    if let Some(ConnectInfo(socket_addr)) = request.extensions().get::<ConnectInfo<SocketAddr>>() {
        return socket_addr.ip();
    }

    IpAddr::from([127, 0, 0, 1])
}

/// Rate limiting gate, applied before any timing or authentication work
///
/// Denial short-circuits the chain with a 429 response; it is a terminal
/// outcome for the request, never an internal error. Responses that pass
/// the gate carry the advisory budget headers.
pub async fn rate_limit_middleware(
    State(limiter): State<RateLimiter>,
    request: Request,
    next: Next,
) -> Response {
    let client_ip = extract_client_ip(&request, limiter.config.trust_forwarded_headers);

    let decision = limiter.admit(client_ip).await;
    if !decision.allowed {
        // The warn line is emitted once, by the error response itself
        debug!("Rate limit exceeded for IP: {}", client_ip);
        return AppError::RateLimit.into_response();
    }

    debug!(remaining = decision.remaining, "Rate limit check passed for IP: {}", client_ip);

    let mut response = next.run(request).await;
    decision.add_headers(response.headers_mut());
    response
}
