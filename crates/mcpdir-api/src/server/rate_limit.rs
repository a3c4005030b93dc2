//! Simple per-client rate limiting middleware.
//!
//! Uses a DashMap to track request counts per (rule, client address) window.
//! The client address comes from `ConnectInfo<SocketAddr>`; requests without
//! it share one bucket. A slot is reserved before the handler runs and handed
//! back when the handler does not succeed, so only accepted requests count.

use axum::{
    extract::{ConnectInfo, Request},
    http::Method,
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::warn;

use crate::error::ApiError;

/// Configuration for a rate-limited route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// Maximum requests allowed within the window.
    pub max_requests: u32,
    /// Time window duration.
    pub window: Duration,
}

/// A limit applied to requests with `method` whose path starts with `prefix`.
#[derive(Debug, Clone)]
pub struct RateLimitRule {
    pub method: Method,
    pub prefix: String,
    pub config: RateLimitConfig,
}

impl RateLimitRule {
    fn key(&self, client: Option<IpAddr>) -> BucketKey {
        (format!("{} {}", self.method, self.prefix), client)
    }
}

type BucketKey = (String, Option<IpAddr>);

/// Shared rate limiter state (clone-friendly via Arc).
#[derive(Clone)]
pub struct RateLimiter {
    /// Map from (rule, client) → (window_start, request_count).
    buckets: Arc<DashMap<BucketKey, (Instant, u32)>>,
    rules: Arc<Vec<RateLimitRule>>,
}

impl RateLimiter {
    pub fn new(rules: Vec<RateLimitRule>) -> Self {
        Self {
            buckets: Arc::new(DashMap::new()),
            rules: Arc::new(rules),
        }
    }

    /// Limiter covering listing submissions
    pub fn for_submissions(config: RateLimitConfig) -> Self {
        Self::new(vec![RateLimitRule {
            method: Method::POST,
            prefix: "/api/servers".to_string(),
            config,
        }])
    }

    fn rule_for(&self, method: &Method, path: &str) -> Option<&RateLimitRule> {
        self.rules
            .iter()
            .find(|r| r.method == *method && path.starts_with(&r.prefix))
    }

    /// Returns `true` if the request is within limits (allowed), reserving
    /// one slot in `client`'s window.
    pub fn check(&self, client: Option<IpAddr>, method: &Method, path: &str) -> bool {
        let Some(rule) = self.rule_for(method, path) else {
            return true;
        };

        let mut entry = self
            .buckets
            .entry(rule.key(client))
            .or_insert_with(|| (Instant::now(), 0));
        let (window_start, count) = entry.value_mut();

        if window_start.elapsed() >= rule.config.window {
            *window_start = Instant::now();
            *count = 1;
            return true;
        }

        if *count >= rule.config.max_requests {
            return false;
        }

        *count += 1;
        true
    }

    /// Hand back a slot reserved by [`check`](Self::check)
    pub fn release(&self, client: Option<IpAddr>, method: &Method, path: &str) {
        let Some(rule) = self.rule_for(method, path) else {
            return;
        };
        if let Some(mut entry) = self.buckets.get_mut(&rule.key(client)) {
            let (_, count) = entry.value_mut();
            *count = count.saturating_sub(1);
        }
    }
}

/// Axum middleware function for rate limiting.
pub async fn rate_limit_middleware(request: Request, next: Next) -> Response {
    let Some(limiter) = request.extensions().get::<RateLimiter>().cloned() else {
        return next.run(request).await;
    };

    let client = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip());
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    if !limiter.check(client, &method, &path) {
        warn!(
            method = %method,
            path = %path,
            client = ?client,
            "[Api] Rate limit exceeded"
        );
        return ApiError::RateLimited.into_response();
    }

    let response = next.run(request).await;
    if !response.status().is_success() {
        limiter.release(client, &method, &path);
    }
    response
}
