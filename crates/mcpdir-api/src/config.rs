//! API server configuration
//!
//! Resolved once at startup by the binary and passed in; handlers never read
//! the process environment.

use std::net::SocketAddr;
use std::time::Duration;

use crate::server::rate_limit::RateLimitConfig;

/// Default listen port
pub const DEFAULT_PORT: u16 = 8787;

/// Shared-cache directive for successful public reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    /// How long shared caches (CDN, proxies) may serve the payload as fresh
    pub shared_max_age: Duration,
    /// Grace period during which a stale copy may be served while revalidating
    pub stale_while_revalidate: Duration,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            shared_max_age: Duration::from_secs(300),
            stale_while_revalidate: Duration::from_secs(60),
        }
    }
}

impl CachePolicy {
    /// Render as a `Cache-Control` value. Browsers always revalidate
    /// (`max-age=0`); only shared caches hold the payload.
    pub fn header_value(&self) -> String {
        format!(
            "public, max-age=0, s-maxage={}, stale-while-revalidate={}",
            self.shared_max_age.as_secs(),
            self.stale_while_revalidate.as_secs()
        )
    }
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Enable CORS for browser access
    pub enable_cors: bool,
    /// Public site origin; when set, CORS is restricted to it
    pub site_url: Option<String>,
    /// Cache directive for public reads
    pub cache: CachePolicy,
    /// Bearer token for moderation routes; routes are not mounted without it
    pub admin_token: Option<String>,
    /// Submission rate limit
    pub submission_limit: RateLimitConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            enable_cors: true,
            site_url: None,
            cache: CachePolicy::default(),
            admin_token: None,
            submission_limit: RateLimitConfig {
                max_requests: 10,
                window: Duration::from_secs(60),
            },
        }
    }
}

impl ApiConfig {
    /// Get the socket address
    pub fn addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid listen address {}:{}: {}", self.host, self.port, e))
    }

    pub fn with_admin_token(mut self, token: impl Into<String>) -> Self {
        self.admin_token = Some(token.into());
        self
    }

    pub fn with_cache(mut self, cache: CachePolicy) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_site_url(mut self, site_url: impl Into<String>) -> Self {
        self.site_url = Some(site_url.into());
        self
    }
}
