//! McpDir API
//!
//! HTTP surface of the MCP server directory:
//! - Public read-by-slug with shared-cache headers
//! - Filtered search
//! - Validated submissions, rate limited
//! - Token-protected moderation

pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod server;

pub use auth::AdminAuth;
pub use config::{ApiConfig, CachePolicy, DEFAULT_PORT};
pub use error::{ApiError, StoreOp};
pub use server::logging_middleware::{MAX_REQUEST_BODY_SIZE, REQUEST_ID_HEADER};
pub use server::rate_limit::{RateLimitConfig, RateLimiter};
pub use server::{router, ApiServer, AppState};
