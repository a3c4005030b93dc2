//! API Server
//!
//! HTTP server exposing the directory over JSON.
//! The listing store is injected, so the same router runs against SQLite in
//! production and against in-memory doubles in tests.

mod handlers;
pub mod logging_middleware;
pub mod rate_limit;
mod state;

pub use handlers::{HealthResponse, ListParams};
pub use state::AppState;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use std::any::Any;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::config::ApiConfig;
use crate::error::ApiError;
use mcpdir_core::ListingRepository;
use rate_limit::RateLimiter;

/// Convert a handler panic into the generic 500 contract
fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!(panic = %detail, "[Api] Handler panicked");
    ApiError::Internal.into_response()
}

fn cors_layer(config: &ApiConfig) -> Option<CorsLayer> {
    if !config.enable_cors {
        return None;
    }

    let origin = match config.site_url.as_deref() {
        None => AllowOrigin::from(AnyOrigin),
        Some(site) => match HeaderValue::from_str(site.trim_end_matches('/')) {
            Ok(value) => AllowOrigin::exact(value),
            Err(e) => {
                warn!("[Api] Ignoring unusable site URL {:?} for CORS: {}", site, e);
                return None;
            }
        },
    };

    Some(
        CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
    )
}

/// Build the directory router over `state`
pub fn router(state: AppState) -> Router {
    let config = state.config.clone();

    let mut routes = Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/api/servers",
            get(handlers::list_servers).post(handlers::submit_server),
        )
        .route("/api/servers/", get(handlers::get_server_without_slug))
        .route("/api/servers/{slug}", get(handlers::get_server));

    if config.admin_token.is_some() {
        routes = routes.route(
            "/api/admin/servers/{slug}/verification",
            post(handlers::set_verification),
        );
    }

    let rate_limiter = RateLimiter::for_submissions(config.submission_limit);

    let router = routes
        .with_state(state)
        .layer(DefaultBodyLimit::max(logging_middleware::MAX_REQUEST_BODY_SIZE))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn(rate_limit::rate_limit_middleware))
        .layer(axum::Extension(rate_limiter))
        .layer(middleware::from_fn(
            logging_middleware::http_logging_middleware,
        ))
        .layer(TraceLayer::new_for_http());

    match cors_layer(&config) {
        Some(cors) => router.layer(cors),
        None => router,
    }
}

/// McpDir API Server
pub struct ApiServer {
    config: Arc<ApiConfig>,
    state: AppState,
}

impl ApiServer {
    /// Create a new server over the given listing store
    pub fn new(config: ApiConfig, repository: Arc<dyn ListingRepository>) -> Self {
        let state = AppState::new(config, repository);
        Self {
            config: state.config.clone(),
            state,
        }
    }

    pub fn state(&self) -> AppState {
        self.state.clone()
    }

    pub fn router(&self) -> Router {
        router(self.state.clone())
    }

    /// Run the server until the process exits
    pub async fn run(self) -> anyhow::Result<()> {
        self.run_until(std::future::pending()).await
    }

    /// Run the server until `shutdown` resolves, then drain in-flight requests
    pub async fn run_until<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.addr()?;

        info!("[Api] Starting on {}", addr);
        info!(
            "[Api] CORS: {}",
            match (self.config.enable_cors, self.config.site_url.as_deref()) {
                (false, _) => "disabled".to_string(),
                (true, None) => "any origin".to_string(),
                (true, Some(site)) => site.to_string(),
            }
        );
        if self.config.admin_token.is_some() {
            info!("[Api] Moderation routes: enabled");
        } else {
            warn!("[Api] Moderation routes: disabled (no admin token configured)");
        }

        let router = self.router();
        let listener = tokio::net::TcpListener::bind(addr).await?;

        info!("[Api] Ready to accept connections");

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown)
        .await?;

        info!("[Api] Stopped");
        Ok(())
    }

    /// Start the server in the background
    ///
    /// Returns a JoinHandle that can be used to wait for completion or abort.
    pub fn spawn(self) -> tokio::task::JoinHandle<anyhow::Result<()>> {
        tokio::spawn(async move { self.run().await })
    }
}
