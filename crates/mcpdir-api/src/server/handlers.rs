//! HTTP handlers for the directory API

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use mcpdir_core::{
    AuthKind, ListingQuery, PublicListing, Transport, VerificationUpdate, DEFAULT_PAGE_SIZE,
};

use super::state::AppState;
use crate::auth::AdminAuth;
use crate::config::CachePolicy;
use crate::error::{ApiError, StoreOp};

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    debug!("[Api] Health check");
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Serialize `body` by hand so a serialization failure still yields the
/// JSON error contract instead of a bare 500.
fn json_response<T: Serialize>(
    status: StatusCode,
    body: &T,
    cache: Option<&CachePolicy>,
) -> Result<Response, ApiError> {
    let bytes = serde_json::to_vec(body).map_err(|e| {
        error!(error = %e, "[Api] Failed to serialize response");
        ApiError::Internal
    })?;

    let mut response = (
        status,
        [(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))],
        bytes,
    )
        .into_response();

    if let Some(cache) = cache {
        let value = HeaderValue::from_str(&cache.header_value()).map_err(|e| {
            error!(error = %e, "[Api] Invalid Cache-Control value");
            ApiError::Internal
        })?;
        response.headers_mut().insert(header::CACHE_CONTROL, value);
    }

    Ok(response)
}

/// GET /api/servers/{slug}
pub async fn get_server(
    State(state): State<AppState>,
    slug: Result<Path<String>, PathRejection>,
) -> Result<Response, ApiError> {
    let Path(slug) = slug.map_err(|e| {
        debug!(error = %e, "[Api] Unreadable slug segment");
        ApiError::InvalidSlug
    })?;

    let listing = state
        .listings
        .get_by_slug(&slug)
        .await
        .map_err(|e| ApiError::from_listing(e, StoreOp::Fetch))?;

    json_response(StatusCode::OK, &listing, Some(&state.config.cache))
}

/// GET /api/servers/ (empty slug segment)
pub async fn get_server_without_slug() -> ApiError {
    ApiError::InvalidSlug
}

/// Query string accepted by the search endpoint
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub q: Option<String>,
    pub tag: Option<String>,
    pub transport: Option<Transport>,
    pub auth: Option<AuthKind>,
    #[serde(default)]
    pub verified: bool,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl ListParams {
    pub fn into_query(self) -> ListingQuery {
        let mut query = ListingQuery::new();
        if let Some(q) = self.q {
            query = query.with_text(q);
        }
        if let Some(tag) = self.tag {
            query = query.with_tag(tag);
        }
        if let Some(transport) = self.transport {
            query = query.with_transport(transport);
        }
        if let Some(auth) = self.auth {
            query = query.with_auth(auth);
        }
        if self.verified {
            query = query.verified_only();
        }
        let limit = self.limit.unwrap_or(DEFAULT_PAGE_SIZE);
        query
            .with_page(limit, self.offset.unwrap_or_default())
            .normalized()
    }
}

#[derive(Serialize)]
struct ListResponse {
    servers: Vec<PublicListing>,
    limit: u32,
    offset: u32,
}

/// GET /api/servers
pub async fn list_servers(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(params) = params.map_err(|e| {
        debug!(error = %e, "[Api] Rejected query string");
        ApiError::InvalidQuery
    })?;

    let query = params.into_query();
    let (limit, offset) = (query.limit, query.offset);

    let servers = state
        .listings
        .search(query)
        .await
        .map_err(|e| ApiError::from_listing(e, StoreOp::Search))?;

    json_response(
        StatusCode::OK,
        &ListResponse {
            servers,
            limit,
            offset,
        },
        Some(&state.config.cache),
    )
}

/// POST /api/servers
pub async fn submit_server(
    State(state): State<AppState>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(raw) = body.map_err(|e| {
        debug!(error = %e, "[Api] Rejected submission body");
        ApiError::InvalidBody
    })?;

    let created = state
        .listings
        .submit(&raw)
        .await
        .map_err(|e| ApiError::from_listing(e, StoreOp::Create))?;

    json_response(StatusCode::CREATED, &created, None)
}

/// POST /api/admin/servers/{slug}/verification
pub async fn set_verification(
    _admin: AdminAuth,
    State(state): State<AppState>,
    slug: Result<Path<String>, PathRejection>,
    body: Result<Json<VerificationUpdate>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Path(slug) = slug.map_err(|_| ApiError::InvalidSlug)?;
    let Json(update) = body.map_err(|e| {
        debug!(error = %e, "[Api] Rejected verification body");
        ApiError::InvalidBody
    })?;

    let updated = state
        .listings
        .set_verification(&slug, &update)
        .await
        .map_err(|e| ApiError::from_listing(e, StoreOp::Update))?;

    json_response(StatusCode::OK, &updated, None)
}
