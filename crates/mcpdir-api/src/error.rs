//! HTTP error contract
//!
//! Every failure a handler can return maps to a fixed status and a short
//! user-safe message. Store details are logged here and never serialized.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use mcpdir_core::{format_validation_errors, ListingError};
use serde::Serialize;
use tracing::error;

/// Which store operation failed, for the user-facing message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOp {
    Fetch,
    Search,
    Create,
    Update,
}

impl StoreOp {
    fn message(&self) -> &'static str {
        match self {
            Self::Fetch => "Failed to fetch server",
            Self::Search => "Failed to fetch servers",
            Self::Create => "Failed to create server",
            Self::Update => "Failed to update server",
        }
    }
}

/// Errors returned by API handlers
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid slug format")]
    InvalidSlug,

    #[error("invalid query parameters")]
    InvalidQuery,

    #[error("invalid JSON body")]
    InvalidBody,

    #[error("request body too large")]
    PayloadTooLarge,

    #[error("validation failed")]
    Validation(Vec<String>),

    #[error("unauthorized")]
    Unauthorized,

    #[error("server not found")]
    NotFound,

    #[error("slug already taken")]
    SlugTaken,

    #[error("rate limited")]
    RateLimited,

    #[error("store failure during {0:?}")]
    Store(StoreOp),

    #[error("internal server error")]
    Internal,
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<String>>,
}

impl ApiError {
    /// Map a service error for operation `op`, logging store failures in full
    pub fn from_listing(err: ListingError, op: StoreOp) -> Self {
        match err {
            ListingError::InvalidSlug => Self::InvalidSlug,
            ListingError::NotFound => Self::NotFound,
            ListingError::SlugTaken => Self::SlugTaken,
            ListingError::Invalid(errors) => Self::Validation(format_validation_errors(&errors)),
            ListingError::Store(e) => {
                error!(operation = ?op, error = %format!("{:#}", e), "[Api] Store failure");
                Self::Store(op)
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidSlug | Self::InvalidQuery | Self::InvalidBody | Self::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::SlugTaken => StatusCode::CONFLICT,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::Store(_) | Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            Self::InvalidSlug => "Invalid slug format",
            Self::InvalidQuery => "Invalid query parameters",
            Self::InvalidBody => "Invalid JSON body",
            Self::Validation(_) => "Validation failed",
            Self::PayloadTooLarge => "Request body too large",
            Self::Unauthorized => "Unauthorized",
            Self::NotFound => "Server not found",
            Self::SlugTaken => "Slug already taken",
            Self::RateLimited => "Rate limit exceeded. Please try again later.",
            Self::Store(op) => op.message(),
            Self::Internal => "Internal server error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();
        let details = match self {
            Self::Validation(details) => Some(details),
            _ => None,
        };
        (
            status,
            Json(ErrorBody {
                error: message,
                details,
            }),
        )
            .into_response()
    }
}
