//! HTTP Request/Response Logging Middleware
//!
//! One entry and one exit line per request, correlated by trace ID.
//! Request bodies are logged at DEBUG; credentials never are.
//! Bodies are buffered for logging only up to [`MAX_REQUEST_BODY_SIZE`];
//! anything larger is rejected with 413 before a handler runs.

use axum::{
    body::Body,
    extract::Request,
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use http_body_util::{BodyExt, LengthLimitError, Limited};
use tracing::{debug, warn, Instrument};

use crate::error::ApiError;
use crate::logging::{RequestSpan, TraceContext};

/// Maximum body size to log (64KB)
const MAX_BODY_LOG_SIZE: usize = 64 * 1024;

/// Largest request body the API accepts (64KB)
pub const MAX_REQUEST_BODY_SIZE: usize = 64 * 1024;

/// Header carrying the trace ID back to the caller
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Headers that should be redacted
const SENSITIVE_HEADERS: &[&str] = &["authorization", "cookie", "set-cookie", "x-api-key"];

/// Headers worth a DEBUG line, with credentials redacted
fn redact_headers_compact(headers: &HeaderMap) -> String {
    headers
        .iter()
        .filter(|(name, _)| {
            let n = name.as_str();
            matches!(n, "content-type" | "accept" | "user-agent" | "origin")
                || SENSITIVE_HEADERS.contains(&n)
        })
        .map(|(name, value)| {
            if SENSITIVE_HEADERS.contains(&name.as_str()) {
                format!("{}=[REDACTED]", name)
            } else {
                format!("{}={:?}", name, value)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format bytes as a compact, single-line string
pub fn format_body(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return "[empty]".to_string();
    }

    if bytes.len() > MAX_BODY_LOG_SIZE {
        return format!("[{} bytes]", bytes.len());
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => {
            if let Ok(json) = serde_json::from_str::<serde_json::Value>(text) {
                return json.to_string();
            }
            if text.chars().count() > 200 {
                format!("{}...", text.chars().take(200).collect::<String>())
            } else {
                text.to_string()
            }
        }
        Err(_) => format!("[binary: {} bytes]", bytes.len()),
    }
}

/// Declared Content-Length, when present and parseable
fn declared_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

/// Logging middleware for requests and responses
pub async fn http_logging_middleware(request: Request, next: Next) -> Response {
    let ctx = TraceContext::new(request.method().as_str(), request.uri().path());
    let span = RequestSpan::enter(&ctx);

    async move {
        RequestSpan::log_entry(&ctx);
        debug!(headers = %redact_headers_compact(request.headers()), "Request headers");

        let too_large = declared_length(request.headers())
            .is_some_and(|n| n > MAX_REQUEST_BODY_SIZE as u64);
        if too_large {
            warn!("Declared request body exceeds {} bytes", MAX_REQUEST_BODY_SIZE);
            let response = ApiError::PayloadTooLarge.into_response();
            RequestSpan::log_exit(&ctx, response.status().as_u16());
            return response;
        }

        let (parts, body) = request.into_parts();
        let body_bytes = match Limited::new(body, MAX_REQUEST_BODY_SIZE).collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) => {
                let error = if e.is::<LengthLimitError>() {
                    warn!("Request body exceeds {} bytes", MAX_REQUEST_BODY_SIZE);
                    ApiError::PayloadTooLarge
                } else {
                    warn!("Failed to read request body: {}", e);
                    ApiError::InvalidBody
                };
                let response = error.into_response();
                RequestSpan::log_exit(&ctx, response.status().as_u16());
                return response;
            }
        };

        if !body_bytes.is_empty() {
            debug!(body = %format_body(&body_bytes), "Request body");
        }

        let mut request = Request::from_parts(parts, Body::from(body_bytes));
        request.extensions_mut().insert(ctx.clone());

        let mut response = next.run(request).await;

        if let Ok(value) = HeaderValue::from_str(&ctx.trace_id) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }

        RequestSpan::log_exit(&ctx, response.status().as_u16());
        response
    }
    .instrument(span)
    .await
}
