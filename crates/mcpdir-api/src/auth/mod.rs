//! Moderator authentication
//!
//! Admin routes require `Authorization: Bearer <token>` matching the
//! configured admin token. Tokens are compared through HMAC tags so the
//! comparison does not leak timing.

use axum::{extract::FromRequestParts, http::request::Parts};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tracing::{debug, warn};

use crate::error::ApiError;
use crate::server::AppState;

type HmacSha256 = Hmac<Sha256>;

const TOKEN_TAG_CONTEXT: &[u8] = b"mcpdir-admin-token";

fn token_tag(token: &str) -> Option<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(token.as_bytes()).ok()?;
    mac.update(TOKEN_TAG_CONTEXT);
    Some(mac)
}

/// Constant-time comparison of a presented token against the expected one
pub fn tokens_match(expected: &str, presented: &str) -> bool {
    let (Some(expected), Some(presented)) = (token_tag(expected), token_tag(presented)) else {
        return false;
    };
    let expected = expected.finalize().into_bytes();
    presented.verify_slice(&expected).is_ok()
}

/// Extract the bearer credential from an Authorization header value.
/// The scheme name is case-insensitive.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim_start().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    Some(token.trim()).filter(|t| !t.is_empty())
}

/// Proof that the request carried the admin token
#[derive(Debug, Clone, Copy)]
pub struct AdminAuth;

impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.config.admin_token.as_deref() else {
            warn!("[Api] Admin request with no admin token configured");
            return Err(ApiError::Unauthorized);
        };

        let presented = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(bearer_token)
            .ok_or(ApiError::Unauthorized)?;

        if !tokens_match(expected, presented) {
            warn!("[Api] Admin token mismatch");
            return Err(ApiError::Unauthorized);
        }

        debug!("[Api] Admin request authenticated");
        Ok(AdminAuth)
    }
}
