//! Stored listings and their public projection

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::registry::{normalize_tag, AuthKind, Capabilities, Transport};

/// Columns the public API is allowed to read, in response order.
///
/// Anything the store holds beyond these (moderation notes, submitter data)
/// never leaves the service, whatever the table grows into.
pub const PUBLIC_COLUMNS: &[&str] = &[
    "id",
    "slug",
    "name",
    "description",
    "homepage_url",
    "repo_url",
    "docs_url",
    "tags",
    "transport",
    "auth",
    "capabilities",
    "verified",
    "verified_at",
    "created_at",
    "updated_at",
];

/// Public view of a stored listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PublicListing {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub homepage_url: Option<String>,
    pub repo_url: Option<String>,
    pub docs_url: Option<String>,
    pub tags: Vec<String>,
    pub transport: Transport,
    pub auth: AuthKind,
    pub capabilities: Capabilities,
    pub verified: bool,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Default page size for listing searches
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Upper bound on page size
pub const MAX_PAGE_SIZE: u32 = 100;

/// Browse/search filters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingQuery {
    /// Case-insensitive substring over slug, name and description
    pub text: Option<String>,
    /// Exact normalized tag
    pub tag: Option<String>,
    pub transport: Option<Transport>,
    pub auth: Option<AuthKind>,
    pub verified_only: bool,
    pub limit: u32,
    pub offset: u32,
}

impl ListingQuery {
    pub fn new() -> Self {
        Self {
            limit: DEFAULT_PAGE_SIZE,
            ..Default::default()
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_transport(mut self, transport: Transport) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn with_auth(mut self, auth: AuthKind) -> Self {
        self.auth = Some(auth);
        self
    }

    pub fn verified_only(mut self) -> Self {
        self.verified_only = true;
        self
    }

    pub fn with_page(mut self, limit: u32, offset: u32) -> Self {
        self.limit = limit;
        self.offset = offset;
        self
    }

    /// Canonical form handed to repositories: tag normalized, blank filters
    /// dropped, page size clamped to `1..=MAX_PAGE_SIZE`. Idempotent.
    pub fn normalized(mut self) -> Self {
        self.tag = self
            .tag
            .map(|t| normalize_tag(&t))
            .filter(|t| !t.is_empty());
        self.text = self
            .text
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        self.limit = self.limit.clamp(1, MAX_PAGE_SIZE);
        self
    }
}

/// Moderator decision on a listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VerificationUpdate {
    pub verified: bool,
    /// Internal note, stored but never exposed publicly
    #[serde(default)]
    pub notes: Option<String>,
}
