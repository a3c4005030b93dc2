//! Listing schema
//!
//! The canonical shape of a directory listing after validation. Store-owned
//! fields (id, timestamps, verification state) live on
//! [`PublicListing`](crate::domain::PublicListing), not here.

use super::types::*;
use serde::{Deserialize, Serialize};

/// Version marker attached to validator output
pub const LISTING_SCHEMA_VERSION: &str = "v1";

/// Name length bounds, in characters
pub const NAME_MAX_LEN: usize = 100;

/// Description length bounds, in characters
pub const DESCRIPTION_MAX_LEN: usize = 500;

/// Per-tag length bounds before normalization
pub const TAG_MAX_LEN: usize = 50;

/// A validated, normalized listing ready to hand to the store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Listing {
    /// URL-safe unique identifier
    pub slug: String,

    /// Human-readable display name
    pub name: String,

    /// Short description
    pub description: String,

    pub transport: Transport,

    pub auth: AuthKind,

    pub homepage_url: Option<String>,

    pub repo_url: Option<String>,

    pub docs_url: Option<String>,

    /// Normalized, deduplicated, at most ten entries
    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub capabilities: Capabilities,
}

/// Validator output: the listing plus the schema version it was checked against
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ValidatedListing {
    pub schema_version: &'static str,
    #[serde(flatten)]
    pub listing: Listing,
}

impl ValidatedListing {
    pub fn new(listing: Listing) -> Self {
        Self {
            schema_version: LISTING_SCHEMA_VERSION,
            listing,
        }
    }

    pub fn into_inner(self) -> Listing {
        self.listing
    }
}
