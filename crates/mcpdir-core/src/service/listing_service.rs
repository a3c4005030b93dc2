//! Listing service - the read, submit and moderate paths over a repository

use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::{ListingQuery, PublicListing, VerificationUpdate};
use crate::registry::{is_valid_slug, validate_listing, ValidationErrors};
use crate::repository::{ListingRepository, StoreError};

/// Why a listing operation did not produce a listing
#[derive(Debug, thiserror::Error)]
pub enum ListingError {
    /// The slug failed the format check; the store was not consulted
    #[error("invalid slug format")]
    InvalidSlug,

    #[error("listing not found")]
    NotFound,

    #[error(transparent)]
    Invalid(#[from] ValidationErrors),

    #[error("slug already taken")]
    SlugTaken,

    /// Any other store failure; carries the detail for server-side logging
    #[error("store failure: {0}")]
    Store(anyhow::Error),
}

impl From<StoreError> for ListingError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => Self::NotFound,
            StoreError::Conflict(_) => Self::SlugTaken,
            StoreError::Backend(e) => Self::Store(e),
        }
    }
}

/// Service for reading and writing directory listings
pub struct ListingService {
    repository: Arc<dyn ListingRepository>,
}

impl ListingService {
    /// Create a new ListingService
    pub fn new(repository: Arc<dyn ListingRepository>) -> Self {
        Self { repository }
    }

    /// Fetch one listing by slug. Malformed slugs never reach the store.
    pub async fn get_by_slug(&self, slug: &str) -> Result<PublicListing, ListingError> {
        if !is_valid_slug(slug) {
            debug!(slug = %slug, "Rejected malformed slug");
            return Err(ListingError::InvalidSlug);
        }
        Ok(self.repository.find_public_by_slug(slug).await?)
    }

    /// Search listings. Repositories always receive the normalized query.
    pub async fn search(&self, query: ListingQuery) -> Result<Vec<PublicListing>, ListingError> {
        Ok(self.repository.search(&query.normalized()).await?)
    }

    /// Validate a raw submission and hand it to the store
    pub async fn submit(&self, raw: &serde_json::Value) -> Result<PublicListing, ListingError> {
        let listing = validate_listing(raw)?.into_inner();
        let created = self.repository.insert(&listing).await?;
        info!(slug = %created.slug, id = %created.id, "Listing submitted");
        Ok(created)
    }

    /// Apply a moderation decision
    pub async fn set_verification(
        &self,
        slug: &str,
        update: &VerificationUpdate,
    ) -> Result<PublicListing, ListingError> {
        if !is_valid_slug(slug) {
            return Err(ListingError::InvalidSlug);
        }
        let updated = self.repository.set_verification(slug, update).await?;
        info!(slug = %slug, verified = update.verified, "Listing verification updated");
        Ok(updated)
    }
}
