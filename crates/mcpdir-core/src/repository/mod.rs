//! Repository traits for data access
//!
//! These traits define the interface for listing storage without specifying
//! the implementation (SQLite, hosted Postgres, in-memory, etc.)

use async_trait::async_trait;

use crate::domain::{ListingQuery, PublicListing, VerificationUpdate};
use crate::registry::Listing;

/// Failure reported by a store
///
/// `NotFound` is the store's own "zero rows matched" signal and is kept
/// apart from every other query failure.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("no matching row")]
    NotFound,

    #[error("unique constraint violated: {0}")]
    Conflict(String),

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

/// Result type for repository operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Listing repository trait
#[async_trait]
pub trait ListingRepository: Send + Sync {
    /// Fetch the public projection of the listing with this slug.
    ///
    /// Expects at most one row; zero rows is `StoreError::NotFound`.
    async fn find_public_by_slug(&self, slug: &str) -> StoreResult<PublicListing>;

    /// Search listings, returning public projections
    async fn search(&self, query: &ListingQuery) -> StoreResult<Vec<PublicListing>>;

    /// Persist a validated listing. The store assigns id and timestamps and
    /// enforces slug uniqueness (`StoreError::Conflict`).
    async fn insert(&self, listing: &Listing) -> StoreResult<PublicListing>;

    /// Record a moderation decision
    async fn set_verification(
        &self,
        slug: &str,
        update: &VerificationUpdate,
    ) -> StoreResult<PublicListing>;
}
