//! Mock repository implementations for testing
//!
//! In-memory ListingRepository with failure injection for fast, isolated tests.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;
use uuid::Uuid;

use mcpdir_core::{
    Listing, ListingQuery, ListingRepository, PublicListing, StoreError, StoreResult,
    VerificationUpdate,
};

/// How the mock should misbehave
#[derive(Debug, Clone)]
enum Failure {
    Backend(String),
    Panic(String),
}

// ============================================================================
// MockListingRepository
// ============================================================================

#[derive(Default)]
pub struct MockListingRepository {
    listings: RwLock<Vec<PublicListing>>,
    notes: RwLock<Vec<(String, String)>>,
    failure: RwLock<Option<Failure>>,
    calls: AtomicUsize,
}

impl MockListingRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_listing(self, listing: PublicListing) -> Self {
        self.listings.write().unwrap().push(listing);
        self
    }

    /// Every call fails with a backend error carrying `detail`
    pub fn failing_with(self, detail: &str) -> Self {
        *self.failure.write().unwrap() = Some(Failure::Backend(detail.to_string()));
        self
    }

    /// Every call panics with `detail`
    pub fn panicking_with(self, detail: &str) -> Self {
        *self.failure.write().unwrap() = Some(Failure::Panic(detail.to_string()));
        self
    }

    /// Number of repository calls made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Moderation notes recorded for `slug`, newest last
    pub fn notes_for(&self, slug: &str) -> Vec<String> {
        self.notes
            .read()
            .unwrap()
            .iter()
            .filter(|(s, _)| s == slug)
            .map(|(_, n)| n.clone())
            .collect()
    }

    fn enter(&self) -> StoreResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let failure = self.failure.read().unwrap().clone();
        match failure {
            None => Ok(()),
            Some(Failure::Backend(detail)) => Err(StoreError::Backend(anyhow::anyhow!(detail))),
            Some(Failure::Panic(detail)) => panic!("{}", detail),
        }
    }

    fn matches(listing: &PublicListing, query: &ListingQuery) -> bool {
        if let Some(text) = &query.text {
            let text = text.to_lowercase();
            let hit = [&listing.slug, &listing.name, &listing.description]
                .iter()
                .any(|field| field.to_lowercase().contains(&text));
            if !hit {
                return false;
            }
        }
        if let Some(tag) = &query.tag {
            if !listing.tags.contains(tag) {
                return false;
            }
        }
        if query.transport.is_some_and(|t| t != listing.transport) {
            return false;
        }
        if query.auth.is_some_and(|a| a != listing.auth) {
            return false;
        }
        !query.verified_only || listing.verified
    }
}

#[async_trait]
impl ListingRepository for MockListingRepository {
    async fn find_public_by_slug(&self, slug: &str) -> StoreResult<PublicListing> {
        self.enter()?;
        self.listings
            .read()
            .unwrap()
            .iter()
            .find(|l| l.slug == slug)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn search(&self, query: &ListingQuery) -> StoreResult<Vec<PublicListing>> {
        self.enter()?;
        let mut hits: Vec<PublicListing> = self
            .listings
            .read()
            .unwrap()
            .iter()
            .filter(|l| Self::matches(l, query))
            .cloned()
            .collect();
        hits.sort_by(|a, b| {
            b.verified
                .cmp(&a.verified)
                .then(b.created_at.cmp(&a.created_at))
                .then(a.slug.cmp(&b.slug))
        });
        Ok(hits
            .into_iter()
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .collect())
    }

    async fn insert(&self, listing: &Listing) -> StoreResult<PublicListing> {
        self.enter()?;
        let mut listings = self.listings.write().unwrap();
        if listings.iter().any(|l| l.slug == listing.slug) {
            return Err(StoreError::Conflict(listing.slug.clone()));
        }
        let now = Utc::now();
        let created = PublicListing {
            id: Uuid::new_v4(),
            slug: listing.slug.clone(),
            name: listing.name.clone(),
            description: listing.description.clone(),
            homepage_url: listing.homepage_url.clone(),
            repo_url: listing.repo_url.clone(),
            docs_url: listing.docs_url.clone(),
            tags: listing.tags.clone(),
            transport: listing.transport,
            auth: listing.auth,
            capabilities: listing.capabilities,
            verified: false,
            verified_at: None,
            created_at: now,
            updated_at: now,
        };
        listings.push(created.clone());
        Ok(created)
    }

    async fn set_verification(
        &self,
        slug: &str,
        update: &VerificationUpdate,
    ) -> StoreResult<PublicListing> {
        self.enter()?;
        let mut listings = self.listings.write().unwrap();
        let listing = listings
            .iter_mut()
            .find(|l| l.slug == slug)
            .ok_or(StoreError::NotFound)?;
        let now = Utc::now();
        listing.verified_at = match (update.verified, listing.verified) {
            (true, true) => listing.verified_at.or(Some(now)),
            (true, false) => Some(now),
            (false, _) => None,
        };
        listing.verified = update.verified;
        listing.updated_at = now;
        if let Some(notes) = &update.notes {
            self.notes
                .write()
                .unwrap()
                .push((slug.to_string(), notes.clone()));
        }
        Ok(listing.clone())
    }
}
