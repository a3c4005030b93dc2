//! SQLite implementation of ListingRepository.

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use mcpdir_core::{
    AuthKind, Capabilities, Listing, ListingQuery, ListingRepository, PublicListing, StoreError,
    StoreResult, Transport, VerificationUpdate, PUBLIC_COLUMNS,
};
use rusqlite::types::{Type, Value};
use rusqlite::params;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use crate::Database;

/// SQLite-backed implementation of ListingRepository.
pub struct SqliteListingRepository {
    db: Arc<Mutex<Database>>,
}

impl SqliteListingRepository {
    /// Create a new SQLite listing repository.
    pub fn new(db: Arc<Mutex<Database>>) -> Self {
        Self { db }
    }

    /// SELECT list for public reads, derived from the allow-list so the two
    /// cannot drift apart.
    fn select_columns() -> String {
        PUBLIC_COLUMNS.join(", ")
    }

    fn format_datetime(dt: &DateTime<Utc>) -> String {
        dt.to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    fn conversion_error<E>(idx: usize, err: E) -> rusqlite::Error
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
    }

    /// Parse a stored datetime: RFC 3339, or SQLite's `datetime('now')` format.
    fn parse_datetime(idx: usize, s: &str) -> rusqlite::Result<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(dt.with_timezone(&Utc));
        }
        chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
            .map(|dt| dt.and_utc())
            .map_err(|e| Self::conversion_error(idx, e))
    }

    /// Map a row selected with [`Self::select_columns`] to PublicListing
    fn map_row(row: &rusqlite::Row) -> rusqlite::Result<PublicListing> {
        let id: String = row.get(0)?;
        let tags: String = row.get(7)?;
        let transport: String = row.get(8)?;
        let auth: String = row.get(9)?;
        let capabilities: String = row.get(10)?;
        let verified_at: Option<String> = row.get(12)?;
        let created_at: String = row.get(13)?;
        let updated_at: String = row.get(14)?;

        Ok(PublicListing {
            id: Uuid::parse_str(&id).map_err(|e| Self::conversion_error(0, e))?,
            slug: row.get(1)?,
            name: row.get(2)?,
            description: row.get(3)?,
            homepage_url: row.get(4)?,
            repo_url: row.get(5)?,
            docs_url: row.get(6)?,
            tags: serde_json::from_str(&tags).map_err(|e| Self::conversion_error(7, e))?,
            transport: transport
                .parse::<Transport>()
                .map_err(|e| Self::conversion_error(8, e))?,
            auth: auth
                .parse::<AuthKind>()
                .map_err(|e| Self::conversion_error(9, e))?,
            capabilities: serde_json::from_str::<Capabilities>(&capabilities)
                .map_err(|e| Self::conversion_error(10, e))?,
            verified: row.get(11)?,
            verified_at: verified_at
                .map(|s| Self::parse_datetime(12, &s))
                .transpose()?,
            created_at: Self::parse_datetime(13, &created_at)?,
            updated_at: Self::parse_datetime(14, &updated_at)?,
        })
    }

    /// Single-row public lookup; zero rows becomes `StoreError::NotFound`
    fn select_by_slug(conn: &rusqlite::Connection, slug: &str) -> StoreResult<PublicListing> {
        let sql = format!(
            "SELECT {} FROM listings WHERE slug = ?1",
            Self::select_columns()
        );
        conn.query_row(&sql, [slug], Self::map_row)
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                other => StoreError::Backend(
                    anyhow::Error::new(other).context(format!("Failed to load listing '{}'", slug)),
                ),
            })
    }

    /// Escape LIKE wildcards so user text matches literally
    fn like_pattern(text: &str) -> String {
        let escaped = text
            .replace('\\', "\\\\")
            .replace('%', "\\%")
            .replace('_', "\\_");
        format!("%{}%", escaped)
    }

    fn is_unique_violation(err: &rusqlite::Error) -> bool {
        matches!(
            err,
            rusqlite::Error::SqliteFailure(e, _)
                if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        )
    }
}

#[async_trait]
impl ListingRepository for SqliteListingRepository {
    async fn find_public_by_slug(&self, slug: &str) -> StoreResult<PublicListing> {
        let db = self.db.lock().await;
        Self::select_by_slug(db.connection(), slug)
    }

    async fn search(&self, query: &ListingQuery) -> StoreResult<Vec<PublicListing>> {
        let mut clauses: Vec<&str> = Vec::new();
        let mut values: Vec<Value> = Vec::new();

        if let Some(text) = &query.text {
            clauses.push(
                "(slug LIKE ? ESCAPE '\\' OR name LIKE ? ESCAPE '\\' OR description LIKE ? ESCAPE '\\')",
            );
            let pattern = Self::like_pattern(text);
            values.extend(std::iter::repeat(Value::Text(pattern)).take(3));
        }
        if let Some(tag) = &query.tag {
            clauses.push("EXISTS (SELECT 1 FROM json_each(listings.tags) WHERE json_each.value = ?)");
            values.push(Value::Text(tag.clone()));
        }
        if let Some(transport) = query.transport {
            clauses.push("transport = ?");
            values.push(Value::Text(transport.as_str().to_string()));
        }
        if let Some(auth) = query.auth {
            clauses.push("auth = ?");
            values.push(Value::Text(auth.as_str().to_string()));
        }
        if query.verified_only {
            clauses.push("verified = 1");
        }

        let where_clause = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };

        values.push(Value::Integer(i64::from(query.limit)));
        values.push(Value::Integer(i64::from(query.offset)));

        let sql = format!(
            "SELECT {} FROM listings {} ORDER BY verified DESC, created_at DESC, slug ASC LIMIT ? OFFSET ?",
            Self::select_columns(),
            where_clause
        );

        debug!(filters = clauses.len(), limit = query.limit, offset = query.offset, "[Store] Searching listings");

        let db = self.db.lock().await;
        let conn = db.connection();
        let mut stmt = conn.prepare(&sql).context("Failed to prepare listing search")?;
        let listings = stmt
            .query_map(rusqlite::params_from_iter(values.iter()), Self::map_row)
            .context("Failed to run listing search")?
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to read listing search results")?;

        Ok(listings)
    }

    async fn insert(&self, listing: &Listing) -> StoreResult<PublicListing> {
        // Stored timestamps carry microseconds; match so the returned value
        // equals a later read
        let now = Utc::now().trunc_subsecs(6);
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

        let tags = serde_json::to_string(&created.tags).context("Failed to encode tags")?;
        let capabilities =
            serde_json::to_string(&created.capabilities).context("Failed to encode capabilities")?;
        let timestamp = Self::format_datetime(&now);

        let db = self.db.lock().await;
        let result = db.connection().execute(
            "INSERT INTO listings (id, slug, name, description, homepage_url, repo_url, docs_url,
                                   tags, transport, auth, capabilities, verified, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, 0, ?12, ?12)",
            params![
                created.id.to_string(),
                created.slug,
                created.name,
                created.description,
                created.homepage_url,
                created.repo_url,
                created.docs_url,
                tags,
                created.transport.as_str(),
                created.auth.as_str(),
                capabilities,
                timestamp,
            ],
        );

        match result {
            Ok(_) => Ok(created),
            Err(e) if Self::is_unique_violation(&e) => Err(StoreError::Conflict(listing.slug.clone())),
            Err(e) => Err(StoreError::Backend(
                anyhow::Error::new(e).context(format!("Failed to insert listing '{}'", listing.slug)),
            )),
        }
    }

    async fn set_verification(
        &self,
        slug: &str,
        update: &VerificationUpdate,
    ) -> StoreResult<PublicListing> {
        let now = Self::format_datetime(&Utc::now());
        let verified_at = update.verified.then(|| now.clone());

        let db = self.db.lock().await;
        let conn = db.connection();
        // A repeat verification keeps the time the listing was first verified
        let changed = conn
            .execute(
                "UPDATE listings
                 SET verified = ?1,
                     verified_at = CASE
                         WHEN ?1 AND verified = 1 AND verified_at IS NOT NULL THEN verified_at
                         ELSE ?2
                     END,
                     moderation_notes = COALESCE(?3, moderation_notes),
                     updated_at = ?4
                 WHERE slug = ?5",
                params![update.verified, verified_at, update.notes, now, slug],
            )
            .with_context(|| format!("Failed to update verification for '{}'", slug))?;

        if changed == 0 {
            return Err(StoreError::NotFound);
        }

        Self::select_by_slug(conn, slug)
    }
}
