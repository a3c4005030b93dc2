//! McpDir Storage Layer
//!
//! SQLite-backed implementation of the core repository traits.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │               Application                    │
//! ├──────────────────────────────────────────────┤
//! │   Repository Traits (ListingRepository)      │
//! ├──────────────────────────────────────────────┤
//! │  SQLite Implementations (SqliteListingRepo)  │
//! ├──────────────────────────────────────────────┤
//! │            Database (SQLite)                 │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use mcpdir_storage::{Database, SqliteListingRepository};
//! use std::sync::Arc;
//! use tokio::sync::Mutex;
//!
//! let db = Database::open(&path)?;
//! let db = Arc::new(Mutex::new(db));
//! let listing_repo = SqliteListingRepository::new(db.clone());
//! ```

mod database;
mod repositories;

pub use database::Database;
pub use repositories::*;

/// Default database file name.
pub const DATABASE_FILE: &str = "mcpdir.db";

/// Get the default database path for the current platform.
pub fn default_database_path() -> Option<std::path::PathBuf> {
    dirs::data_local_dir().map(|p| p.join("mcpdir").join(DATABASE_FILE))
}
