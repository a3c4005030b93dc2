//! Repository implementations using SQLite.

mod listing_repository;

pub use listing_repository::SqliteListingRepository;
