//! Domain services
//!
//! Business logic that operates on listings via repositories.

mod listing_service;

pub use listing_service::*;
