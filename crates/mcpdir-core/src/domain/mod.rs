//! Domain entities
//!
//! Store-facing shapes for listings: the public projection, search filters,
//! and moderation updates.

mod listing;

pub use listing::*;
