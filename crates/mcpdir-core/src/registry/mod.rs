//! Listing registry
//!
//! Schema, normalization, and validation for directory listings. Everything
//! here is pure: no I/O, no store access.

mod format;
mod schema;
mod tags;
mod types;
mod validation;

pub use format::*;
pub use schema::*;
pub use tags::*;
pub use types::*;
pub use validation::*;
