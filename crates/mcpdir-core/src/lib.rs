//! # McpDir Core Library
//!
//! Domain logic for the McpDir server directory.
//!
//! ## Modules
//!
//! - `registry` - Listing schema, tag normalization, format checks, validation
//! - `domain` - Public projection, search filters, moderation updates
//! - `repository` - Data access traits
//! - `service` - Domain services

pub mod domain;
pub mod registry;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use domain::*;
pub use registry::*;
pub use repository::*;
pub use service::*;
