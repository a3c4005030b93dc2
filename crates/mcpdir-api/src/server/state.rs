//! Shared handler state

use std::sync::Arc;

use mcpdir_core::{ListingRepository, ListingService};

use crate::config::ApiConfig;

/// State handed to every handler. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub listings: Arc<ListingService>,
    pub config: Arc<ApiConfig>,
}

impl AppState {
    pub fn new(config: ApiConfig, repository: Arc<dyn ListingRepository>) -> Self {
        Self {
            listings: Arc::new(ListingService::new(repository)),
            config: Arc::new(config),
        }
    }
}
