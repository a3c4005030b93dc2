//! Startup settings resolved from the environment
//!
//! Read once in `main`; everything downstream receives plain values.

use std::path::PathBuf;
use std::time::Duration;

use mcpdir_api::{ApiConfig, CachePolicy, DEFAULT_PORT};

/// Settings that cannot be turned into a runnable configuration
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("{key} must be a non-negative integer, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },

    #[error("no data directory on this platform; set MCPDIR_DATABASE_PATH")]
    NoDatabasePath,
}

/// Fully resolved process settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub api: ApiConfig,
    pub database_path: PathBuf,
    pub log_dir: Option<PathBuf>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_number<T: std::str::FromStr>(
    key: &'static str,
    value: Option<String>,
) -> Result<Option<T>, SettingsError> {
    non_empty(value)
        .map(|v| {
            v.parse::<T>()
                .map_err(|_| SettingsError::InvalidNumber { key, value: v })
        })
        .transpose()
}

impl Settings {
    /// Resolve from the process environment
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ApiConfig::default();
        let default_cache = CachePolicy::default();

        let cache = CachePolicy {
            shared_max_age: parse_number::<u64>("MCPDIR_CACHE_MAX_AGE", lookup("MCPDIR_CACHE_MAX_AGE"))?
                .map(Duration::from_secs)
                .unwrap_or(default_cache.shared_max_age),
            stale_while_revalidate: parse_number::<u64>("MCPDIR_CACHE_SWR", lookup("MCPDIR_CACHE_SWR"))?
                .map(Duration::from_secs)
                .unwrap_or(default_cache.stale_while_revalidate),
        };

        let api = ApiConfig {
            host: non_empty(lookup("MCPDIR_HOST")).unwrap_or(defaults.host),
            port: parse_number::<u16>("MCPDIR_PORT", lookup("MCPDIR_PORT"))?.unwrap_or(DEFAULT_PORT),
            site_url: non_empty(lookup("MCPDIR_SITE_URL")),
            admin_token: non_empty(lookup("MCPDIR_ADMIN_TOKEN")),
            cache,
            ..defaults
        };

        let database_path = match non_empty(lookup("MCPDIR_DATABASE_PATH")) {
            Some(path) => PathBuf::from(path),
            None => mcpdir_storage::default_database_path().ok_or(SettingsError::NoDatabasePath)?,
        };

        Ok(Self {
            api,
            database_path,
            log_dir: non_empty(lookup("MCPDIR_LOG_DIR")).map(PathBuf::from),
        })
    }
}
