//! McpDir server binary
//!
//! Resolves settings, opens the listing database and serves the API until
//! Ctrl-C.

mod config;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use tokio::sync::Mutex;
use tracing::info;

use config::Settings;
use mcpdir_api::ApiServer;
use mcpdir_storage::{Database, SqliteListingRepository};

const LOG_PREFIX: &str = "mcpdir";

/// Initialize tracing with console and optional file logging
///
/// - Console: colored, compact format
/// - File: daily rotation under `log_dir` when set
fn init_tracing(
    log_dir: Option<&Path>,
) -> anyhow::Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    // RUST_LOG takes precedence
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new("info")
            .add_directive("mcpdir=debug".parse()?)
            .add_directive("mcpdir_core=debug".parse()?)
            .add_directive("mcpdir_api=debug".parse()?)
            .add_directive("mcpdir_storage=debug".parse()?)
            .add_directive("tower_http=info".parse()?),
    };

    let console_layer = fmt::layer()
        .with_ansi(true)
        .compact()
        .with_thread_names(false)
        .with_line_number(false)
        .with_file(false)
        .with_target(true);

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create log directory {:?}", dir))?;

            // Creates files like: mcpdir.2026-01-22.log
            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix(LOG_PREFIX)
                .filename_suffix("log")
                .build(dir)
                .context("Failed to create log file appender")?;
            let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

            let layer = fmt::layer()
                .with_writer(non_blocking_file)
                .with_ansi(false)
                .with_thread_ids(true)
                .with_line_number(true)
                .with_file(true)
                .with_target(true);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (for development)
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;

    // Guard must be kept alive for the duration of the program
    let _guard = init_tracing(settings.log_dir.as_deref())?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        database = ?settings.database_path,
        "Starting McpDir"
    );

    let db = Database::open(&settings.database_path)?;
    let db = Arc::new(Mutex::new(db));
    let repository = Arc::new(SqliteListingRepository::new(db));

    ApiServer::new(settings.api, repository)
        .run_until(shutdown_signal())
        .await
}
