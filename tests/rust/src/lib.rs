//! Shared test utilities and fixtures for McpDir integration tests.

pub use mcpdir_core::{
    AuthKind, Capabilities, Listing, ListingQuery, PublicListing, Transport, VerificationUpdate,
};

/// Mock repository implementations
pub mod mocks;
pub use mocks::MockListingRepository;

/// Test data fixtures
pub mod fixtures {
    use super::*;
    use chrono::{Duration, Utc};
    use serde_json::{json, Value};
    use uuid::Uuid;

    /// A submission body that passes validation
    pub fn valid_submission(slug: &str) -> Value {
        json!({
            "slug": slug,
            "name": "GitHub",
            "description": "Access repositories, issues and pull requests",
            "transport": "stdio",
            "auth": "oauth",
            "homepage_url": "https://github.com",
            "repo_url": "https://github.com/github/github-mcp-server",
            "tags": ["Git", "code", " GIT "],
            "capabilities": { "tools": true, "resources": true }
        })
    }

    /// A validated listing ready for insertion
    pub fn listing(slug: &str) -> Listing {
        Listing {
            slug: slug.to_string(),
            name: format!("Server {}", slug),
            description: format!("Test server {}", slug),
            transport: Transport::Stdio,
            auth: AuthKind::None,
            homepage_url: None,
            repo_url: None,
            docs_url: None,
            tags: vec![],
            capabilities: Capabilities::default(),
        }
    }

    /// A stored listing, created `age_minutes` ago
    pub fn public_listing(slug: &str, age_minutes: i64) -> PublicListing {
        let created_at = Utc::now() - Duration::minutes(age_minutes);
        PublicListing {
            id: Uuid::new_v4(),
            slug: slug.to_string(),
            name: format!("Server {}", slug),
            description: format!("Test server {}", slug),
            homepage_url: None,
            repo_url: None,
            docs_url: None,
            tags: vec![],
            transport: Transport::Stdio,
            auth: AuthKind::None,
            capabilities: Capabilities::default(),
            verified: false,
            verified_at: None,
            created_at,
            updated_at: created_at,
        }
    }

    /// Generate a random slug
    pub fn random_slug() -> String {
        format!("srv-{}", &Uuid::new_v4().simple().to_string()[..8])
    }
}

/// Database test utilities
pub mod db {
    use mcpdir_storage::{Database, SqliteListingRepository};
    use std::path::{Path, PathBuf};
    use std::sync::Arc;
    use tempfile::TempDir;
    use tokio::sync::Mutex;

    /// Database file name
    const DB_FILE: &str = "mcpdir.db";

    /// Create a temporary database for testing
    pub struct TestDatabase {
        pub db: Database,
        _temp_dir: TempDir,
        db_path: PathBuf,
    }

    impl TestDatabase {
        /// Create a new test database in a temporary directory
        pub fn new() -> Self {
            let temp_dir = TempDir::new().expect("Failed to create temp dir");
            let db_path = temp_dir.path().join(DB_FILE);
            let db = Database::open(&db_path).expect("Failed to open test database");
            Self {
                db,
                db_path,
                _temp_dir: temp_dir,
            }
        }

        /// Create an in-memory database for fast tests
        pub fn in_memory() -> Self {
            let temp_dir = TempDir::new().expect("Failed to create temp dir");
            let db = Database::open_in_memory().expect("Failed to open in-memory database");
            Self {
                db,
                db_path: PathBuf::new(),
                _temp_dir: temp_dir,
            }
        }

        /// Get the database file path
        pub fn db_path(&self) -> &Path {
            &self.db_path
        }
    }

    impl Default for TestDatabase {
        fn default() -> Self {
            Self::new()
        }
    }

    /// In-memory SQLite listing repository
    pub fn sqlite_repository() -> Arc<SqliteListingRepository> {
        let test_db = TestDatabase::in_memory();
        Arc::new(SqliteListingRepository::new(Arc::new(Mutex::new(test_db.db))))
    }
}

/// Capture tracing output emitted on the current thread
pub mod logs {
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    pub struct LogCapture {
        buf: Arc<Mutex<Vec<u8>>>,
    }

    impl LogCapture {
        pub fn contents(&self) -> String {
            String::from_utf8_lossy(&self.buf.lock().unwrap()).into_owned()
        }
    }

    pub struct CaptureWriter {
        buf: Arc<Mutex<Vec<u8>>>,
    }

    impl io::Write for CaptureWriter {
        fn write(&mut self, data: &[u8]) -> io::Result<usize> {
            self.buf.lock().unwrap().extend_from_slice(data);
            Ok(data.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for LogCapture {
        type Writer = CaptureWriter;

        fn make_writer(&'a self) -> Self::Writer {
            CaptureWriter {
                buf: self.buf.clone(),
            }
        }
    }

    /// Install a capturing subscriber for the current thread.
    /// Logs are captured until the returned guard is dropped.
    pub fn capture() -> (LogCapture, tracing::subscriber::DefaultGuard) {
        let capture = LogCapture::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(capture.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        let guard = tracing::subscriber::set_default(subscriber);
        (capture, guard)
    }
}

/// Drive the router in-process
pub mod http {
    use axum::body::Body;
    use axum::extract::ConnectInfo;
    use axum::http::{HeaderMap, Method, Request, StatusCode};
    use axum::Router;
    use http_body_util::BodyExt;
    use serde_json::Value;
    use std::net::SocketAddr;
    use tower::ServiceExt;

    pub struct TestResponse {
        pub status: StatusCode,
        pub headers: HeaderMap,
        pub body: Value,
    }

    impl TestResponse {
        pub fn header(&self, name: &str) -> Option<&str> {
            self.headers.get(name).and_then(|v| v.to_str().ok())
        }

        pub fn error(&self) -> Option<&str> {
            self.body.get("error").and_then(Value::as_str)
        }
    }

    pub async fn send(router: &Router, request: Request<Body>) -> TestResponse {
        let response = router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("Response body is not JSON")
        };
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(router: &Router, uri: &str) -> TestResponse {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        send(router, request).await
    }

    pub async fn post_raw(
        router: &Router,
        uri: &str,
        body: impl Into<String>,
        bearer: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(token) = bearer {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        send(router, builder.body(Body::from(body.into())).unwrap()).await
    }

    pub async fn post_json(router: &Router, uri: &str, body: &Value) -> TestResponse {
        post_raw(router, uri, body.to_string(), None).await
    }

    /// POST `body` as if it arrived over a connection from `client`
    pub async fn post_from(
        router: &Router,
        client: SocketAddr,
        uri: &str,
        body: impl Into<String>,
    ) -> TestResponse {
        let mut request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.into()))
            .unwrap();
        request.extensions_mut().insert(ConnectInfo(client));
        send(router, request).await
    }
}
