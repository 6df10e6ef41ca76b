/// Bookmark admin backend
///
/// Wires the page connector, the bookmark database and the error handler
/// together behind the operations an operator performs on bookmarks.

use bookmark_manager_core::errors::*;
use bookmark_manager_core::types::DEFAULT_PER_PAGE;
use page_connector::{HttpPageFetcher, PageFetcher, PageFetcherConfig};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

pub mod application;
pub mod bookmark_service;
pub mod error_handler;
pub mod logger;

pub use application::Application;
pub use bookmark_service::BookmarkService;
pub use error_handler::{UnifiedErrorHandler, ErrorSeverity, ErrorStatistics};
pub use logger::{UnifiedLogger, LoggerConfig};

/// Environment variable overriding the database path
pub const DATABASE_ENV: &str = "BOOKMARK_ADMIN_DB";

/// Environment variable overriding the log level
pub const LOG_LEVEL_ENV: &str = "BOOKMARK_ADMIN_LOG";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Database path; an in-memory database is used when unset
    pub database_path: Option<PathBuf>,

    /// HTTP fetch settings
    pub fetcher: PageFetcherConfig,

    /// Rows per list page
    pub per_page: usize,

    /// Log level
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            fetcher: PageFetcherConfig::default(),
            per_page: DEFAULT_PER_PAGE,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file, then apply environment overrides
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref()).map_err(SystemError::from)?;
        let config: Self = serde_json::from_str(&raw).map_err(SystemError::from)?;
        Ok(config.with_env_overrides())
    }

    /// Default configuration with environment overrides
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    fn with_env_overrides(self) -> Self {
        self.with_overrides(
            std::env::var(DATABASE_ENV).ok(),
            std::env::var(LOG_LEVEL_ENV).ok(),
        )
    }

    fn with_overrides(mut self, database: Option<String>, log_level: Option<String>) -> Self {
        if let Some(path) = database.filter(|p| !p.trim().is_empty()) {
            self.database_path = Some(PathBuf::from(path));
        }
        if let Some(level) = log_level.filter(|l| !l.trim().is_empty()) {
            self.log_level = level;
        }
        self
    }
}

/// Application context that holds all initialized components
pub struct AppContext {
    /// Database manager for data persistence
    pub database: Arc<data_access::DatabaseManager>,

    /// Bookmark operations
    pub bookmarks: Arc<BookmarkService>,

    /// Unified error handler
    pub error_handler: Arc<UnifiedErrorHandler>,

    /// Application configuration
    pub config: AppConfig,
}

impl AppContext {
    /// Create a new application context fetching pages over HTTP
    pub async fn new(config: AppConfig) -> Result<Self> {
        let fetcher = Arc::new(HttpPageFetcher::with_config(config.fetcher.clone()));
        Self::with_fetcher(config, fetcher).await
    }

    /// Create a context with a custom page fetcher
    pub async fn with_fetcher(config: AppConfig, fetcher: Arc<dyn PageFetcher>) -> Result<Self> {
        info!("Initializing application context");

        // Initialize database
        let database = if let Some(path) = &config.database_path {
            Arc::new(data_access::DatabaseManager::new(path).await?)
        } else {
            Arc::new(data_access::DatabaseManager::in_memory().await?)
        };
        info!("Database initialized");

        // Initialize error handler
        let error_handler = Arc::new(UnifiedErrorHandler::new());

        let bookmarks = Arc::new(BookmarkService::new(
            Arc::new(database.bookmarks()),
            fetcher,
            Arc::clone(&error_handler),
        ));

        info!("Application context initialized successfully");

        Ok(Self {
            database,
            bookmarks,
            error_handler,
            config,
        })
    }

    /// Get application statistics
    pub async fn get_stats(&self) -> Result<AppStatistics> {
        let database = self.database.stats().await?;
        let errors = self.error_handler.get_error_stats().await;

        Ok(AppStatistics {
            total_bookmarks: database.bookmark_count,
            schema_version: database.schema_version,
            errors,
        })
    }
}

/// Application statistics
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AppStatistics {
    pub total_bookmarks: usize,
    pub schema_version: u32,
    pub errors: ErrorStatistics,
}
