/// Main application module
///
/// Provides high-level Application API

use crate::{AppConfig, AppContext, AppStatistics, LoggerConfig, UnifiedLogger};
use bookmark_manager_core::errors::Result;
use bookmark_manager_core::types::*;
use page_connector::PageFetcher;
use std::sync::Arc;
use tracing::{debug, info};

/// Main application
pub struct Application {
    /// Application context
    context: Arc<AppContext>,
}

impl Application {
    /// Create and initialize a new application
    pub async fn new(config: AppConfig) -> Result<Self> {
        Self::init_logging(&config);
        info!("Starting bookmark admin");

        let context = Arc::new(AppContext::new(config).await?);
        info!("Application initialized successfully");

        Ok(Self { context })
    }

    /// Create an application with a custom page fetcher
    pub async fn with_fetcher(config: AppConfig, fetcher: Arc<dyn PageFetcher>) -> Result<Self> {
        Self::init_logging(&config);

        let context = Arc::new(AppContext::with_fetcher(config, fetcher).await?);
        Ok(Self { context })
    }

    fn init_logging(config: &AppConfig) {
        if let Err(e) = UnifiedLogger::init(LoggerConfig::with_level(config.log_level.clone())) {
            debug!("Logger not reinitialized: {}", e);
        }
    }

    /// Get application context
    pub fn context(&self) -> &Arc<AppContext> {
        &self.context
    }

    // High-level API methods

    /// Fetch a page and store it as a bookmark
    pub async fn add_bookmark(&self, url: &str) -> Result<Bookmark> {
        self.context.bookmarks.create(url).await
    }

    /// List bookmarks; page numbers start at 1
    pub async fn list_bookmarks(&self, filter: &BookmarkFilter, page_number: usize) -> Result<BookmarkPage> {
        let page = Page::new(page_number, self.context.config.per_page);
        self.context.bookmarks.list(filter, page).await
    }

    pub async fn show_bookmark(&self, id: BookmarkId) -> Result<Bookmark> {
        self.context.bookmarks.show(id).await
    }

    pub async fn edit_bookmark(&self, id: BookmarkId, url: &str) -> Result<Bookmark> {
        self.context.bookmarks.edit_url(id, url).await
    }

    pub async fn delete_bookmark(&self, id: BookmarkId) -> Result<()> {
        self.context.bookmarks.delete(id).await
    }

    /// Get application statistics
    pub async fn get_stats(&self) -> Result<AppStatistics> {
        self.context.get_stats().await
    }
}
