/// Bookmark service
///
/// The operator-facing operations on bookmarks. Creating a bookmark is a
/// plain sequential pipeline: validate the URL, reject duplicates, fetch the
/// page, extract its metadata, persist. Each stage returns its own error.

use crate::error_handler::UnifiedErrorHandler;
use bookmark_manager_core::*;
use data_access::BookmarkRepository;
use page_connector::{MetadataExtractor, Origin, PageFetcher};
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

pub struct BookmarkService {
    repository: Arc<dyn BookmarkRepository>,
    fetcher: Arc<dyn PageFetcher>,
    extractor: MetadataExtractor,
    error_handler: Arc<UnifiedErrorHandler>,
}

impl BookmarkService {
    pub fn new(
        repository: Arc<dyn BookmarkRepository>,
        fetcher: Arc<dyn PageFetcher>,
        error_handler: Arc<UnifiedErrorHandler>,
    ) -> Self {
        Self {
            repository,
            fetcher,
            extractor: MetadataExtractor::new(),
            error_handler,
        }
    }

    /// Fetch `url`, extract its metadata and store a new bookmark
    pub async fn create(&self, url: &str) -> Result<Bookmark> {
        let result = self.create_inner(url).await;
        self.report("create bookmark", result).await
    }

    async fn create_inner(&self, url: &str) -> Result<Bookmark> {
        let url = url.trim();
        let origin = Self::validate_url(url)?;
        self.ensure_not_stored(url, None).await?;

        let metadata = self.fetch_metadata(url, &origin).await?;
        let bookmark = self.repository.insert(&NewBookmark::new(url, metadata)).await?;

        info!("Created bookmark {} for {}", bookmark.id, bookmark.url);
        Ok(bookmark)
    }

    /// One page of bookmarks matching `filter`, newest first
    pub async fn list(&self, filter: &BookmarkFilter, page: Page) -> Result<BookmarkPage> {
        let result = self.list_inner(filter, page).await;
        self.report("list bookmarks", result).await
    }

    async fn list_inner(&self, filter: &BookmarkFilter, page: Page) -> Result<BookmarkPage> {
        let items = self
            .repository
            .list(filter, page.per_page, page.offset())
            .await?;
        let total = self.repository.count(filter).await?;
        debug!("Listed {} of {} bookmarks (page {})", items.len(), total, page.number);
        Ok(BookmarkPage { items, total, page })
    }

    pub async fn show(&self, id: BookmarkId) -> Result<Bookmark> {
        let result = self.find(id).await;
        self.report("show bookmark", result).await
    }

    /// Point a bookmark at a new URL
    ///
    /// The new page is fetched and its metadata replaces the old one. The
    /// creation date is kept.
    pub async fn edit_url(&self, id: BookmarkId, new_url: &str) -> Result<Bookmark> {
        let result = self.edit_url_inner(id, new_url).await;
        self.report("edit bookmark", result).await
    }

    async fn edit_url_inner(&self, id: BookmarkId, new_url: &str) -> Result<Bookmark> {
        let existing = self.find(id).await?;
        let new_url = new_url.trim();
        let origin = Self::validate_url(new_url)?;
        self.ensure_not_stored(new_url, Some(&existing)).await?;

        let metadata = self.fetch_metadata(new_url, &origin).await?;
        let updated = Bookmark {
            id: existing.id,
            url: new_url.to_string(),
            created_at: existing.created_at,
            metadata,
        };
        self.repository.update(&updated).await?;

        info!("Updated bookmark {}: {} -> {}", id, existing.url, updated.url);
        Ok(updated)
    }

    pub async fn delete(&self, id: BookmarkId) -> Result<()> {
        let result = self.delete_inner(id).await;
        self.report("delete bookmark", result).await
    }

    async fn delete_inner(&self, id: BookmarkId) -> Result<()> {
        if !self.repository.delete(id).await? {
            return Err(PersistenceError::NotFound { id }.into());
        }
        info!("Deleted bookmark {}", id);
        Ok(())
    }

    async fn find(&self, id: BookmarkId) -> Result<Bookmark> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or_else(|| PersistenceError::NotFound { id }.into())
    }

    /// Absolute http(s) URL with a host
    fn validate_url(url: &str) -> Result<Origin> {
        let invalid = |reason: String| ValidationError::InvalidUrl {
            url: url.to_string(),
            reason,
        };

        let parsed = Url::parse(url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", parsed.scheme())).into());
        }

        Origin::from_url(&parsed).ok_or_else(|| invalid("URL has no host".to_string()).into())
    }

    /// Reject `url` if another bookmark already stores it
    async fn ensure_not_stored(&self, url: &str, current: Option<&Bookmark>) -> Result<()> {
        if current.is_some_and(|bookmark| bookmark.url == url) {
            return Ok(());
        }

        if self.repository.count_by_url(url).await? > 0 {
            return Err(ValidationError::AlreadyExists { url: url.to_string() }.into());
        }
        Ok(())
    }

    async fn fetch_metadata(&self, url: &str, origin: &Origin) -> Result<BookmarkMetadata> {
        let page = self.fetcher.fetch(url).await?;
        Ok(self.extractor.extract(&page.html, origin))
    }

    async fn report<T>(&self, context: &str, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            self.error_handler.handle_error(e, context).await;
        }
        result
    }
}
