//! Bookmark data types shared across the workspace

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Database identifier of a stored bookmark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookmarkId(pub i64);

impl BookmarkId {
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for BookmarkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for BookmarkId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        s.trim().parse().map(BookmarkId)
    }
}

/// Metadata extracted from a page's HTML
///
/// `title` is an empty string when the page has no `<head><title>`.
/// `favicon`, when present, is always an absolute URL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkMetadata {
    pub title: String,
    pub favicon: Option<String>,
    pub description: Option<String>,
    pub keywords: Option<String>,
}

/// A bookmark that has not been persisted yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBookmark {
    pub url: String,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub metadata: BookmarkMetadata,
}

impl NewBookmark {
    /// Create a bookmark stamped with the current time
    pub fn new(url: impl Into<String>, metadata: BookmarkMetadata) -> Self {
        Self {
            url: url.into(),
            created_at: Utc::now(),
            metadata,
        }
    }
}

/// A stored bookmark
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub id: BookmarkId,
    pub url: String,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub metadata: BookmarkMetadata,
}

impl Bookmark {
    pub fn from_new(id: BookmarkId, new: NewBookmark) -> Self {
        Self {
            id,
            url: new.url,
            created_at: new.created_at,
            metadata: new.metadata,
        }
    }
}

/// Filters available on the bookmark list
///
/// Text filters are substring matches. Unset fields do not constrain the result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkFilter {
    pub url_contains: Option<String>,
    pub title_contains: Option<String>,
    pub favicon_contains: Option<String>,
    pub description_contains: Option<String>,
    pub keywords_contains: Option<String>,
    pub created_after: Option<DateTime<Utc>>,
    pub created_before: Option<DateTime<Utc>>,
}

impl BookmarkFilter {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn with_url(mut self, needle: impl Into<String>) -> Self {
        self.url_contains = Some(needle.into());
        self
    }

    pub fn with_title(mut self, needle: impl Into<String>) -> Self {
        self.title_contains = Some(needle.into());
        self
    }

    pub fn with_favicon(mut self, needle: impl Into<String>) -> Self {
        self.favicon_contains = Some(needle.into());
        self
    }

    pub fn with_description(mut self, needle: impl Into<String>) -> Self {
        self.description_contains = Some(needle.into());
        self
    }

    pub fn with_keywords(mut self, needle: impl Into<String>) -> Self {
        self.keywords_contains = Some(needle.into());
        self
    }

    pub fn created_between(mut self, after: DateTime<Utc>, before: DateTime<Utc>) -> Self {
        self.created_after = Some(after);
        self.created_before = Some(before);
        self
    }
}

/// Default number of rows on one list page
pub const DEFAULT_PER_PAGE: usize = 32;

/// One-based page of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub number: usize,
    pub per_page: usize,
}

impl Page {
    pub fn new(number: usize, per_page: usize) -> Self {
        Self {
            number: number.max(1),
            per_page: per_page.max(1),
        }
    }

    /// Saturates instead of overflowing for absurd page numbers
    pub fn offset(&self) -> usize {
        (self.number - 1).saturating_mul(self.per_page)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(1, DEFAULT_PER_PAGE)
    }
}

/// A page of bookmarks plus the total number of matching rows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookmarkPage {
    pub items: Vec<Bookmark>,
    pub total: usize,
    pub page: Page,
}

impl BookmarkPage {
    pub fn total_pages(&self) -> usize {
        if self.total == 0 {
            return 1;
        }
        self.total.div_ceil(self.page.per_page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_offset() {
        assert_eq!(Page::new(1, 10).offset(), 0);
        assert_eq!(Page::new(3, 10).offset(), 20);
        // zero is clamped to the first page
        assert_eq!(Page::new(0, 10).offset(), 0);
    }

    #[test]
    fn test_page_offset_saturates() {
        assert_eq!(Page::new(usize::MAX, DEFAULT_PER_PAGE).offset(), usize::MAX);
        assert_eq!(Page::new(usize::MAX, 1).offset(), usize::MAX - 1);
    }

    #[test]
    fn test_total_pages() {
        let page = BookmarkPage { items: vec![], total: 65, page: Page::new(1, 32) };
        assert_eq!(page.total_pages(), 3);

        let empty = BookmarkPage { items: vec![], total: 0, page: Page::default() };
        assert_eq!(empty.total_pages(), 1);
    }

    #[test]
    fn test_bookmark_id_parse() {
        assert_eq!("42".parse::<BookmarkId>().unwrap(), BookmarkId(42));
        assert!("abc".parse::<BookmarkId>().is_err());
    }

    #[test]
    fn test_filter_is_empty() {
        assert!(BookmarkFilter::default().is_empty());
        assert!(!BookmarkFilter::default().with_url("rust").is_empty());
    }

    #[test]
    fn test_bookmark_serializes_flat() {
        let bookmark = Bookmark::from_new(
            BookmarkId(7),
            NewBookmark::new(
                "https://example.com",
                BookmarkMetadata {
                    title: "Example".to_string(),
                    ..Default::default()
                },
            ),
        );
        let json = serde_json::to_value(&bookmark).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["title"], "Example");
        assert!(json["favicon"].is_null());
    }
}
