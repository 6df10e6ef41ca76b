//! Page connector for the bookmark admin backend
//!
//! Fetches bookmarked pages over HTTP and extracts the metadata stored
//! alongside each bookmark.
//!
//! # Features
//! - Typed element queries over a parsed HTML document
//! - Title, favicon, meta description and meta keywords extraction with
//!   prioritized fallback lookups
//! - Favicon resolution against the page origin
//! - HTTP fetching with configurable timeout, redirects and size limit

pub mod traits;
pub mod html_document;
pub mod metadata_extractor;
pub mod page_fetcher;

pub use traits::*;
pub use html_document::{AttributePredicate, ElementQuery, HtmlDocument};
pub use metadata_extractor::{
    first_meta_content_matching, resolve_favicon, MetadataExtractor, Origin,
    DESCRIPTION_PATTERNS, FAVICON_PATTERNS, KEYWORDS_PATTERNS,
};
pub use page_fetcher::{HttpPageFetcher, PageFetcherConfig};
