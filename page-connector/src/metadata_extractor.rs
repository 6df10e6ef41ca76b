//! Bookmark metadata extraction
//!
//! Given a page's HTML and the URL it was fetched from, locates the page
//! title, favicon, meta description and meta keywords. Each field is looked
//! up through an ordered list of element queries; the first query that
//! matches anything wins and its first element is used.

use crate::html_document::{ElementQuery, HtmlDocument};
use bookmark_manager_core::*;
use std::fmt;
use tracing::debug;
use url::Url;

/// Favicon lookups, in priority order
pub const FAVICON_PATTERNS: [ElementQuery; 2] = [
    ElementQuery::attr_contains("link", "rel", "icon"),
    ElementQuery::attr_contains("link", "href", "favicon"),
];

/// Meta description lookups, in priority order
pub const DESCRIPTION_PATTERNS: [ElementQuery; 5] = meta_patterns("description", "Description");

/// Meta keywords lookups, in priority order
pub const KEYWORDS_PATTERNS: [ElementQuery; 5] = meta_patterns("keywords", "Keywords");

/// Exact `name` first, then `name` and `property` substring matches
const fn meta_patterns(lower: &'static str, capitalized: &'static str) -> [ElementQuery; 5] {
    [
        ElementQuery::attr_equals("meta", "name", lower),
        ElementQuery::attr_contains("meta", "name", capitalized),
        ElementQuery::attr_contains("meta", "name", lower),
        ElementQuery::attr_contains("meta", "property", lower),
        ElementQuery::attr_contains("meta", "property", capitalized),
    ]
}

/// Scheme and host of a page URL, the base for relative favicon links
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    scheme: String,
    host: String,
}

impl Origin {
    /// `None` when the URL has no host (e.g. `mailto:`)
    pub fn from_url(url: &Url) -> Option<Self> {
        let host = url.host_str()?;
        Some(Self {
            scheme: url.scheme().to_string(),
            host: host.to_string(),
        })
    }

    pub fn parse(url: &str) -> Result<Self> {
        let parsed = Url::parse(url).map_err(|e| ValidationError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        Self::from_url(&parsed).ok_or_else(|| {
            ValidationError::InvalidUrl {
                url: url.to_string(),
                reason: "URL has no host".to_string(),
            }
            .into()
        })
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.host)
    }
}

/// Stateless extractor of [`BookmarkMetadata`]
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataExtractor;

impl MetadataExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract metadata from `html` fetched from `origin`
    ///
    /// Missing elements leave the corresponding field empty; this never fails.
    pub fn extract(&self, html: &str, origin: &Origin) -> BookmarkMetadata {
        let document = HtmlDocument::parse(html);

        let metadata = BookmarkMetadata {
            title: Self::extract_title(&document),
            favicon: Self::extract_favicon(&document, origin),
            description: first_meta_content_matching(&DESCRIPTION_PATTERNS, &document),
            keywords: first_meta_content_matching(&KEYWORDS_PATTERNS, &document),
        };

        debug!(
            origin = %origin,
            title = %metadata.title,
            favicon = ?metadata.favicon,
            has_description = metadata.description.is_some(),
            has_keywords = metadata.keywords.is_some(),
            "Extracted page metadata"
        );

        metadata
    }

    /// Like [`extract`](Self::extract), taking the page URL as a string
    pub fn extract_from_str(&self, html: &str, origin_url: &str) -> Result<BookmarkMetadata> {
        let origin = Origin::parse(origin_url)?;
        Ok(self.extract(html, &origin))
    }

    /// Empty when the document has no `head > title`
    fn extract_title(document: &HtmlDocument) -> String {
        document.head_title().unwrap_or_default()
    }

    fn extract_favicon(document: &HtmlDocument, origin: &Origin) -> Option<String> {
        let link = document.first_match(&FAVICON_PATTERNS)?;
        let href = link.value().attr("href")?;
        Some(resolve_favicon(href, origin))
    }
}

/// `content` of the first element of the first pattern that matches anything
pub fn first_meta_content_matching(patterns: &[ElementQuery], document: &HtmlDocument) -> Option<String> {
    document
        .first_match(patterns)
        .and_then(|element| element.value().attr("content"))
        .map(str::to_string)
}

/// Make a favicon href absolute
///
/// Hrefs starting with `http` are kept as-is. Anything else is appended to
/// `scheme://host`; protocol-relative (`//cdn/..`) and path-relative hrefs
/// are not treated specially.
pub fn resolve_favicon(href: &str, origin: &Origin) -> String {
    if href.starts_with("http") {
        href.to_string()
    } else {
        format!("{}{}", origin, href)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str, origin: &str) -> BookmarkMetadata {
        MetadataExtractor::new().extract_from_str(html, origin).unwrap()
    }

    fn page(head: &str) -> String {
        format!("<!DOCTYPE html><html><head>{}</head><body><p>body</p></body></html>", head)
    }

    #[test]
    fn test_title_from_head() {
        let meta = extract(&page("<title>X</title>"), "https://example.com");
        assert_eq!(meta.title, "X");
    }

    #[test]
    fn test_missing_title_is_empty_string() {
        // Absent title stays "" rather than None, unlike the other fields.
        let meta = extract(&page(""), "https://example.com");
        assert_eq!(meta.title, "");
    }

    #[test]
    fn test_title_outside_head_is_ignored() {
        let html = "<html><head></head><body><svg><title>icon</title></svg></body></html>";
        assert_eq!(extract(html, "https://example.com").title, "");
    }

    #[test]
    fn test_relative_favicon_resolved_against_origin() {
        let meta = extract(
            &page(r#"<link rel="icon" href="/f.ico">"#),
            "https://example.com/page",
        );
        assert_eq!(meta.favicon.as_deref(), Some("https://example.com/f.ico"));
    }

    #[test]
    fn test_absolute_favicon_passed_through() {
        let meta = extract(
            &page(r#"<link rel="icon" href="https://cdn.x/f.ico">"#),
            "https://example.com/page",
        );
        assert_eq!(meta.favicon.as_deref(), Some("https://cdn.x/f.ico"));
    }

    #[test]
    fn test_favicon_rel_substring_variants() {
        for rel in ["shortcut icon", "apple-touch-icon", "icon"] {
            let html = page(&format!(r#"<link rel="{}" href="/i.png">"#, rel));
            let meta = extract(&html, "http://site.org/a/b");
            assert_eq!(meta.favicon.as_deref(), Some("http://site.org/i.png"), "rel={}", rel);
        }
    }

    #[test]
    fn test_favicon_rel_pattern_beats_href_pattern() {
        let html = page(concat!(
            r#"<link rel="preload" href="/favicon-old.ico">"#,
            r#"<link rel="icon" href="/new.png">"#,
        ));
        let meta = extract(&html, "https://example.com");
        assert_eq!(meta.favicon.as_deref(), Some("https://example.com/new.png"));
    }

    #[test]
    fn test_favicon_href_fallback() {
        let html = page(r#"<link rel="preload" href="/static/favicon.ico">"#);
        let meta = extract(&html, "https://example.com/deep/path");
        assert_eq!(meta.favicon.as_deref(), Some("https://example.com/static/favicon.ico"));
    }

    #[test]
    fn test_first_favicon_link_wins() {
        let html = page(concat!(
            r#"<link rel="icon" href="/one.ico">"#,
            r#"<link rel="icon" href="/two.ico">"#,
        ));
        let meta = extract(&html, "https://example.com");
        assert_eq!(meta.favicon.as_deref(), Some("https://example.com/one.ico"));
    }

    #[test]
    fn test_no_favicon() {
        let meta = extract(&page(r#"<link rel="stylesheet" href="/a.css">"#), "https://example.com");
        assert_eq!(meta.favicon, None);
    }

    #[test]
    fn test_icon_link_without_href() {
        let meta = extract(&page(r#"<link rel="icon">"#), "https://example.com");
        assert_eq!(meta.favicon, None);
    }

    #[test]
    fn test_protocol_relative_favicon_is_appended_verbatim() {
        // Known limitation: "//" hrefs are not recognised as absolute.
        let meta = extract(
            &page(r#"<link rel="icon" href="//cdn.example.com/f.ico">"#),
            "https://example.com",
        );
        assert_eq!(meta.favicon.as_deref(), Some("https://example.com//cdn.example.com/f.ico"));
    }

    #[test]
    fn test_path_relative_favicon_drops_page_path() {
        let meta = extract(
            &page(r#"<link rel="icon" href="img/f.ico">"#),
            "https://example.com/blog/post",
        );
        assert_eq!(meta.favicon.as_deref(), Some("https://example.comimg/f.ico"));
    }

    #[test]
    fn test_origin_port_is_dropped() {
        let meta = extract(&page(r#"<link rel="icon" href="/f.ico">"#), "http://localhost:8080/x");
        assert_eq!(meta.favicon.as_deref(), Some("http://localhost/f.ico"));
    }

    #[test]
    fn test_exact_description_beats_property() {
        let html = page(concat!(
            r#"<meta property="og:description" content="B">"#,
            r#"<meta name="description" content="A">"#,
        ));
        assert_eq!(extract(&html, "https://example.com").description.as_deref(), Some("A"));
    }

    #[test]
    fn test_exact_description_beats_earlier_substring_match() {
        let html = page(concat!(
            r#"<meta name="twitter:description" content="T">"#,
            r#"<meta name="description" content="A">"#,
        ));
        assert_eq!(extract(&html, "https://example.com").description.as_deref(), Some("A"));
    }

    #[test]
    fn test_capitalized_name_checked_before_lowercase_substring() {
        let html = page(concat!(
            r#"<meta name="og:description" content="lower">"#,
            r#"<meta name="Description" content="upper">"#,
        ));
        assert_eq!(extract(&html, "https://example.com").description.as_deref(), Some("upper"));
    }

    #[test]
    fn test_description_from_property() {
        let html = page(r#"<meta property="og:description" content="B">"#);
        assert_eq!(extract(&html, "https://example.com").description.as_deref(), Some("B"));
    }

    #[test]
    fn test_description_from_capitalized_property() {
        let html = page(r#"<meta property="og:Description" content="P5">"#);
        assert_eq!(extract(&html, "https://example.com").description.as_deref(), Some("P5"));
    }

    #[test]
    fn test_lowercase_description_property_beats_capitalized() {
        let html = page(concat!(
            r#"<meta property="og:Description" content="upper">"#,
            r#"<meta property="og:description" content="lower">"#,
        ));
        assert_eq!(extract(&html, "https://example.com").description.as_deref(), Some("lower"));
    }

    #[test]
    fn test_capitalized_keywords_name_beats_lowercase_substring() {
        let html = page(concat!(
            r#"<meta name="site-keywords" content="lower">"#,
            r#"<meta name="Keywords" content="upper">"#,
        ));
        assert_eq!(extract(&html, "https://example.com").keywords.as_deref(), Some("upper"));
    }

    #[test]
    fn test_keywords_from_property() {
        let html = page(concat!(
            r#"<meta property="og:Keywords" content="upper">"#,
            r#"<meta property="article:keywords" content="lower">"#,
        ));
        assert_eq!(extract(&html, "https://example.com").keywords.as_deref(), Some("lower"));
    }

    #[test]
    fn test_keywords_from_capitalized_property() {
        let html = page(r#"<meta property="og:Keywords" content="k5">"#);
        assert_eq!(extract(&html, "https://example.com").keywords.as_deref(), Some("k5"));
    }

    #[test]
    fn test_keywords_name_beats_property() {
        let html = page(concat!(
            r#"<meta property="article:keywords" content="property">"#,
            r#"<meta name="news_keywords" content="name">"#,
        ));
        assert_eq!(extract(&html, "https://example.com").keywords.as_deref(), Some("name"));
    }

    #[test]
    fn test_only_capitalized_keywords() {
        let html = page(r#"<meta name="Keywords" content="k1,k2">"#);
        assert_eq!(extract(&html, "https://example.com").keywords.as_deref(), Some("k1,k2"));
    }

    #[test]
    fn test_keywords_exact_name() {
        let html = page(concat!(
            r#"<meta property="article:keywords" content="p">"#,
            r#"<meta name="keywords" content="rust, html">"#,
        ));
        assert_eq!(extract(&html, "https://example.com").keywords.as_deref(), Some("rust, html"));
    }

    #[test]
    fn test_matching_meta_without_content() {
        let html = page(concat!(
            r#"<meta name="description">"#,
            r#"<meta property="og:description" content="B">"#,
        ));
        // the first pattern matched, so later patterns are not consulted
        assert_eq!(extract(&html, "https://example.com").description, None);
    }

    #[test]
    fn test_empty_document() {
        let meta = extract("", "https://example.com");
        assert_eq!(meta, BookmarkMetadata::default());
    }

    #[test]
    fn test_extract_is_idempotent() {
        let html = page(concat!(
            "<title>Same</title>",
            r#"<link rel="icon" href="/f.ico">"#,
            r#"<meta name="description" content="d">"#,
            r#"<meta name="keywords" content="k">"#,
        ));
        let extractor = MetadataExtractor::new();
        let first = extractor.extract_from_str(&html, "https://example.com").unwrap();
        let second = extractor.extract_from_str(&html, "https://example.com").unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_origin_rejected() {
        let result = MetadataExtractor::new().extract_from_str("<html></html>", "not a url");
        assert!(matches!(
            result,
            Err(BookmarkManagerError::Validation { source: ValidationError::InvalidUrl { .. } })
        ));
    }

    #[test]
    fn test_hostless_origin_rejected() {
        assert!(Origin::parse("mailto:someone@example.com").is_err());
    }

    #[test]
    fn test_origin_display() {
        let origin = Origin::parse("https://www.rust-lang.org/learn?x=1#top").unwrap();
        assert_eq!(origin.to_string(), "https://www.rust-lang.org");
    }
}
