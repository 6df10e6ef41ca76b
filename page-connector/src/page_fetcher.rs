//! HTTP page fetcher
//!
//! Retrieves the HTML of a bookmarked URL with `reqwest`, following a
//! bounded number of redirects and refusing oversized bodies.

use crate::traits::{FetchedPage, PageFetcher};
use async_trait::async_trait;
use bookmark_manager_core::*;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Configuration for the HTTP page fetcher
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageFetcherConfig {
    /// Timeout for HTTP requests in seconds
    pub request_timeout_secs: u64,
    /// Maximum content size to fetch in bytes
    pub max_content_size: usize,
    /// User agent string for HTTP requests
    pub user_agent: String,
    /// Whether to follow redirects
    pub follow_redirects: bool,
    /// Maximum number of redirects to follow
    pub max_redirects: usize,
}

impl Default for PageFetcherConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 15,
            max_content_size: 5 * 1024 * 1024, // 5MB
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            follow_redirects: true,
            max_redirects: 5,
        }
    }
}

/// `reqwest`-backed [`PageFetcher`]
pub struct HttpPageFetcher {
    client: reqwest::Client,
    config: PageFetcherConfig,
}

impl HttpPageFetcher {
    /// Create a fetcher with default configuration
    pub fn new() -> Self {
        Self::with_config(PageFetcherConfig::default())
    }

    /// Create a fetcher with custom configuration
    pub fn with_config(config: PageFetcherConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .redirect(if config.follow_redirects {
                reqwest::redirect::Policy::limited(config.max_redirects)
            } else {
                reqwest::redirect::Policy::none()
            })
            .user_agent(&config.user_agent)
            .build()
            .unwrap_or_else(|e| {
                warn!("Falling back to default HTTP client: {}", e);
                reqwest::Client::new()
            });

        Self { client, config }
    }

    /// Get the current configuration
    pub fn config(&self) -> &PageFetcherConfig {
        &self.config
    }

    /// Only http and https URLs are fetched
    fn is_valid_url(url: &str) -> bool {
        url.starts_with("http://") || url.starts_with("https://")
    }

    /// Read the body chunk by chunk, giving up as soon as it exceeds `limit`
    async fn read_body(&self, url: &str, mut response: reqwest::Response, limit: u64) -> Result<String> {
        let mut body = Vec::new();

        while let Some(chunk) = response.chunk().await.map_err(|e| FetchError::Body {
            url: url.to_string(),
            details: e.to_string(),
        })? {
            let size = (body.len() + chunk.len()) as u64;
            if size > limit {
                return Err(FetchError::ContentTooLarge {
                    url: url.to_string(),
                    size,
                    limit,
                }
                .into());
            }
            body.extend_from_slice(&chunk);
        }

        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    fn transport_error(url: &str, e: &reqwest::Error) -> FetchError {
        let details = if e.is_timeout() {
            "request timed out".to_string()
        } else if e.is_connect() {
            format!("connection failed: {}", e)
        } else if e.is_redirect() {
            format!("too many redirects: {}", e)
        } else {
            e.to_string()
        };

        FetchError::Transport {
            url: url.to_string(),
            details,
        }
    }
}

impl Default for HttpPageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage> {
        if !Self::is_valid_url(url) {
            return Err(FetchError::InvalidScheme { url: url.to_string() }.into());
        }

        let start = Instant::now();
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Self::transport_error(url, &e))?;

        let final_url = response.url().to_string();
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            }
            .into());
        }

        let limit = self.config.max_content_size as u64;
        if let Some(content_length) = response.content_length() {
            if content_length > limit {
                return Err(FetchError::ContentTooLarge {
                    url: url.to_string(),
                    size: content_length,
                    limit,
                }
                .into());
            }
        }

        let html = self.read_body(url, response, limit).await?;

        if final_url != url {
            debug!("{} redirected to {}", url, final_url);
        }
        info!(
            "Fetched {} ({} bytes) in {}ms",
            url,
            html.len(),
            start.elapsed().as_millis()
        );

        Ok(FetchedPage {
            requested_url: url.to_string(),
            final_url,
            status_code: status.as_u16(),
            html,
            fetched_at: Utc::now(),
        })
    }
}
