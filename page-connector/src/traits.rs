//! Page connector traits

use bookmark_manager_core::*;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A fetched HTML page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchedPage {
    pub requested_url: String,
    /// URL after redirects
    pub final_url: String,
    pub status_code: u16,
    pub html: String,
    pub fetched_at: DateTime<Utc>,
}

/// Trait for page fetchers
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the page at `url`
    ///
    /// Transport failures and non-success statuses are returned as
    /// [`FetchError`]s; extraction never runs on a failed fetch.
    async fn fetch(&self, url: &str) -> Result<FetchedPage>;
}
