//! Feed access: the HTTP client and the page walker.

pub mod client;
pub mod pager;

pub use client::{ClientConfig, HttpFeedClient};
pub use pager::{lookback_cutoff, PageWalk, Pager, StopReason};

use crate::error::FetchError;
use crate::models::FeedPage;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Source of feed pages.
///
/// Each call performs one request and yields either a parsed page or a
/// typed failure. Implementations do not retry.
#[async_trait]
pub trait FeedClient: Send + Sync {
    /// Fetch the first page, limited to items modified on or after `cutoff`.
    async fn fetch_since(&self, cutoff: DateTime<Utc>) -> Result<FeedPage, FetchError>;

    /// Fetch a page by its continuation id.
    async fn fetch_page(&self, page_id: &str) -> Result<FeedPage, FetchError>;
}
