//! Sequential page walker.
//!
//! Fetches the first page of the feed for a cutoff, then follows `next_id`
//! continuation ids one request at a time, keeping the items whose title
//! matches one of the keywords. Pagination is best effort: a failed
//! continuation fetch ends the walk but keeps what was already collected.

use super::FeedClient;
use crate::error::FetchError;
use crate::models::{FeedItem, FeedPage};
use chrono::{DateTime, Duration, NaiveTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, info, warn};

/// Default cap on page fetches for a single walk.
pub const DEFAULT_MAX_PAGES: usize = 1000;

/// Why a page walk ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The first request failed or returned no items.
    NoFirstPage,
    /// The last page had no continuation id.
    Exhausted,
    /// A continuation fetch failed.
    FetchFailed,
    /// The page cap was reached while more pages were advertised.
    PageLimit,
    /// A continuation id was seen twice.
    CycleDetected,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::NoFirstPage => write!(f, "no first page"),
            StopReason::Exhausted => write!(f, "last page reached"),
            StopReason::FetchFailed => write!(f, "continuation fetch failed"),
            StopReason::PageLimit => write!(f, "page limit reached"),
            StopReason::CycleDetected => write!(f, "repeated page id"),
        }
    }
}

/// Outcome of a page walk.
#[derive(Debug, Clone)]
pub struct PageWalk {
    /// Matching items in page-arrival order. `None` when there was no first page.
    pub items: Option<Vec<FeedItem>>,
    /// Number of pages successfully fetched.
    pub pages_fetched: usize,
    pub stop_reason: StopReason,
}

impl PageWalk {
    fn no_first_page(pages_fetched: usize) -> Self {
        Self {
            items: None,
            pages_fetched,
            stop_reason: StopReason::NoFirstPage,
        }
    }

    /// Number of matching items collected.
    pub fn match_count(&self) -> usize {
        self.items.as_ref().map_or(0, Vec::len)
    }
}

/// Drives sequential page fetches through a [`FeedClient`].
pub struct Pager<C> {
    client: C,
    max_pages: usize,
    show_progress: bool,
}

impl<C: FeedClient> Pager<C> {
    pub fn new(client: C) -> Self {
        Self {
            client,
            max_pages: DEFAULT_MAX_PAGES,
            show_progress: false,
        }
    }

    /// Cap the total number of page fetches, first page included.
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    /// Show a spinner on stderr while pages are fetched.
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Fetch the first page for items modified on or after `cutoff`.
    pub async fn fetch_since(&self, cutoff: DateTime<Utc>) -> Result<FeedPage, FetchError> {
        self.client.fetch_since(cutoff).await
    }

    /// Fetch one page by continuation id.
    pub async fn fetch_page(&self, page_id: &str) -> Result<FeedPage, FetchError> {
        self.client.fetch_page(page_id).await
    }

    /// Walk every page since `cutoff` and return the matching items in order.
    ///
    /// Flat-list form of [`Pager::walk`]: an empty result covers both
    /// "nothing matched" and "no first page".
    pub async fn collect_matching(&self, cutoff: DateTime<Utc>, keywords: &[String]) -> Vec<FeedItem> {
        self.walk(cutoff, keywords).await.items.unwrap_or_default()
    }

    /// Walk every page since `cutoff`, reporting why the walk stopped.
    pub async fn walk(&self, cutoff: DateTime<Utc>, keywords: &[String]) -> PageWalk {
        let first = match self.fetch_since(cutoff).await {
            Ok(page) if page.items.is_empty() => {
                info!("First page has no items");
                return PageWalk::no_first_page(1);
            }
            Ok(page) => page,
            Err(e) => {
                warn!("Initial feed fetch failed: {}", e);
                return PageWalk::no_first_page(0);
            }
        };

        let progress = self.progress_bar();
        let mut items = Vec::new();
        let mut pages_fetched = 1;
        let mut seen_ids = HashSet::new();
        if !first.id.is_empty() {
            seen_ids.insert(first.id.clone());
        }

        let mut page = first;
        let stop_reason = loop {
            let next_id = page.next_page_id().map(str::to_owned);
            let before = items.len();
            items.extend(page.items.into_iter().filter(|item| item.matches_any(keywords)));
            debug!(
                "Page {}: {} matching items ({} total)",
                pages_fetched,
                items.len() - before,
                items.len()
            );
            progress.set_message(format!("{} pages, {} matches", pages_fetched, items.len()));
            progress.tick();

            let Some(next_id) = next_id else {
                break StopReason::Exhausted;
            };

            if pages_fetched >= self.max_pages {
                warn!(
                    "Stopping after {} pages; the feed still advertises page {}",
                    pages_fetched, next_id
                );
                break StopReason::PageLimit;
            }

            if !seen_ids.insert(next_id.clone()) {
                warn!("Page id {} was already visited; stopping", next_id);
                break StopReason::CycleDetected;
            }

            page = match self.fetch_page(&next_id).await {
                Ok(next) => next,
                Err(e) => {
                    warn!("Fetching page {} failed, keeping partial results: {}", next_id, e);
                    break StopReason::FetchFailed;
                }
            };
            pages_fetched += 1;
        };

        progress.finish_and_clear();

        PageWalk {
            items: Some(items),
            pages_fetched,
            stop_reason,
        }
    }

    fn progress_bar(&self) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.green} [{elapsed_precise}] {msg}") {
            pb.set_style(style);
        }
        pb.enable_steady_tick(std::time::Duration::from_millis(120));
        pb
    }
}

/// Start of the current UTC day, `weeks` weeks back.
pub fn lookback_cutoff(now: DateTime<Utc>, weeks: u32) -> DateTime<Utc> {
    let start_of_day = now.date_naive().and_time(NaiveTime::MIN).and_utc();
    start_of_day - Duration::weeks(i64::from(weeks))
}
