//! Data models for the job feed.
//!
//! This module contains the wire types for feed pages and items, and the
//! weekly statistics rows produced by the aggregator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Nested metadata attached to each feed item.
///
/// Not used for aggregation; carried through as received.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedEntry {
    #[serde(deserialize_with = "null_as_default")]
    pub uuid: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(alias = "businessName", deserialize_with = "null_as_default")]
    pub business_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub municipal: String,
    /// Last modification time as reported by the source system.
    #[serde(
        rename = "sist_endret",
        alias = "sistEndret",
        alias = "last_modified",
        deserialize_with = "null_as_default"
    )]
    pub last_modified: String,
}

/// A single job posting in a feed page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedItem {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content_text: String,
    /// ISO-8601 timestamp with offset. Validated by the aggregator, not here.
    #[serde(default, deserialize_with = "null_as_default")]
    pub date_modified: String,
    #[serde(
        default,
        rename = "_feed_entry",
        alias = "feed_entry",
        skip_serializing_if = "Option::is_none"
    )]
    pub feed_entry: Option<FeedEntry>,
}

impl FeedItem {
    /// Returns true if the title contains `keyword`, ignoring case.
    pub fn title_contains(&self, keyword: &str) -> bool {
        contains_ignore_case(&self.title, keyword)
    }

    /// Returns true if the title contains any of `keywords`, ignoring case.
    pub fn matches_any(&self, keywords: &[String]) -> bool {
        keywords.iter().any(|k| self.title_contains(k))
    }
}

/// One fetched page of the feed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedPage {
    #[serde(deserialize_with = "null_as_default")]
    pub version: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub home_page_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub feed_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub next_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    /// Continuation id. Absent, `null` and `""` all mean "last page".
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_id: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub items: Vec<FeedItem>,
}

impl FeedPage {
    /// The continuation id, if the feed has another page.
    ///
    /// Blank ids are treated the same as a missing one.
    pub fn next_page_id(&self) -> Option<&str> {
        self.next_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

/// Keyword counts for one ISO (year, week) bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekStat {
    /// Week-based year.
    pub year: i32,
    /// Week of the week-based year (1-53).
    pub week: u32,
    pub kotlin_count: usize,
    pub java_count: usize,
}

/// Metadata about a report run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Feed base URL.
    pub feed_url: String,
    /// Lower bound sent as `If-Modified-Since`.
    pub modified_since: DateTime<Utc>,
    /// Time the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Pages fetched during the walk.
    pub pages_fetched: usize,
    /// Items whose title matched a keyword.
    pub matching_items: usize,
}

/// Deserialize `null` as the type's default value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Case-insensitive, unicode-aware substring test.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
