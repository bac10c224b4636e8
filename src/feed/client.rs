//! HTTP implementation of [`FeedClient`].
//!
//! Requests carry the bearer token and ask for JSON. The first request is
//! bounded with `If-Modified-Since`; continuation requests append the page
//! id to the base URL.

use super::FeedClient;
use crate::error::FetchError;
use crate::models::FeedPage;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::{ACCEPT, AUTHORIZATION, IF_MODIFIED_SINCE};
use std::time::Duration;
use tracing::{debug, warn};

/// Configuration for the HTTP feed client.
#[derive(Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub token: String,
    pub timeout_seconds: u64,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("token", &"***")
            .field("timeout_seconds", &self.timeout_seconds)
            .finish()
    }
}

/// Feed client backed by `reqwest`.
pub struct HttpFeedClient {
    http_client: reqwest::Client,
    base_url: String,
    token: String,
}

impl HttpFeedClient {
    /// Create a new client.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token,
        })
    }

    fn page_url(&self, page_id: &str) -> String {
        format!("{}/{}", self.base_url, page_id.trim_start_matches('/'))
    }

    /// Send one GET and decode the body as a feed page.
    async fn get_page(&self, url: &str, modified_since: Option<String>) -> Result<FeedPage, FetchError> {
        let mut request = self
            .http_client
            .get(url)
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(ACCEPT, "application/json");

        if let Some(since) = modified_since {
            debug!("GET {} (If-Modified-Since: {})", url, since);
            request = request.header(IF_MODIFIED_SINCE, since);
        } else {
            debug!("GET {}", url);
        }

        let response = request.send().await.map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Feed request to {} returned {}", url, status);
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })?;

        if body.trim().is_empty() {
            warn!("Feed request to {} returned an empty body", url);
            return Err(FetchError::EmptyBody {
                url: url.to_string(),
            });
        }

        serde_json::from_str(&body).map_err(|source| FetchError::Parse {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl FeedClient for HttpFeedClient {
    async fn fetch_since(&self, cutoff: DateTime<Utc>) -> Result<FeedPage, FetchError> {
        let url = self.base_url.clone();
        self.get_page(&url, Some(http_date(cutoff))).await
    }

    async fn fetch_page(&self, page_id: &str) -> Result<FeedPage, FetchError> {
        let url = self.page_url(page_id);
        self.get_page(&url, None).await
    }
}

/// Format a timestamp as an RFC 1123 HTTP date.
pub fn http_date(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
