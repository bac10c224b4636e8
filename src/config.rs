//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.jobpulse.toml` files. The access token is never read from here.

use crate::cli::{Args, OutputFormat};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".jobpulse.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Feed endpoint settings.
    #[serde(default)]
    pub feed: FeedConfig,

    /// Query settings.
    #[serde(default)]
    pub query: QueryConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,

    /// Show a spinner while pages are fetched.
    #[serde(default = "default_true")]
    pub show_progress: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            verbose: false,
            show_progress: true,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Feed endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Feed API base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Maximum pages fetched per run.
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            max_pages: default_max_pages(),
        }
    }
}

fn default_base_url() -> String {
    "https://pam-stilling-feed.nav.no/api/v1/feed".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_max_pages() -> usize {
    crate::feed::pager::DEFAULT_MAX_PAGES
}

/// What to look for in the feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Lookback window in weeks.
    #[serde(default = "default_lookback_weeks")]
    pub lookback_weeks: u32,

    /// Title keywords kept by the pager.
    #[serde(default = "default_keywords")]
    pub keywords: Vec<String>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            lookback_weeks: default_lookback_weeks(),
            keywords: default_keywords(),
        }
    }
}

fn default_lookback_weeks() -> u32 {
    26
}

fn default_keywords() -> Vec<String> {
    vec!["kotlin".to_string(), "java".to_string()]
}

/// Report settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Output format.
    #[serde(default)]
    pub format: OutputFormat,
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from `dir/.jobpulse.toml`.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(DEFAULT_CONFIG_FILE);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Try to load configuration from the default location.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &Args) {
        if let Some(ref base_url) = args.base_url {
            self.feed.base_url = base_url.clone();
        }
        if let Some(timeout) = args.timeout {
            self.feed.timeout_seconds = timeout;
        }
        if let Some(max_pages) = args.max_pages {
            self.feed.max_pages = max_pages;
        }

        if let Some(weeks) = args.weeks {
            self.query.lookback_weeks = weeks;
        }
        if let Some(ref keywords) = args.keywords {
            self.query.keywords = keywords.clone();
        }
        self.query.keywords = normalize_keywords(&self.query.keywords);

        if let Some(format) = args.format {
            self.report.format = format;
        }

        // Flags always override
        if args.verbose {
            self.general.verbose = true;
        }
        if args.no_progress || args.quiet {
            self.general.show_progress = false;
        }
    }

    /// Check values that may have come from a config file.
    pub fn validate(&self) -> Result<()> {
        let url = &self.feed.base_url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            bail!("Feed base URL must start with 'http://' or 'https://': {}", url);
        }
        if self.feed.timeout_seconds == 0 {
            bail!("Feed timeout must be at least 1 second");
        }
        if self.feed.max_pages == 0 {
            bail!("Max pages must be at least 1");
        }
        if self.query.lookback_weeks == 0 {
            bail!("Lookback must be at least 1 week");
        }
        if self.query.keywords.is_empty() {
            bail!("At least one keyword is required");
        }
        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Trim keywords, drop blanks and case-insensitive duplicates.
fn normalize_keywords(keywords: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::new();

    for keyword in keywords {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            continue;
        }
        if !normalized.iter().any(|k| k.to_lowercase() == keyword.to_lowercase()) {
            normalized.push(keyword.to_string());
        }
    }

    normalized
}
