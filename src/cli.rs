//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::error::CliError;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// JobPulse - weekly Kotlin/Java job-posting trends
///
/// Walks the job feed for postings modified in the lookback window, keeps
/// those whose title mentions one of the keywords, and prints weekly
/// Kotlin/Java counts grouped by ISO week and year.
///
/// Examples:
///   jobpulse <TOKEN>
///   jobpulse <TOKEN> --weeks 52 --format markdown
///   JOBPULSE_TOKEN=... jobpulse --output stats.json
///   jobpulse --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Bearer access token for the feed API
    #[arg(value_name = "TOKEN", env = "JOBPULSE_TOKEN", hide_env_values = true)]
    pub token: Option<AccessToken>,

    /// Feed API base URL
    #[arg(long, value_name = "URL", env = "JOBPULSE_BASE_URL")]
    pub base_url: Option<String>,

    /// How many weeks back to look for modified postings
    #[arg(short, long, value_name = "WEEKS")]
    pub weeks: Option<u32>,

    /// Title keywords to keep (comma-separated)
    ///
    /// Example: --keywords kotlin,java,scala
    #[arg(short, long, value_name = "WORDS", value_delimiter = ',')]
    pub keywords: Option<Vec<String>>,

    /// Maximum number of pages to fetch
    #[arg(long, value_name = "COUNT")]
    pub max_pages: Option<usize>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Output format (json, markdown)
    #[arg(short, long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .jobpulse.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Do not show the page progress spinner
    #[arg(long)]
    pub no_progress: bool,

    /// Generate a default .jobpulse.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON object keyed by year (default)
    #[default]
    Json,
    /// Markdown tables per year
    Markdown,
}

/// Bearer token. Never printed by `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl FromStr for AccessToken {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.trim().to_string()))
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccessToken(***)")
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// The access token, or [`CliError::MissingToken`].
    pub fn token(&self) -> Result<&AccessToken, CliError> {
        self.token
            .as_ref()
            .filter(|t| !t.expose().is_empty())
            .ok_or(CliError::MissingToken)
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), CliError> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        self.token()?;

        if let Some(ref url) = self.base_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(CliError::Invalid(
                    "Base URL must start with 'http://' or 'https://'".to_string(),
                ));
            }
        }

        if self.weeks == Some(0) {
            return Err(CliError::Invalid("Weeks must be at least 1".to_string()));
        }

        if self.max_pages == Some(0) {
            return Err(CliError::Invalid("Max pages must be at least 1".to_string()));
        }

        if self.timeout == Some(0) {
            return Err(CliError::Invalid(
                "Timeout must be at least 1 second".to_string(),
            ));
        }

        if let Some(ref keywords) = self.keywords {
            if keywords.iter().all(|k| k.trim().is_empty()) {
                return Err(CliError::Invalid(
                    "At least one keyword is required".to_string(),
                ));
            }
        }

        if self.verbose && self.quiet {
            return Err(CliError::Invalid(
                "Cannot use both --verbose and --quiet".to_string(),
            ));
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    ///
    /// `--quiet` wins; otherwise `--verbose` or `verbose = true` in the
    /// config file turns on debug output.
    pub fn log_level(&self, config_verbose: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || config_verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
