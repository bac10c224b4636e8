//! JobPulse - weekly Kotlin/Java job-posting trends
//!
//! A CLI tool that walks a paginated JSON job feed, keeps postings whose
//! title mentions a keyword, and reports Kotlin/Java counts per ISO week.
//!
//! Exit codes:
//!   0 - Success (including "No result found")
//!   1 - Startup or runtime error (missing token, bad config, bad data, I/O)

use anyhow::{Context, Result};
use chrono::Utc;
use jobpulse::analysis::{self, WeekFields};
use jobpulse::cli::Args;
use jobpulse::config::{self, Config};
use jobpulse::feed::{self, ClientConfig, HttpFeedClient, Pager};
use jobpulse::models::ReportMetadata;
use jobpulse::report;
use std::path::PathBuf;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments before touching the network
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Load config first so its verbosity can shape logging
    let (mut config, origin) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    // Initialize logging
    init_logging(&args, &config);

    info!("JobPulse v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    origin.log();

    if let Err(e) = run(args, config).await {
        error!("Run failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .jobpulse.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(config::DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            config::DEFAULT_CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", config::DEFAULT_CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", config::DEFAULT_CONFIG_FILE);
    println!("   Edit it to customize the feed URL, lookback window and keywords.");
    Ok(())
}

/// Initialize logging on stderr. `RUST_LOG` overrides the verbosity settings.
fn init_logging(args: &Args, config: &Config) {
    let level = args
        .log_level(config.general.verbose)
        .to_string()
        .to_lowercase();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Fetch, aggregate and print the weekly report.
async fn run(args: Args, config: Config) -> Result<()> {
    config.validate()?;

    let token = args.token()?;

    let client = HttpFeedClient::new(ClientConfig {
        base_url: config.feed.base_url.clone(),
        token: token.expose().to_string(),
        timeout_seconds: config.feed.timeout_seconds,
    })?;

    let pager = Pager::new(client)
        .with_max_pages(config.feed.max_pages)
        .with_progress(config.general.show_progress);

    // Step 1: Walk the feed
    let cutoff = feed::lookback_cutoff(Utc::now(), config.query.lookback_weeks);
    info!(
        "Fetching postings modified since {} matching {:?}",
        cutoff.format("%Y-%m-%d"),
        config.query.keywords
    );

    let walk = pager.walk(cutoff, &config.query.keywords).await;
    info!(
        "Pagination stopped ({}) after {} pages with {} matching postings",
        walk.stop_reason,
        walk.pages_fetched,
        walk.match_count()
    );

    // Step 2: Bucket by ISO week
    let stats = analysis::aggregate(walk.items.as_deref(), WeekFields::ISO)
        .context("Aggregation aborted")?;

    // Step 3: Render and emit
    let metadata = ReportMetadata {
        feed_url: config.feed.base_url.clone(),
        modified_since: cutoff,
        generated_at: Utc::now(),
        pages_fetched: walk.pages_fetched,
        matching_items: walk.match_count(),
    };

    let output = report::render(stats.as_deref(), &metadata, config.report.format)?;

    match args.output {
        Some(ref path) => {
            std::fs::write(path, &output)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            info!("Report saved to {}", path.display());
        }
        None => print!("{}", output),
    }

    Ok(())
}

/// Where the configuration came from, reported once logging is up.
enum ConfigOrigin {
    Explicit(PathBuf),
    DefaultFile,
    BuiltIn,
    Unreadable(anyhow::Error),
}

impl ConfigOrigin {
    fn log(&self) {
        match self {
            ConfigOrigin::Explicit(path) => info!("Loaded config from: {}", path.display()),
            ConfigOrigin::DefaultFile => {
                info!("Loaded default config from {}", config::DEFAULT_CONFIG_FILE)
            }
            ConfigOrigin::BuiltIn => debug!("No config file found, using defaults"),
            ConfigOrigin::Unreadable(e) => warn!("Failed to load config: {:#}", e),
        }
    }
}

/// Load configuration from file or use defaults.
///
/// An explicit `--config` path must load; a broken default file only
/// falls back to the built-in defaults.
fn load_config(args: &Args) -> Result<(Config, ConfigOrigin)> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        let config = Config::load(config_path)?;
        return Ok((config, ConfigOrigin::Explicit(config_path.clone())));
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok((config, ConfigOrigin::DefaultFile)),
        Ok(None) => Ok((Config::default(), ConfigOrigin::BuiltIn)),
        Err(e) => Ok((Config::default(), ConfigOrigin::Unreadable(e))),
    }
}
