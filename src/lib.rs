//! JobPulse library: feed paging, weekly aggregation and report rendering.
//!
//! The `jobpulse` binary wires these together; the pieces are usable on
//! their own, e.g. [`Pager::collect_matching`] for a flat list of matches.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod feed;
pub mod models;
pub mod report;

pub use analysis::{aggregate, WeekFields};
pub use error::{AggregateError, CliError, FetchError};
pub use feed::{FeedClient, HttpFeedClient, Pager};
pub use models::{FeedItem, FeedPage, WeekStat};
