//! Error types for the feed pipeline.

use thiserror::Error;

/// Failure to obtain a usable page from the feed.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Connection, TLS, timeout or body read failure.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("HTTP error {status} from {url}")]
    Status { url: String, status: u16 },

    /// The server answered 2xx with nothing in the body.
    #[error("empty response body from {url}")]
    EmptyBody { url: String },

    /// The body was not a valid feed page.
    #[error("malformed feed page from {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure while bucketing items into weeks.
#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("item {item_id} has an invalid date_modified {value:?}: {source}")]
    DateParse {
        item_id: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("item {item_id} has a date_modified outside the supported range: {value:?}")]
    OutOfRange { item_id: String, value: String },
}

/// Startup failures detected before any network activity.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CliError {
    #[error("missing access token: pass it as the first argument or set JOBPULSE_TOKEN")]
    MissingToken,

    #[error("{0}")]
    Invalid(String),
}
