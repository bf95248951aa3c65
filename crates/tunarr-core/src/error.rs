//! Error types for the Tunarr MCP bridge.

use std::fmt;

use thiserror::Error;

/// Result type alias using the bridge's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// The remote operations exposed by the bridge, used to label transport
/// failures with a per-operation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// GET /api/channels
    ListChannels,
    /// GET /api/channels/{id}/programs?type=movie
    ListMoviesInChannel,
    /// GET /api/channels/{id}/shows
    ListShowsInChannel,
    /// GET /api/media-sources
    ListMediaSources,
    /// POST /api/programs/search
    SearchPrograms,
}

impl Operation {
    /// Message surfaced when the Tunarr service answers with a non-2xx status.
    pub fn failure_message(&self) -> &'static str {
        match self {
            Operation::ListChannels => "Unable to list channels",
            Operation::ListMoviesInChannel => "Unable to list movies in channel",
            Operation::ListShowsInChannel => "Unable to list shows in channel",
            Operation::ListMediaSources => "Unable to list media sources",
            Operation::SearchPrograms => "Unable to search programs",
        }
    }
}

/// Core error type for bridge operations.
///
/// `Validation` and `Transport` are the two contract-level failure kinds:
/// a validation error means the payload did not match the declared shape,
/// a transport error means the Tunarr service answered with a non-success
/// status. Neither is retried; both propagate to the caller unchanged.
#[derive(Error, Debug)]
pub enum Error {
    /// Payload did not conform to the declared shape
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Non-success HTTP status from the Tunarr service. The response body is
    /// not inspected; only the operation identifies the failure.
    #[error("{}", .operation.failure_message())]
    Transport {
        /// Which remote operation failed.
        operation: Operation,
    },

    /// HTTP/network request failed before a status was received
    #[error("Request error: {0}")]
    Request(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Transport failure for the given operation.
    pub fn transport(operation: Operation) -> Self {
        Error::Transport { operation }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}

/// A single schema violation at one location in a JSON document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// Path to the offending value, e.g. `results[1].icon.position`.
    /// Empty for the document root.
    pub path: String,
    /// What the schema required at that location.
    pub expected: String,
    /// What the document actually contained.
    pub found: String,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "expected {}, found {}", self.expected, self.found)
        } else {
            write!(
                f,
                "{}: expected {}, found {}",
                self.path, self.expected, self.found
            )
        }
    }
}

/// A validation failure: one or more issues, each carrying the field path
/// and the expected-vs-actual shape.
///
/// Collection validation gathers one issue per failing element, so a caller
/// can see every bad index, not merely that the list was invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The violations, in document order. Never empty.
    pub issues: Vec<Issue>,
}

impl ValidationError {
    /// Single-issue failure.
    pub fn new(path: impl Into<String>, expected: impl Into<String>, found: impl Into<String>) -> Self {
        ValidationError {
            issues: vec![Issue {
                path: path.into(),
                expected: expected.into(),
                found: found.into(),
            }],
        }
    }

    /// Failure from pre-collected issues. `issues` must be non-empty.
    pub fn from_issues(issues: Vec<Issue>) -> Self {
        debug_assert!(!issues.is_empty());
        ValidationError { issues }
    }

    /// Paths of all offending fields, in document order.
    pub fn paths(&self) -> Vec<&str> {
        self.issues.iter().map(|i| i.path.as_str()).collect()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.issues.as_slice() {
            [] => write!(f, "invalid document"),
            [only] => write!(f, "{}", only),
            [first, rest @ ..] => write!(f, "{} (and {} more)", first, rest.len()),
        }
    }
}

impl std::error::Error for ValidationError {}
