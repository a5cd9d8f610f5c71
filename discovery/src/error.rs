//! Error types for retrieval, configuration, and output assembly.
//!
//! The extraction engine itself never fails; these errors belong to the I/O
//! around it: reading configuration, fetching manual pages, and writing
//! output files.

use thiserror::Error;

/// Errors that can occur outside the pure extraction engine.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// File or process I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A configured dialect pattern is not a valid regular expression.
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Command name contains characters that cannot name a manual page.
    #[error("invalid command name: {0:?}")]
    InvalidCommand(String),

    /// No configured source produced a manual page.
    #[error("no manual page found for '{0}'")]
    ManPageNotFound(String),

    /// Remote manual-page fetch failed at the transport level.
    #[error("HTTP error: {0}")]
    Http(String),

    /// An existing output file is not a usable tool collection.
    #[error("invalid tool collection: {0}")]
    InvalidCollection(String),
}

/// Convenience alias for results with [`DiscoveryError`].
pub type Result<T> = std::result::Result<T, DiscoveryError>;
