use std::path::PathBuf;

use thiserror::Error;

/// Errors returned while reading or writing the stored fingerprint.
#[derive(Debug, Error)]
pub enum StateError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The GitHub API answered with a status the store does not handle.
    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The configured API base URL cannot carry path segments.
    #[error("invalid API base URL '{0}'")]
    InvalidBaseUrl(String),

    /// Reading or writing the fingerprint file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
