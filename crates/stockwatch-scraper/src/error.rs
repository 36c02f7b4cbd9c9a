use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("failed to serialize stock snapshot for fingerprinting: {0}")]
    Fingerprint(#[source] serde_json::Error),
}

/// Failure of the strict decode stage of the record extractor.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("embedded store data is not a JSON array: {0}")]
    Decode(#[from] serde_json::Error),
}
