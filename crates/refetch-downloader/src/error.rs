//! Downloader errors.

use thiserror::Error;

/// Download error types.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// URL could not be parsed.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Request failed before a usable response arrived.
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("Unexpected status {status} for {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// Writing the payload to disk failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
