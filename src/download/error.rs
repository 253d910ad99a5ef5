//! Error types for the download module.
//!
//! This module defines structured errors for HTTP fetches and asset transfers,
//! providing context-rich error messages for debugging and user feedback.

use std::path::PathBuf;

use thiserror::Error;

use super::redact::redact_url;

/// Errors that can occur while fetching a URL or writing an asset to disk.
///
/// URLs are stored with their `apikey` value masked, so messages are safe to
/// print as-is.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error fetching {url}: {source}")]
    Network {
        /// The URL that failed.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout fetching {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// HTTP error response other than a throttling status.
    #[error("HTTP {status} fetching {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The server kept answering 429 past the configured retry bound.
    #[error("still throttled after {attempts} attempts fetching {url}")]
    Throttled {
        /// The throttled URL.
        url: String,
        /// Number of requests sent, including the first.
        attempts: u32,
    },

    /// File system error while writing an asset.
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The asset URL is malformed or has no usable final path segment.
    #[error("invalid asset URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },

    /// The asset response carried no Content-Length, so no progress total exists.
    #[error("response for {url} has no Content-Length header")]
    MissingContentLength {
        /// The asset URL.
        url: String,
    },

    /// Bytes written do not match the declared content length.
    #[error(
        "integrity check failed for {path}: expected {expected_bytes} bytes, got {actual_bytes}"
    )]
    Integrity {
        /// Destination path that failed verification.
        path: PathBuf,
        /// Declared size in bytes.
        expected_bytes: u64,
        /// Bytes actually written.
        actual_bytes: u64,
    },
}

impl DownloadError {
    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: shown(url),
            source: source.without_url(),
        }
    }

    /// Maps a reqwest error to `Timeout` or `Network`.
    pub fn from_reqwest(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::timeout(url)
        } else {
            Self::network(url, source)
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: shown(url),
            status,
        }
    }

    /// Creates a throttle-exhaustion error.
    pub fn throttled(url: impl Into<String>, attempts: u32) -> Self {
        Self::Throttled {
            url: shown(url),
            attempts,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: shown(url) }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: shown(url) }
    }

    /// Creates a missing content length error.
    pub fn missing_content_length(url: impl Into<String>) -> Self {
        Self::MissingContentLength { url: shown(url) }
    }

    /// Creates an integrity mismatch error.
    pub fn integrity(path: impl Into<PathBuf>, expected_bytes: u64, actual_bytes: u64) -> Self {
        Self::Integrity {
            path: path.into(),
            expected_bytes,
            actual_bytes,
        }
    }
}

fn shown(url: impl Into<String>) -> String {
    redact_url(&url.into())
}

// No `From<reqwest::Error>` / `From<std::io::Error>`: every variant needs the
// url or path the source error doesn't carry.
