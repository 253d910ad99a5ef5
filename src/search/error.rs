//! Error types for search requests.

use thiserror::Error;

use crate::download::DownloadError;

/// Errors that can occur while fetching or decoding one search page.
#[derive(Debug, Error)]
pub enum SearchError {
    /// The configured API base does not form a valid search URL.
    #[error("invalid search API base URL: {base}")]
    InvalidBaseUrl {
        /// The rejected base URL.
        base: String,
    },

    /// The request itself failed (transport error or exhausted throttling).
    #[error("search request for page {page} failed: {source}")]
    Request {
        /// Requested page number.
        page: u32,
        /// Underlying fetch error.
        #[source]
        source: DownloadError,
    },

    /// The API answered with a non-success status.
    #[error("search API returned HTTP {status} for page {page}")]
    HttpStatus {
        /// Requested page number.
        page: u32,
        /// The HTTP status code.
        status: u16,
    },

    /// The response body is not the expected JSON document.
    #[error("could not decode search results for page {page}: {source}")]
    Decode {
        /// Requested page number.
        page: u32,
        /// The JSON error.
        #[source]
        source: serde_json::Error,
    },
}

impl SearchError {
    /// Creates a request error.
    pub fn request(page: u32, source: DownloadError) -> Self {
        Self::Request { page, source }
    }

    /// Creates an HTTP status error.
    pub fn http_status(page: u32, status: u16) -> Self {
        Self::HttpStatus { page, status }
    }

    /// Creates a decode error.
    pub fn decode(page: u32, source: serde_json::Error) -> Self {
        Self::Decode { page, source }
    }
}
