//! Errors that stop a run.

use thiserror::Error;

use crate::download::DownloadError;
use crate::search::SearchError;

/// Errors that abort the page loop.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A search page could not be fetched or decoded.
    #[error(transparent)]
    Search(#[from] SearchError),

    /// One or more downloads of a page failed. Raised only after every
    /// download of that page has finished.
    #[error("{failed} of {attempted} downloads failed on page {page}")]
    Batch {
        /// The page whose batch failed.
        page: u32,
        /// Number of failed downloads.
        failed: usize,
        /// Number of downloads started.
        attempted: usize,
        /// The first failure, in result order.
        #[source]
        first: DownloadError,
    },
}

impl EngineError {
    /// Creates a batch error.
    pub fn batch(page: u32, failed: usize, attempted: usize, first: DownloadError) -> Self {
        Self::Batch {
            page,
            failed,
            attempted,
            first,
        }
    }
}
