//! Wallhaven Downloader Core Library
//!
//! Bulk-downloads wallpapers matching a search from the wallhaven API. Search
//! pages are walked in order and every asset of a page is streamed to disk
//! concurrently before the next page is requested.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`download`] - Throttle-aware HTTP client and streaming asset downloads
//! - [`search`] - Search query encoding and page fetching
//! - [`progress`] - Live per-asset progress board
//! - [`orchestrator`] - The page loop and its stop conditions
//! - [`config`] - Optional defaults file
//! - [`credentials`] - API key persistence
//! - [`output`] - Status-line console shared with the progress board

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod credentials;
pub mod download;
pub mod orchestrator;
pub mod output;
pub mod progress;
pub mod search;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use credentials::{ApiKeyStore, CredentialError};
pub use download::{DownloadError, DownloadedAsset, HttpClient, ThrottlePolicy, download_asset};
pub use orchestrator::{DownloadOrchestrator, EngineError, PagePlan, PageStrategy, RunOutcome};
pub use output::Console;
pub use progress::{ProgressBoard, ProgressHandle};
pub use search::{FilterFlags, SearchError, SearchPaginator, SearchQuery};
