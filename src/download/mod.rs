//! HTTP fetching and streaming asset downloads.
//!
//! This module provides the shared [`HttpClient`] used for every request of a
//! run and [`download_asset`], which streams one wallpaper to disk.
//!
//! # Features
//!
//! - Transparent retry on HTTP 429 after a fixed cooldown (optionally bounded)
//! - Streaming downloads in bounded chunks, never buffering a whole body
//! - Per-asset progress reporting through a shared [`ProgressBoard`](crate::progress::ProgressBoard)
//! - Structured error types with full context
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use wallhaven_core::download::{HttpClient, download_asset};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new();
//! let asset = download_asset(
//!     &client,
//!     "https://w.wallhaven.cc/full/pk/wallhaven-pkgkkp.png",
//!     Path::new("wallhaven.cc"),
//!     None,
//! )
//! .await?;
//! println!("Downloaded: {}", asset.path.display());
//! # Ok(())
//! # }
//! ```

mod asset;
mod client;
pub mod constants;
mod error;
mod filename;
mod redact;
mod throttle;

pub use asset::{DownloadedAsset, download_asset};
pub use client::HttpClient;
pub use error::DownloadError;
pub use filename::{derive_filename, destination_path};
pub use redact::{REDACTED, redact_url};
pub use throttle::{ThrottleDecision, ThrottlePolicy};
