//! API key persistence.
//!
//! A key passed on the command line is remembered in a plain-text file so that
//! later runs can omit it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

/// File name used when no other location is configured.
pub const DEFAULT_API_KEY_FILE: &str = "APIKEY.txt";

/// Errors reading or writing the stored key.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// The key file exists but could not be read.
    #[error("could not read API key from {path}: {source}")]
    Read {
        /// Key file location.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },

    /// The key could not be written.
    #[error("couldn't store provided API key in {path}: {source}")]
    Write {
        /// Key file location.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}

/// Plain-text store holding a single API key.
#[derive(Debug, Clone)]
pub struct ApiKeyStore {
    path: PathBuf,
}

impl Default for ApiKeyStore {
    fn default() -> Self {
        Self::new(DEFAULT_API_KEY_FILE)
    }
}

impl ApiKeyStore {
    /// Creates a store backed by `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Key file location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the stored key, or an empty string when nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Read`] if the file exists but cannot be read.
    pub fn load(&self) -> Result<String, CredentialError> {
        match fs::read_to_string(&self.path) {
            Ok(key) => {
                debug!(path = %self.path.display(), "loaded stored API key");
                Ok(key.trim().to_string())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
            Err(source) => Err(CredentialError::Read {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Overwrites the stored key.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Write`] if the file cannot be written.
    pub fn save(&self, key: &str) -> Result<(), CredentialError> {
        fs::write(&self.path, key).map_err(|source| CredentialError::Write {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), "stored API key");
        Ok(())
    }
}
