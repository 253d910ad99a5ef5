//! Optional defaults file.
//!
//! Lives at `$XDG_CONFIG_HOME/wallhaven-dl/config.toml` (falling back to
//! `$HOME/.config/wallhaven-dl/config.toml`) and holds `key = value` lines.
//! Command-line values always take precedence over anything set here.
//!
//! ```toml
//! folder = "wallpapers"
//! categories = "110"
//! purity = "100"
//! resolutions = "1920x1080,2560x1440"
//! throttle_cooldown_secs = 5
//! max_throttle_retries = 20
//! ```

use std::env;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;
use tracing::debug;

use crate::search::{FilterFlags, FilterFlagsError};

/// Errors loading the defaults file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("failed to read config file '{path}': {source}")]
    Read {
        /// Config file location.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A line is not `key = value`.
    #[error("invalid config syntax on line {line}: expected key = value")]
    Syntax {
        /// 1-based line number.
        line: usize,
    },

    /// A key this tool does not know.
    #[error("unknown configuration key '{key}' on line {line}")]
    UnknownKey {
        /// The key as written.
        key: String,
        /// 1-based line number.
        line: usize,
    },

    /// A known key with a value that does not parse.
    #[error("invalid `{key}` value on line {line}: {reason}")]
    InvalidValue {
        /// The key.
        key: &'static str,
        /// 1-based line number.
        line: usize,
        /// What was expected.
        reason: String,
    },
}

/// Defaults read from the config file. Unset keys are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileConfig {
    /// Destination folder.
    pub folder: Option<PathBuf>,
    /// Category toggles.
    pub categories: Option<FilterFlags>,
    /// Purity toggles.
    pub purity: Option<FilterFlags>,
    /// Exact resolutions.
    pub resolutions: Option<String>,
    /// Seconds to wait after a 429.
    pub throttle_cooldown_secs: Option<u64>,
    /// Bound on consecutive 429 retries.
    pub max_throttle_retries: Option<u32>,
}

/// Resolves the default config path.
///
/// Priority:
/// 1. `$XDG_CONFIG_HOME/wallhaven-dl/config.toml`
/// 2. `$HOME/.config/wallhaven-dl/config.toml`
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    if let Some(xdg_config_home) = env_var_non_empty_os("XDG_CONFIG_HOME") {
        return Some(
            PathBuf::from(xdg_config_home)
                .join("wallhaven-dl")
                .join("config.toml"),
        );
    }

    let home = env_var_non_empty_os("HOME")?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("wallhaven-dl")
            .join("config.toml"),
    )
}

fn env_var_non_empty_os(name: &str) -> Option<OsString> {
    let value = env::var_os(name)?;
    if value.is_empty() { None } else { Some(value) }
}

/// Loads the file at `path`, or an empty config if it does not exist.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file cannot be read or parsed.
pub fn load_config(path: &Path) -> Result<FileConfig, ConfigError> {
    if !path.exists() {
        debug!(path = %path.display(), "no config file");
        return Ok(FileConfig::default());
    }
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config_str(&raw)?;
    debug!(path = %path.display(), ?config, "loaded config file");
    Ok(config)
}

/// Parses config file contents.
///
/// # Errors
///
/// Returns a [`ConfigError`] for malformed lines, unknown keys or bad values.
pub fn parse_config_str(raw: &str) -> Result<FileConfig, ConfigError> {
    let mut cfg = FileConfig::default();
    for (line_index, raw_line) in raw.lines().enumerate() {
        let line_no = line_index + 1;
        let line = strip_inline_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }

        let Some((raw_key, raw_value)) = line.split_once('=') else {
            return Err(ConfigError::Syntax { line: line_no });
        };
        let key = raw_key.trim();
        let value = raw_value.trim();

        match key {
            "folder" => {
                cfg.folder = Some(PathBuf::from(string_literal("folder", line_no, value)?));
            }
            "categories" => cfg.categories = Some(flags("categories", line_no, value)?),
            "purity" => cfg.purity = Some(flags("purity", line_no, value)?),
            "resolutions" => {
                cfg.resolutions = Some(string_literal("resolutions", line_no, value)?);
            }
            "throttle_cooldown_secs" => {
                cfg.throttle_cooldown_secs =
                    Some(integer("throttle_cooldown_secs", line_no, value)?);
            }
            "max_throttle_retries" => {
                cfg.max_throttle_retries = Some(integer("max_throttle_retries", line_no, value)?);
            }
            unknown => {
                return Err(ConfigError::UnknownKey {
                    key: unknown.to_string(),
                    line: line_no,
                });
            }
        }
    }
    Ok(cfg)
}

fn strip_inline_comment(line: &str) -> &str {
    let mut in_string = false;
    for (index, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..index],
            _ => {}
        }
    }
    line
}

fn string_literal(key: &'static str, line: usize, raw: &str) -> Result<String, ConfigError> {
    raw.strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .map(str::to_string)
        .ok_or_else(|| ConfigError::InvalidValue {
            key,
            line,
            reason: "expected double-quoted string".to_string(),
        })
}

fn flags(key: &'static str, line: usize, raw: &str) -> Result<FilterFlags, ConfigError> {
    string_literal(key, line, raw)?
        .parse()
        .map_err(|e: FilterFlagsError| ConfigError::InvalidValue {
            key,
            line,
            reason: e.to_string(),
        })
}

fn integer<T: FromStr>(key: &'static str, line: usize, raw: &str) -> Result<T, ConfigError> {
    raw.parse().map_err(|_| ConfigError::InvalidValue {
        key,
        line,
        reason: "expected non-negative integer".to_string(),
    })
}
