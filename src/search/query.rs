//! Search filter parameters and their query-string encoding.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use url::Url;

/// Number of toggles in a category or purity flag string.
const FLAG_COUNT: usize = 3;

/// Index of the NSFW toggle in a purity flag string (`sfw/sketchy/nsfw`).
pub const PURITY_NSFW: usize = 2;

/// Rejected flag string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected {FLAG_COUNT} characters of '0' or '1', got {value:?}")]
pub struct FilterFlagsError {
    /// The rejected input.
    pub value: String,
}

/// Three on/off toggles, written as a `0`/`1` string such as `"110"`.
///
/// Used for categories (`general/anime/people`) and purity (`sfw/sketchy/nsfw`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterFlags([bool; FLAG_COUNT]);

impl FilterFlags {
    /// Builds flags from explicit toggles.
    #[must_use]
    pub const fn new(flags: [bool; FLAG_COUNT]) -> Self {
        Self(flags)
    }

    /// Whether toggle `index` is on. Out-of-range indices are off.
    #[must_use]
    pub fn is_set(self, index: usize) -> bool {
        self.0.get(index).copied().unwrap_or(false)
    }
}

impl FromStr for FilterFlags {
    type Err = FilterFlagsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FilterFlagsError {
            value: s.to_string(),
        };
        let bytes = s.as_bytes();
        if bytes.len() != FLAG_COUNT {
            return Err(invalid());
        }
        let mut flags = [false; FLAG_COUNT];
        for (flag, byte) in flags.iter_mut().zip(bytes) {
            *flag = match byte {
                b'0' => false,
                b'1' => true,
                _ => return Err(invalid()),
            };
        }
        Ok(Self(flags))
    }
}

impl fmt::Display for FilterFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for flag in self.0 {
            f.write_str(if flag { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Filter set fixed for a whole run; only the page number varies per request.
#[derive(Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Free-text query.
    pub query: String,
    /// Category toggles.
    pub categories: FilterFlags,
    /// Purity toggles.
    pub purity: FilterFlags,
    /// API key; may be empty.
    pub api_key: String,
    /// Exact resolutions, comma separated (`"1920x1080,2560x1440"`); may be empty.
    pub resolutions: String,
}

impl fmt::Debug for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchQuery")
            .field("query", &self.query)
            .field("categories", &self.categories.to_string())
            .field("purity", &self.purity.to_string())
            .field("api_key", &if self.api_key.is_empty() { "" } else { "<redacted>" })
            .field("resolutions", &self.resolutions)
            .finish()
    }
}

impl SearchQuery {
    /// Whether NSFW results are requested without an API key to unlock them.
    #[must_use]
    pub fn nsfw_without_key(&self) -> bool {
        self.purity.is_set(PURITY_NSFW) && self.api_key.is_empty()
    }

    /// Appends `q, categories, purity, apikey, resolutions, page` to `search_url`.
    #[must_use]
    pub fn to_url(&self, search_url: &Url, page: u32) -> Url {
        let mut url = search_url.clone();
        url.query_pairs_mut()
            .append_pair("q", &self.query)
            .append_pair("categories", &self.categories.to_string())
            .append_pair("purity", &self.purity.to_string())
            .append_pair("apikey", &self.api_key)
            .append_pair("resolutions", &self.resolutions)
            .append_pair("page", &page.to_string());
        url
    }
}
