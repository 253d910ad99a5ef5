//! Paged search against the wallhaven API.
//!
//! [`SearchPaginator`] fetches one page of results at a time and returns the
//! asset URLs it references, in response order. Deciding whether to fetch the
//! next page is the orchestrator's job.

mod error;
mod query;

use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

use crate::download::{DownloadError, HttpClient};

pub use error::SearchError;
pub use query::{FilterFlags, FilterFlagsError, PURITY_NSFW, SearchQuery};

/// Default API root.
pub const DEFAULT_API_BASE: &str = "https://wallhaven.cc/api/v1";

/// Server-side page capacity.
pub const PAGE_SIZE: usize = 24;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    data: Vec<SearchItem>,
    #[serde(default)]
    meta: Option<SearchMeta>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    path: String,
}

#[derive(Debug, Deserialize)]
struct SearchMeta {
    #[serde(default)]
    current_page: Option<u32>,
    #[serde(default)]
    last_page: Option<u32>,
    #[serde(default)]
    total: Option<u64>,
}

/// Fetches pages of search results for one fixed [`SearchQuery`].
#[derive(Debug, Clone)]
pub struct SearchPaginator {
    search_url: Url,
    query: SearchQuery,
}

impl SearchPaginator {
    /// Creates a paginator querying `{api_base}/search`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidBaseUrl`] if `api_base` is not an absolute
    /// http(s) URL.
    pub fn new(api_base: &str, query: SearchQuery) -> Result<Self, SearchError> {
        let invalid = || SearchError::InvalidBaseUrl {
            base: api_base.to_string(),
        };
        let search_url = Url::parse(&format!("{}/search", api_base.trim_end_matches('/')))
            .map_err(|_| invalid())?;
        if !matches!(search_url.scheme(), "http" | "https") {
            return Err(invalid());
        }
        Ok(Self { search_url, query })
    }

    /// Full request URL for `page`.
    #[must_use]
    pub fn page_url(&self, page: u32) -> Url {
        self.query.to_url(&self.search_url, page)
    }

    /// Fetches `page` and returns the `path` of every result, in order.
    ///
    /// An empty vector means the page has no results.
    ///
    /// # Errors
    ///
    /// - [`SearchError::Request`] if the request fails
    /// - [`SearchError::HttpStatus`] for a non-success response
    /// - [`SearchError::Decode`] if the body is not `{"data": [{"path": ...}]}`
    #[instrument(skip(self, client))]
    pub async fn fetch_page(
        &self,
        client: &HttpClient,
        page: u32,
    ) -> Result<Vec<String>, SearchError> {
        let url = self.page_url(page);
        let response = client
            .fetch(url.as_str())
            .await
            .map_err(|e| SearchError::request(page, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::http_status(page, status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| SearchError::request(page, DownloadError::from_reqwest(url.as_str(), e)))?;
        let parsed: SearchResponse =
            serde_json::from_slice(&body).map_err(|e| SearchError::decode(page, e))?;

        if let Some(meta) = &parsed.meta {
            debug!(
                current_page = ?meta.current_page,
                last_page = ?meta.last_page,
                total = ?meta.total,
                "search metadata"
            );
        }

        let locators: Vec<String> = parsed.data.into_iter().map(|item| item.path).collect();
        debug!(count = locators.len(), "search page parsed");
        Ok(locators)
    }
}
