//! The page-by-page download loop.
//!
//! [`DownloadOrchestrator`] walks the planned pages in order. Each page's
//! assets are downloaded concurrently and the next page is only requested once
//! all of them have finished.

mod error;
mod outcome;
mod plan;

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, instrument};

use crate::download::{HttpClient, download_asset};
use crate::output::Console;
use crate::progress::ProgressBoard;
use crate::search::{PAGE_SIZE, SearchPaginator};

pub use error::EngineError;
pub use outcome::RunOutcome;
pub use plan::{PagePlan, PageStrategy};

/// Drives one run: fetch a page, download its assets, decide whether to go on.
#[derive(Debug)]
pub struct DownloadOrchestrator {
    client: HttpClient,
    paginator: SearchPaginator,
    folder: PathBuf,
    console: Console,
    board: Option<ProgressBoard>,
    plan: PagePlan,
    spinner: bool,
}

impl DownloadOrchestrator {
    /// Creates an orchestrator with progress display and spinner off.
    #[must_use]
    pub fn new(
        client: HttpClient,
        paginator: SearchPaginator,
        folder: impl Into<PathBuf>,
        console: Console,
        plan: PagePlan,
    ) -> Self {
        Self {
            client,
            paginator,
            folder: folder.into(),
            console,
            board: None,
            plan,
            spinner: false,
        }
    }

    /// Enables the live per-asset progress board, drawn through the console.
    #[must_use]
    pub fn with_progress(mut self, enabled: bool) -> Self {
        self.board = enabled.then(|| ProgressBoard::new(self.console.clone()));
        self
    }

    /// Shows a spinner while each search page is being fetched.
    #[must_use]
    pub fn with_spinner(mut self, enabled: bool) -> Self {
        self.spinner = enabled;
        self
    }

    /// The progress board, when enabled.
    #[must_use]
    pub fn board(&self) -> Option<&ProgressBoard> {
        self.board.as_ref()
    }

    /// Runs the page loop to completion.
    ///
    /// # Errors
    ///
    /// - [`EngineError::Search`] if a page cannot be fetched or decoded
    /// - [`EngineError::Batch`] if any download of a page fails; the other
    ///   downloads of that page are still awaited first
    #[instrument(skip(self), fields(folder = %self.folder.display()))]
    pub async fn run(&self) -> Result<RunOutcome, EngineError> {
        let target = self.plan.target();
        let mut downloaded: usize = 0;

        for page in self.plan.pages() {
            let spinner = self.page_spinner(page);
            let fetched = self.paginator.fetch_page(&self.client, page).await;
            if let Some(spinner) = spinner {
                spinner.finish_and_clear();
            }
            let mut locators = fetched?;
            let page_len = locators.len();

            if locators.is_empty() {
                return Ok(self.finish(RunOutcome::EmptyPage { page, downloaded }));
            }

            if let Some(target) = target {
                let remaining = target.saturating_sub(downloaded);
                if remaining == 0 {
                    return Ok(RunOutcome::CountReached { downloaded });
                }
                locators.truncate(remaining);
            }

            let count = locators.len();
            self.console
                .status(format_args!("Page N°{page} - Wallpapers: {count}"));
            info!(page, count, "downloading page");

            self.download_batch(page, &locators).await?;
            downloaded += count;

            if let Some(board) = &self.board {
                board.clear();
            }

            if let Some(target) = target {
                if downloaded >= target {
                    return Ok(self.finish(RunOutcome::CountReached { downloaded }));
                }
            } else if page_len < PAGE_SIZE {
                return Ok(self.finish(RunOutcome::EndOfResults { page, downloaded }));
            }
        }

        let outcome = match target {
            Some(target) => RunOutcome::PagesExhausted { downloaded, target },
            None => RunOutcome::RangeCompleted { downloaded },
        };
        Ok(self.finish(outcome))
    }

    /// Downloads every locator concurrently and waits for all of them.
    async fn download_batch(&self, page: u32, locators: &[String]) -> Result<(), EngineError> {
        let results = join_all(locators.iter().map(|url| {
            download_asset(&self.client, url, &self.folder, self.board.as_ref())
        }))
        .await;

        let attempted = results.len();
        let mut failed = 0;
        let mut first = None;
        for result in results {
            if let Err(e) = result {
                debug!(page, error = %e, "download failed");
                failed += 1;
                first.get_or_insert(e);
            }
        }

        match first {
            Some(first) => Err(EngineError::batch(page, failed, attempted, first)),
            None => Ok(()),
        }
    }

    fn finish(&self, outcome: RunOutcome) -> RunOutcome {
        if outcome.is_reported() {
            self.console.status(outcome);
        }
        info!(downloaded = outcome.downloaded(), ?outcome, "run finished");
        outcome
    }

    fn page_spinner(&self, page: u32) -> Option<ProgressBar> {
        if !self.spinner {
            return None;
        }
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(format!("Fetching page N°{page}..."));
        spinner.enable_steady_tick(Duration::from_millis(100));
        Some(spinner)
    }
}
