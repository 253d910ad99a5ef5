use std::fs;
use std::io::{self, IsTerminal};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};
use wallhaven_core::config::{self, FileConfig};
use wallhaven_core::{
    ApiKeyStore, Console, DownloadOrchestrator, HttpClient, SearchPaginator, SearchQuery,
};

use crate::ProcessExit;
use crate::app::config_runtime::{RunSettings, resolve_settings};
use crate::app::terminal::{self, CursorGuard};
use crate::cli::Args;

pub(crate) async fn run_downloader(args: Args) -> Result<ProcessExit> {
    let file_config = load_file_config()?;
    let settings = resolve_settings(args, file_config.as_ref());
    debug!(
        folder = %settings.folder.display(),
        mute = settings.mute,
        plan = ?settings.plan,
        "settings resolved"
    );

    let query = build_query(&settings, &ApiKeyStore::default());
    if query.nsfw_without_key() {
        warn!("NSFW results won't be shown unless an API key is provided");
    }

    if !settings.folder.as_os_str().is_empty() {
        fs::create_dir_all(&settings.folder).with_context(|| {
            format!("Failed to create folder '{}'", settings.folder.display())
        })?;
    }

    let paginator = SearchPaginator::new(&settings.api_url, query)
        .context("Invalid --api-url")?;
    let client = HttpClient::with_throttle_policy(settings.throttle.clone());

    let use_spinner = terminal::should_use_spinner(
        io::stderr().is_terminal(),
        settings.mute,
        terminal::is_dumb_terminal(),
    );
    let orchestrator = DownloadOrchestrator::new(
        client,
        paginator,
        settings.folder.clone(),
        Console::stdout(settings.mute),
        settings.plan,
    )
    .with_progress(!settings.mute)
    .with_spinner(use_spinner);

    let _cursor = (!settings.mute).then(CursorGuard::hide);

    info!(folder = %settings.folder.display(), "wallhaven-dl starting");
    let outcome = orchestrator.run().await.context("Download run failed")?;
    info!(downloaded = outcome.downloaded(), "wallhaven-dl finished");

    Ok(ProcessExit::Success)
}

fn load_file_config() -> Result<Option<FileConfig>> {
    let Some(path) = config::default_config_path() else {
        return Ok(None);
    };
    let loaded = config::load_config(&path)
        .with_context(|| format!("Failed to load config file '{}'", path.display()))?;
    Ok(Some(loaded))
}

/// An explicit key is saved for later runs; otherwise the stored key is used.
fn build_query(settings: &RunSettings, store: &ApiKeyStore) -> SearchQuery {
    let api_key = match &settings.api_key {
        Some(key) => {
            if let Err(e) = store.save(key) {
                warn!(error = %e, "warning: couldn't store provided API key");
            }
            key.clone()
        }
        None => store.load().unwrap_or_else(|e| {
            warn!(error = %e, "ignoring unreadable API key file");
            String::new()
        }),
    };

    SearchQuery {
        query: settings.query.clone(),
        categories: settings.categories,
        purity: settings.purity,
        api_key,
        resolutions: settings.resolutions.clone(),
    }
}
