//! Merges command-line arguments over the defaults file.

use std::path::PathBuf;
use std::time::Duration;

use wallhaven_core::config::FileConfig;
use wallhaven_core::download::ThrottlePolicy;
use wallhaven_core::download::constants::DEFAULT_THROTTLE_COOLDOWN;
use wallhaven_core::orchestrator::{PagePlan, PageStrategy};
use wallhaven_core::search::FilterFlags;

use crate::cli::Args;

pub(crate) const DEFAULT_FOLDER: &str = "wallhaven.cc";
const DEFAULT_CATEGORIES: FilterFlags = FilterFlags::new([true, true, true]);
const DEFAULT_PURITY: FilterFlags = FilterFlags::new([true, false, false]);

/// Everything a run needs, after defaults have been applied.
#[derive(Debug, Clone)]
pub(crate) struct RunSettings {
    pub(crate) query: String,
    pub(crate) categories: FilterFlags,
    pub(crate) purity: FilterFlags,
    /// Key given on the command line, if any; the stored key is consulted otherwise.
    pub(crate) api_key: Option<String>,
    pub(crate) resolutions: String,
    pub(crate) folder: PathBuf,
    pub(crate) mute: bool,
    pub(crate) plan: PagePlan,
    pub(crate) throttle: ThrottlePolicy,
    pub(crate) api_url: String,
}

/// Command line first, then the config file, then built-in defaults.
pub(crate) fn resolve_settings(args: Args, file: Option<&FileConfig>) -> RunSettings {
    let file = file.cloned().unwrap_or_default();

    let strategy = if args.on_demand {
        PageStrategy::OnDemand
    } else {
        PageStrategy::Estimated
    };
    let target = args
        .count
        .map(|count| usize::try_from(count).unwrap_or(usize::MAX));

    let cooldown = args
        .throttle_cooldown
        .or(file.throttle_cooldown_secs)
        .map_or(DEFAULT_THROTTLE_COOLDOWN, Duration::from_secs);
    let max_retries = args.max_throttle_retries.or(file.max_throttle_retries);

    RunSettings {
        query: args.query,
        categories: args
            .categories
            .or(file.categories)
            .unwrap_or(DEFAULT_CATEGORIES),
        purity: args.purity.or(file.purity).unwrap_or(DEFAULT_PURITY),
        api_key: args.api_key,
        resolutions: args.resolutions.or(file.resolutions).unwrap_or_default(),
        folder: args
            .folder
            .or(file.folder)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FOLDER)),
        mute: args.mute,
        plan: PagePlan::new(args.start, args.npages, target, strategy),
        throttle: ThrottlePolicy::new(cooldown, max_retries),
        api_url: args.api_url,
    }
}

/// Log level used when `RUST_LOG` is unset.
pub(crate) fn resolve_default_log_level(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["wallhaven-dl"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_builtin_defaults() {
        let settings = resolve_settings(args(&[]), None);
        assert_eq!(settings.categories.to_string(), "111");
        assert_eq!(settings.purity.to_string(), "100");
        assert_eq!(settings.folder, PathBuf::from("wallhaven.cc"));
        assert_eq!(settings.resolutions, "");
        assert_eq!(settings.throttle.cooldown(), Duration::from_secs(10));
        assert_eq!(settings.throttle.max_retries(), None);
        assert_eq!(settings.plan.pages().collect::<Vec<_>>(), [1]);
        assert!(settings.api_key.is_none());
    }

    #[test]
    fn test_file_values_fill_unset_flags() {
        let file = FileConfig {
            folder: Some(PathBuf::from("walls")),
            categories: Some("010".parse().unwrap()),
            purity: Some("110".parse().unwrap()),
            resolutions: Some("1920x1080".to_string()),
            throttle_cooldown_secs: Some(2),
            max_throttle_retries: Some(4),
        };
        let settings = resolve_settings(args(&[]), Some(&file));
        assert_eq!(settings.folder, PathBuf::from("walls"));
        assert_eq!(settings.categories.to_string(), "010");
        assert_eq!(settings.purity.to_string(), "110");
        assert_eq!(settings.resolutions, "1920x1080");
        assert_eq!(settings.throttle.cooldown(), Duration::from_secs(2));
        assert_eq!(settings.throttle.max_retries(), Some(4));
    }

    #[test]
    fn test_command_line_wins_over_file() {
        let file = FileConfig {
            folder: Some(PathBuf::from("walls")),
            purity: Some("110".parse().unwrap()),
            throttle_cooldown_secs: Some(2),
            ..FileConfig::default()
        };
        let settings = resolve_settings(
            args(&["-f", "other", "-p", "001", "--throttle-cooldown", "7"]),
            Some(&file),
        );
        assert_eq!(settings.folder, PathBuf::from("other"));
        assert_eq!(settings.purity.to_string(), "001");
        assert_eq!(settings.throttle.cooldown(), Duration::from_secs(7));
    }

    #[test]
    fn test_count_overrides_page_count() {
        let settings = resolve_settings(args(&["-n", "9", "-s", "3", "--count", "30"]), None);
        assert_eq!(settings.plan.target(), Some(30));
        assert_eq!(settings.plan.pages().collect::<Vec<_>>(), [3, 4, 5]);
    }

    #[test]
    fn test_default_log_levels() {
        assert_eq!(resolve_default_log_level(0, false), "warn");
        assert_eq!(resolve_default_log_level(1, false), "info");
        assert_eq!(resolve_default_log_level(2, false), "debug");
        assert_eq!(resolve_default_log_level(5, false), "trace");
        assert_eq!(resolve_default_log_level(0, true), "error");
    }
}
