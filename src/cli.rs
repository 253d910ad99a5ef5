//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use wallhaven_core::search::{DEFAULT_API_BASE, FilterFlags};

/// Bulk-download wallpapers from wallhaven.cc.
///
/// Searches the wallhaven API page by page and downloads every matching
/// wallpaper of a page concurrently. Values not given here fall back to
/// `$XDG_CONFIG_HOME/wallhaven-dl/config.toml`, then to built-in defaults.
#[derive(Parser, Debug)]
#[command(name = "wallhaven-dl")]
#[command(author, version, about)]
pub struct Args {
    /// Search query
    #[arg(short, long, default_value = "")]
    pub query: String,

    /// Categories on (1) or off (0) [general/anime/people], e.g. '010' [default: 111]
    #[arg(short, long)]
    pub categories: Option<FilterFlags>,

    /// Purities on (1) or off (0) [sfw/sketchy/nsfw]; NSFW needs an API key [default: 100]
    #[arg(short, long)]
    pub purity: Option<FilterFlags>,

    /// API key; the last one given is remembered in APIKEY.txt
    #[arg(short = 'k', long = "apikey")]
    pub api_key: Option<String>,

    /// Number of pages to download (ignored when --count is given)
    #[arg(short = 'n', long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub npages: u32,

    /// First page to download
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub start: u32,

    /// Exact resolutions, comma separated, e.g. '1920x1080,2560x1440'
    #[arg(short, long)]
    pub resolutions: Option<String>,

    /// Folder the wallpapers are saved to [default: wallhaven.cc]
    #[arg(short, long)]
    pub folder: Option<PathBuf>,

    /// Hide progress bars and status lines
    #[arg(short, long)]
    pub mute: bool,

    /// Download exactly this many wallpapers (takes priority over --npages)
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub count: Option<u64>,

    /// With --count, keep requesting pages until the count is met instead of estimating the range
    #[arg(long, requires = "count")]
    pub on_demand: bool,

    /// Seconds to wait before retrying a throttled (429) request [default: 10]
    #[arg(long, value_name = "SECS")]
    pub throttle_cooldown: Option<u64>,

    /// Give up after this many consecutive throttled responses (default: retry forever)
    #[arg(long, value_name = "N")]
    pub max_throttle_retries: Option<u32>,

    /// Base URL of the wallhaven API
    #[arg(long, default_value = DEFAULT_API_BASE, hide = true)]
    pub api_url: String,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(long, conflicts_with = "verbose")]
    pub quiet: bool,
}
