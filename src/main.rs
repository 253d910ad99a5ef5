//! CLI entry point for wallhaven-dl.

use std::process::ExitCode;

use clap::Parser;
use tracing::{debug, warn};

mod app;
mod cli;

use cli::Args;

/// How the process ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ProcessExit {
    Success,
    Failure,
    Interrupted,
}

impl ProcessExit {
    fn code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::Failure => 1,
            Self::Interrupted => 130,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();
    app::terminal::init_tracing(app::config_runtime::resolve_default_log_level(
        args.verbose,
        args.quiet,
    ));
    debug!("CLI arguments parsed");

    let interrupted = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "could not listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    // Dropping the run future on Ctrl-C restores the cursor and closes the client.
    let exit = tokio::select! {
        result = app::runtime::run_downloader(args) => match result {
            Ok(exit) => exit,
            Err(e) => {
                eprintln!("error: {e:#}");
                ProcessExit::Failure
            }
        },
        () = interrupted => {
            eprintln!("interrupted");
            ProcessExit::Interrupted
        }
    };

    ExitCode::from(exit.code())
}
