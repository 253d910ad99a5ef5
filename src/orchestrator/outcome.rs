//! How a run ended.

use std::fmt;

/// Reason a run stopped, with the number of assets downloaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// A page returned no results.
    EmptyPage {
        /// The empty page.
        page: u32,
        /// Assets downloaded before it.
        downloaded: usize,
    },
    /// The target count was reached.
    CountReached {
        /// Assets downloaded.
        downloaded: usize,
    },
    /// Without a target, a page came back short of capacity.
    EndOfResults {
        /// The short page.
        page: u32,
        /// Assets downloaded.
        downloaded: usize,
    },
    /// The planned pages ran out before the target was met.
    PagesExhausted {
        /// Assets downloaded.
        downloaded: usize,
        /// The unmet target.
        target: usize,
    },
    /// Every planned page was visited with no target set.
    RangeCompleted {
        /// Assets downloaded.
        downloaded: usize,
    },
}

impl RunOutcome {
    /// Assets downloaded over the whole run.
    #[must_use]
    pub fn downloaded(&self) -> usize {
        match *self {
            Self::EmptyPage { downloaded, .. }
            | Self::CountReached { downloaded }
            | Self::EndOfResults { downloaded, .. }
            | Self::PagesExhausted { downloaded, .. }
            | Self::RangeCompleted { downloaded } => downloaded,
        }
    }

    /// Whether the outcome is announced with a status line.
    #[must_use]
    pub fn is_reported(&self) -> bool {
        !matches!(self, Self::RangeCompleted { .. })
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPage { page, .. } => write!(f, "No wallpapers found on page N°{page}"),
            Self::CountReached { downloaded } => write!(f, "Downloaded {downloaded} wallpapers"),
            Self::EndOfResults { page, .. } => write!(
                f,
                "Exiting at page N°{page} as no more wallpapers were found"
            ),
            Self::PagesExhausted { downloaded, target } => write!(
                f,
                "Downloaded {downloaded}/{target} wallpapers (ran out of pages)"
            ),
            Self::RangeCompleted { downloaded } => {
                write!(f, "Finished page range with {downloaded} wallpapers")
            }
        }
    }
}
