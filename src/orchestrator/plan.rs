//! Which pages a run visits.

use crate::search::PAGE_SIZE;

/// How the page range is chosen when a target count is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PageStrategy {
    /// Visit `ceil(target / 24) + 1` pages from the start page.
    #[default]
    Estimated,
    /// Keep requesting pages until the target is met or a page comes back empty.
    OnDemand,
}

/// Page range plus the optional target count.
///
/// ```
/// use wallhaven_core::orchestrator::{PagePlan, PageStrategy};
///
/// let plan = PagePlan::new(1, 1, Some(30), PageStrategy::Estimated);
/// assert_eq!(plan.pages().collect::<Vec<_>>(), [1, 2, 3]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagePlan {
    start: u32,
    end: Option<u32>,
    target: Option<usize>,
}

impl PagePlan {
    /// Plans a run starting at `start`.
    ///
    /// Without a target the run visits `page_count` pages. With one, `page_count`
    /// is ignored and `strategy` decides the range.
    #[must_use]
    pub fn new(start: u32, page_count: u32, target: Option<usize>, strategy: PageStrategy) -> Self {
        let end = match (target, strategy) {
            (None, _) => Some(start.saturating_add(page_count)),
            (Some(target), PageStrategy::Estimated) => {
                let pages = u32::try_from(target.div_ceil(PAGE_SIZE)).unwrap_or(u32::MAX);
                Some(start.saturating_add(pages).saturating_add(1))
            }
            (Some(_), PageStrategy::OnDemand) => None,
        };
        Self { start, end, target }
    }

    /// Number of assets to stop at, if any.
    #[must_use]
    pub fn target(&self) -> Option<usize> {
        self.target
    }

    /// Pages to visit, ascending. Unbounded for [`PageStrategy::OnDemand`].
    pub fn pages(&self) -> impl Iterator<Item = u32> + use<> {
        self.start..self.end.unwrap_or(u32::MAX)
    }
}
