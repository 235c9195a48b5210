use crate::error::RetrievalError;
use serde::Serialize;
use std::time::Duration;

/// Why a page contributed no titles
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The retriever could not produce a usable document
    Retrieval(RetrievalError),
    /// The document loaded but no extraction strategy matched
    NoTitles,
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FailureReason::Retrieval(err) => write!(f, "{}", err),
            FailureReason::NoTitles => write!(f, "no titles found"),
        }
    }
}

/// Outcome of one page attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    Success(Vec<String>),
    Failure(FailureReason),
}

/// Represents one attempted page with its outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult {
    /// Page number as sent to the origin
    pub page_number: u32,

    pub outcome: PageOutcome,
}

impl PageResult {
    pub fn success(page_number: u32, titles: Vec<String>) -> Self {
        Self {
            page_number,
            outcome: PageOutcome::Success(titles),
        }
    }

    pub fn failure(page_number: u32, reason: FailureReason) -> Self {
        Self {
            page_number,
            outcome: PageOutcome::Failure(reason),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, PageOutcome::Success(_))
    }

    /// Titles found on this page, empty for a failed page
    pub fn titles(&self) -> &[String] {
        match &self.outcome {
            PageOutcome::Success(titles) => titles,
            PageOutcome::Failure(_) => &[],
        }
    }
}

/// Everything one orchestration run produced, before formatting
#[derive(Debug, Clone, Default)]
pub struct ScrapeRun {
    /// All titles across pages, in page order then extraction order, duplicates kept
    pub titles: Vec<String>,

    /// One entry per attempted page, in page order
    pub pages: Vec<PageResult>,

    pub successful_pages: u32,
    pub failed_pages: u32,
}

impl ScrapeRun {
    pub fn total_pages(&self) -> u32 {
        self.pages.len() as u32
    }

    pub(crate) fn record(&mut self, page: PageResult) {
        if page.is_success() {
            self.successful_pages += 1;
        } else {
            self.failed_pages += 1;
        }
        self.titles.extend_from_slice(page.titles());
        self.pages.push(page);
    }
}

/// Counters reported once a run is complete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrapeStats {
    pub total_pages: u32,
    pub successful_pages: u32,
    pub failed_pages: u32,
    pub total_prompts: usize,
    pub elapsed: Duration,
}

impl ScrapeStats {
    pub fn new(run: &ScrapeRun, total_prompts: usize, elapsed: Duration) -> Self {
        Self {
            total_pages: run.total_pages(),
            successful_pages: run.successful_pages,
            failed_pages: run.failed_pages,
            total_prompts,
            elapsed,
        }
    }
}

/// Snapshot handed to a progress sink after every page
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageProgress {
    /// 1-based position of this page within the run
    pub current_page: u32,
    pub page_number: u32,
    pub total_pages: u32,
    /// Titles accumulated so far, duplicates included
    pub titles_so_far: usize,
    pub succeeded: bool,
    pub message: String,
    pub percentage: u8,
}
