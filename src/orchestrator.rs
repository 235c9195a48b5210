//! Sequential page loop: retrieve, extract, tally, pause.

use crate::boundary::ScrapeJob;
use crate::config::ScraperConfig;
use crate::error::RetrievalError;
use crate::parsers::{Extractor, document_title};
use crate::results::{FailureReason, PageOutcome, PageProgress, PageResult, ScrapeRun};
use crate::retrievers::{PageRetriever, page_url};
use std::time::Duration;
use tokio::time::timeout;

/// Observer notified after every page, success or failure
pub trait ProgressSink: Send + Sync {
    fn page_finished(&self, progress: &PageProgress);
}

impl<F> ProgressSink for F
where
    F: Fn(&PageProgress) + Send + Sync,
{
    fn page_finished(&self, progress: &PageProgress) {
        self(progress)
    }
}

/// Sink that ignores progress
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn page_finished(&self, _progress: &PageProgress) {}
}

/// Knobs controlling how pages are requested
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub page_param: String,
    pub politeness_delay: Duration,
    pub page_timeout: Duration,
}

impl RunOptions {
    pub fn from_config(config: &ScraperConfig) -> Self {
        Self {
            page_param: config.page_param.clone(),
            politeness_delay: config.politeness_delay(),
            page_timeout: config.page_timeout(),
        }
    }
}

/// Walk every page of `job` in order, one at a time.
///
/// A page failure is recorded and the loop moves on; the returned run always
/// holds one result per requested page.
pub async fn run(
    job: &ScrapeJob,
    retriever: &dyn PageRetriever,
    extractor: &dyn Extractor,
    options: &RunOptions,
    progress: &dyn ProgressSink,
) -> ScrapeRun {
    let total_pages = job.page_count();
    let mut run = ScrapeRun::default();

    ::log::info!(
        "Scraping pages {}..={} of {}",
        job.start_page,
        job.end_page,
        job.base_url
    );

    for (ordinal, page_number) in (job.start_page..=job.end_page).enumerate() {
        let page = process_page(job, page_number, retriever, extractor, options).await;
        let current_page = ordinal as u32 + 1;

        let message = match &page.outcome {
            PageOutcome::Success(_) => {
                format!("Page {}: found {} titles", page_number, page.titles().len())
            }
            PageOutcome::Failure(reason) => format!("Page {}: {}", page_number, reason),
        };
        let succeeded = page.is_success();
        run.record(page);

        progress.page_finished(&PageProgress {
            current_page,
            page_number,
            total_pages,
            titles_so_far: run.titles.len(),
            succeeded,
            message,
            percentage: (current_page * 100 / total_pages) as u8,
        });

        if page_number < job.end_page && !options.politeness_delay.is_zero() {
            tokio::time::sleep(options.politeness_delay).await;
        }
    }

    ::log::info!(
        "Finished {} pages: {} succeeded, {} failed, {} titles",
        run.total_pages(),
        run.successful_pages,
        run.failed_pages,
        run.titles.len()
    );

    run
}

async fn process_page(
    job: &ScrapeJob,
    page_number: u32,
    retriever: &dyn PageRetriever,
    extractor: &dyn Extractor,
    options: &RunOptions,
) -> PageResult {
    let url = match page_url(&job.base_url, &options.page_param, page_number) {
        Ok(url) => url,
        Err(e) => return PageResult::failure(page_number, FailureReason::Retrieval(e)),
    };

    ::log::info!("Fetching page {}: {}", page_number, url);

    let html = match timeout(options.page_timeout, retriever.retrieve(&url)).await {
        Ok(Ok(html)) => html,
        Ok(Err(e)) => {
            ::log::warn!("Page {} failed: {}", page_number, e);
            return PageResult::failure(page_number, FailureReason::Retrieval(e));
        }
        Err(_) => {
            ::log::error!("Timeout fetching page {}: {}", page_number, url);
            return PageResult::failure(
                page_number,
                FailureReason::Retrieval(RetrievalError::Timeout),
            );
        }
    };

    ::log::debug!(
        "Page {} content length {}, title {:?}",
        page_number,
        html.len(),
        document_title(&html)
    );

    let titles = extractor.extract(&html);
    if titles.is_empty() {
        ::log::warn!("Page {}: no titles found", page_number);
        PageResult::failure(page_number, FailureReason::NoTitles)
    } else {
        ::log::info!("Page {}: found {} titles", page_number, titles.len());
        PageResult::success(page_number, titles)
    }
}
