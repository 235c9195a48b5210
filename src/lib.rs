// Re-export modules
pub mod boundary;
pub mod config;
pub mod error;
pub mod format;
pub mod orchestrator;
pub mod parsers;
pub mod results;
pub mod retrievers;
pub mod utils;

// Re-export commonly used types for convenience
pub use boundary::{ErrorBody, ScrapeJob, ScrapeRequest, ScrapeResponse};
pub use config::ScraperConfig;
pub use error::{RetrievalError, ScrapeError, ValidationError};
pub use format::FormatConfig;
pub use orchestrator::{NoProgress, ProgressSink};
pub use results::{PageProgress, ScrapeStats};

use chrono::Local;
use orchestrator::RunOptions;
use parsers::TitleExtractor;
use retrievers::{BrowserRetriever, HttpRetriever, PageRetriever};
use std::time::Instant;

/// Which page retrieval strategy a run uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetrieverKind {
    /// Plain HTTP GET
    #[default]
    Http,
    /// Headless browser over WebDriver
    Browser,
}

/// Prompts and counters of one completed run
#[derive(Debug, Clone)]
pub struct ScrapeOutput {
    pub prompts: Vec<String>,
    pub stats: ScrapeStats,
}

/// Entry point tying validation, retrieval, extraction and formatting together
pub struct Scrape {
    retriever_kind: RetrieverKind,
    config: ScraperConfig,
}

impl Scrape {
    /// Create a new Scrape with default configuration
    pub fn new(retriever_kind: RetrieverKind) -> Self {
        Self {
            retriever_kind,
            config: ScraperConfig::default(),
        }
    }

    /// Set the configuration
    pub fn with_config(mut self, config: ScraperConfig) -> Self {
        self.config = config;
        self
    }

    /// Load configuration from a file
    pub fn with_config_file(
        self,
        path: impl AsRef<std::path::Path>,
    ) -> Result<Self, ScrapeError> {
        let config = ScraperConfig::from_file(path)?;
        Ok(self.with_config(config))
    }

    /// Load configuration from a string
    pub fn with_config_str(self, config_str: &str) -> Result<Self, ScrapeError> {
        let config = ScraperConfig::from_json(config_str)?;
        Ok(self.with_config(config))
    }

    /// Override the pause between pages
    pub fn with_politeness_delay(mut self, millis: u64) -> Self {
        self.config.politeness_delay_ms = millis;
        self
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Validate, open a retriever of the configured kind, run, and close it.
    ///
    /// Validation errors come back as `Err`; anything that breaks the run
    /// after validation comes back as a failure envelope.
    pub async fn respond(
        &self,
        request: ScrapeRequest,
        progress: &dyn ProgressSink,
    ) -> Result<ScrapeResponse, ValidationError> {
        let job = request.validate(&self.config)?;

        let retriever = match self.open_retriever().await {
            Ok(retriever) => retriever,
            Err(e) => {
                ::log::error!("Scraping error: {}", e);
                return Ok(ScrapeResponse::failure(e));
            }
        };

        let output = self.execute(&job, retriever.as_ref(), progress).await;

        if let Err(e) = retriever.close().await {
            ::log::warn!("Failed to close retriever: {}", e);
        }

        Ok(ScrapeResponse::success(output.prompts, &output.stats))
    }

    /// Like [`Scrape::respond`] but with a caller-owned retriever, which is
    /// left open.
    pub async fn respond_with(
        &self,
        request: ScrapeRequest,
        retriever: &dyn PageRetriever,
        progress: &dyn ProgressSink,
    ) -> Result<ScrapeResponse, ValidationError> {
        let job = request.validate(&self.config)?;
        let output = self.execute(&job, retriever, progress).await;
        Ok(ScrapeResponse::success(output.prompts, &output.stats))
    }

    /// Run every page of an already validated job and format the result
    pub async fn execute(
        &self,
        job: &ScrapeJob,
        retriever: &dyn PageRetriever,
        progress: &dyn ProgressSink,
    ) -> ScrapeOutput {
        let started = Instant::now();
        let extractor = TitleExtractor::new(&self.config.site_name);
        let options = RunOptions::from_config(&self.config);

        let run = orchestrator::run(job, retriever, &extractor, &options, progress).await;

        let completed_on = Local::now().date_naive();
        let formatted = format::format_prompts(&run.titles, &job.format, completed_on);
        let stats = ScrapeStats::new(&run, formatted.prompt_count, started.elapsed());

        ::log::info!(
            "Produced {} prompts from {} titles in {}",
            stats.total_prompts,
            run.titles.len(),
            utils::format_processing_time(stats.elapsed)
        );

        ScrapeOutput {
            prompts: formatted.lines,
            stats,
        }
    }

    async fn open_retriever(&self) -> Result<Box<dyn PageRetriever>, ScrapeError> {
        match self.retriever_kind {
            RetrieverKind::Http => Ok(Box::new(HttpRetriever::new(&self.config)?)),
            RetrieverKind::Browser => {
                let config = self.config.clone().with_env_overrides();
                Ok(Box::new(BrowserRetriever::connect(&config).await?))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrievers::ContentCheck;
    use crate::retrievers::fake::{FakeRetriever, titles_page};

    fn scrape() -> Scrape {
        Scrape::new(RetrieverKind::Http).with_politeness_delay(0)
    }

    fn request(start_page: i64, end_page: i64, config: FormatConfig) -> ScrapeRequest {
        ScrapeRequest {
            url: "https://stock.adobe.com/search?k=pets".to_string(),
            start_page,
            end_page,
            config,
        }
    }

    #[tokio::test]
    async fn test_two_pages_end_to_end() {
        let retriever = FakeRetriever::new(vec![
            Ok(titles_page(&["Cat", "Dog"])),
            Ok(titles_page(&["Cat"])),
        ]);
        let config = FormatConfig {
            include_prefix: true,
            prefix: "abc".into(),
            ..FormatConfig::default()
        };

        let response = scrape()
            .respond_with(request(1, 2, config), &retriever, &NoProgress)
            .await
            .unwrap();

        assert!(response.success);
        assert_eq!(
            response.prompts.unwrap(),
            vec!["abc 01 Cat", "abc 02 Dog"]
        );
        assert_eq!(response.stats.total_pages, 2);
        assert_eq!(response.stats.successful_pages, 2);
        assert_eq!(response.stats.failed_pages, 0);
        assert_eq!(response.stats.total_prompts, 2);
        assert!(response.stats.processing_time.ends_with('s'));
    }

    #[tokio::test]
    async fn test_blank_lines_do_not_count_as_prompts() {
        let retriever = FakeRetriever::new(vec![Ok(titles_page(&["Cat", "Dog"]))]);
        let config = FormatConfig {
            add_empty_line: true,
            ..FormatConfig::default()
        };

        let response = scrape()
            .respond_with(request(1, 1, config), &retriever, &NoProgress)
            .await
            .unwrap();

        assert_eq!(response.prompts.unwrap(), vec!["Cat", "", "Dog", ""]);
        assert_eq!(response.stats.total_prompts, 2);
    }

    #[tokio::test]
    async fn test_short_page_counts_as_failed() {
        let check = ContentCheck::from_config(&ScraperConfig::default());
        let long_page = format!("{}{}", titles_page(&["Cat"]), " ".repeat(10_000));
        let retriever = FakeRetriever::new(vec![
            Ok(titles_page(&["Dog"])),
            Ok(long_page),
        ])
        .with_content_check(check);

        let response = scrape()
            .respond_with(request(1, 2, FormatConfig::default()), &retriever, &NoProgress)
            .await
            .unwrap();

        assert_eq!(response.prompts.unwrap(), vec!["Cat"]);
        assert_eq!(response.stats.successful_pages, 1);
        assert_eq!(response.stats.failed_pages, 1);
    }

    #[tokio::test]
    async fn test_oversized_range_rejected_before_retrieval() {
        let retriever = FakeRetriever::new(vec![Ok(titles_page(&["Cat"]))]);

        let err = scrape()
            .respond_with(request(1, 22, FormatConfig::default()), &retriever, &NoProgress)
            .await
            .unwrap_err();

        assert_eq!(err, ValidationError::RangeTooLarge { max: 20 });
        assert!(retriever.requested().is_empty());
    }

    #[tokio::test]
    async fn test_caller_owned_retriever_left_open() {
        let retriever = FakeRetriever::new(vec![Ok(titles_page(&["Cat"]))]);
        scrape()
            .respond_with(request(1, 1, FormatConfig::default()), &retriever, &NoProgress)
            .await
            .unwrap();
        assert!(!retriever.is_closed());
    }

    #[test]
    fn test_with_config_str() {
        let scrape = Scrape::new(RetrieverKind::Http)
            .with_config_str(r#"{"max_page_span": 5}"#)
            .unwrap();
        assert_eq!(scrape.config().max_page_span, 5);
    }
}
