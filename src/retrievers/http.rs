use crate::config::ScraperConfig;
use crate::error::{RetrievalError, ScrapeError};
use crate::retrievers::{ContentCheck, PageRetriever};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{self, HeaderMap, HeaderValue};

/// Plain HTTP GET. Fast, but sees only server-rendered markup.
#[derive(Debug, Clone)]
pub struct HttpRetriever {
    client: Client,
    check: ContentCheck,
}

/// Headers a desktop browser sends on a top-level navigation
fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.5"),
    );
    headers.insert(header::DNT, HeaderValue::from_static("1"));
    headers.insert(
        header::UPGRADE_INSECURE_REQUESTS,
        HeaderValue::from_static("1"),
    );
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers
}

impl HttpRetriever {
    pub fn new(config: &ScraperConfig) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .default_headers(browser_headers())
            .timeout(config.page_timeout())
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(|e| ScrapeError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            check: ContentCheck::from_config(config),
        })
    }
}

#[async_trait]
impl PageRetriever for HttpRetriever {
    async fn retrieve(&self, url: &str) -> Result<String, RetrievalError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            ::log::error!("Failed to fetch {}: {}", url, status);
            return Err(RetrievalError::HttpStatus(status.as_u16()));
        }

        let body = response.text().await?;
        ::log::debug!("Fetched {} bytes from {}", body.len(), url);
        self.check.validate(body)
    }
}
