use crate::error::ScrapeError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;

/// Desktop Chrome user agent sent by both retrievers
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Configuration for the scraper and its retrievers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Host the search URL must point at
    #[serde(default = "default_origin_domain")]
    pub origin_domain: String,

    /// Human-readable origin name used in error messages
    #[serde(default = "default_site_label")]
    pub site_label: String,

    /// Branding text that disqualifies alt/title/aria-label candidates
    #[serde(default = "default_site_name")]
    pub site_name: String,

    /// Query parameter carrying the page number
    #[serde(default = "default_page_param")]
    pub page_param: String,

    /// Largest allowed `end_page - start_page`
    #[serde(default = "default_max_page_span")]
    pub max_page_span: u32,

    /// Pause between two consecutive pages, in milliseconds
    #[serde(default = "default_politeness_delay_ms")]
    pub politeness_delay_ms: u64,

    /// Upper bound on the time spent retrieving a single page
    #[serde(default = "default_page_timeout_secs")]
    pub page_timeout_secs: u64,

    /// Bodies shorter than this are treated as soft failures
    #[serde(default = "default_min_content_length")]
    pub min_content_length: usize,

    /// Literal strings marking a soft-error page
    #[serde(default = "default_not_found_markers")]
    pub not_found_markers: Vec<String>,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Selector whose appearance means a rendered page has its results
    #[serde(default = "default_content_selector")]
    pub content_selector: String,

    /// How long a rendered fetch waits for `content_selector`
    #[serde(default = "default_render_wait_secs")]
    pub render_wait_secs: u64,
}

fn default_origin_domain() -> String {
    "stock.adobe.com".to_string()
}

fn default_site_label() -> String {
    "Adobe Stock".to_string()
}

fn default_site_name() -> String {
    "adobe".to_string()
}

fn default_page_param() -> String {
    "search_page".to_string()
}

fn default_max_page_span() -> u32 {
    20
}

fn default_politeness_delay_ms() -> u64 {
    1000
}

fn default_page_timeout_secs() -> u64 {
    45
}

fn default_min_content_length() -> usize {
    10_000
}

fn default_not_found_markers() -> Vec<String> {
    vec!["404 Not Found".to_string(), "Page not found".to_string()]
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_content_selector() -> String {
    r#"meta[itemprop="name"]"#.to_string()
}

fn default_render_wait_secs() -> u64 {
    10
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            origin_domain: default_origin_domain(),
            site_label: default_site_label(),
            site_name: default_site_name(),
            page_param: default_page_param(),
            max_page_span: default_max_page_span(),
            politeness_delay_ms: default_politeness_delay_ms(),
            page_timeout_secs: default_page_timeout_secs(),
            min_content_length: default_min_content_length(),
            not_found_markers: default_not_found_markers(),
            user_agent: default_user_agent(),
            webdriver_url: default_webdriver_url(),
            content_selector: default_content_selector(),
            render_wait_secs: default_render_wait_secs(),
        }
    }
}

impl ScraperConfig {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScrapeError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ScrapeError> {
        serde_json::from_str(json).map_err(|e| ScrapeError::Config(e.to_string()))
    }

    /// Apply the `WEBDRIVER_URL` environment override, if set and non-empty
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                self.webdriver_url = webdriver_url;
            }
        }
        self
    }

    pub fn politeness_delay(&self) -> Duration {
        Duration::from_millis(self.politeness_delay_ms)
    }

    pub fn page_timeout(&self) -> Duration {
        Duration::from_secs(self.page_timeout_secs)
    }

    pub fn render_wait(&self) -> Duration {
        Duration::from_secs(self.render_wait_secs)
    }
}
