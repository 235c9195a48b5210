use crate::config::ScraperConfig;
use crate::error::{RetrievalError, ScrapeError};
use crate::retrievers::{ContentCheck, PageRetriever};
use async_trait::async_trait;
use fantoccini::wd::Capabilities;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;
use std::time::Duration;

/// WebDriver endpoints tried when the configured one is unreachable
const FALLBACK_WEBDRIVER_URLS: &[&str] = &[
    "http://localhost:9515", // ChromeDriver default
    "http://localhost:4444", // geckodriver / Selenium default
    "http://127.0.0.1:4444",
];

/// Browser-rendered fetch over WebDriver, for pages whose results are
/// injected by client-side scripts.
///
/// Holds one session for the whole run; the owner must call
/// [`PageRetriever::close`] when done.
pub struct BrowserRetriever {
    client: Client,
    content_selector: String,
    render_wait: Duration,
    check: ContentCheck,
}

impl BrowserRetriever {
    /// Open a headless session against the configured WebDriver, falling back
    /// to common local endpoints.
    pub async fn connect(config: &ScraperConfig) -> Result<Self, ScrapeError> {
        let capabilities = headless_capabilities(&config.user_agent);
        let client = connect_to_webdriver(&config.webdriver_url, &capabilities).await?;

        Ok(Self {
            client,
            content_selector: config.content_selector.clone(),
            render_wait: config.render_wait(),
            check: ContentCheck::from_config(config),
        })
    }
}

fn headless_capabilities(user_agent: &str) -> Capabilities {
    let mut capabilities = Capabilities::new();
    capabilities.insert(
        "goog:chromeOptions".to_string(),
        json!({
            "args": [
                "--headless=new",
                "--disable-gpu",
                "--no-sandbox",
                format!("--user-agent={}", user_agent),
            ]
        }),
    );
    capabilities.insert(
        "moz:firefoxOptions".to_string(),
        json!({
            "args": ["-headless"],
            "prefs": { "general.useragent.override": user_agent }
        }),
    );
    capabilities
}

async fn open_session(
    webdriver_url: &str,
    capabilities: &Capabilities,
) -> Result<Client, fantoccini::error::NewSessionError> {
    let mut builder = ClientBuilder::native();
    builder.capabilities(capabilities.clone());
    builder.connect(webdriver_url).await
}

/// Connects to the WebDriver instance
async fn connect_to_webdriver(
    webdriver_url: &str,
    capabilities: &Capabilities,
) -> Result<Client, ScrapeError> {
    let mut last_error = match open_session(webdriver_url, capabilities).await {
        Ok(client) => {
            ::log::debug!("Connected to WebDriver at {}", webdriver_url);
            return Ok(client);
        }
        Err(e) => {
            ::log::error!("Failed to connect to WebDriver at {}: {}", webdriver_url, e);
            e.to_string()
        }
    };

    for url in FALLBACK_WEBDRIVER_URLS.iter() {
        if *url == webdriver_url {
            continue;
        }

        ::log::info!("Trying fallback WebDriver URL: {}", url);
        match open_session(url, capabilities).await {
            Ok(client) => {
                ::log::debug!("Connected to fallback WebDriver at {}", url);
                return Ok(client);
            }
            Err(e) => last_error = e.to_string(),
        }
    }

    ::log::error!(
        "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
    );
    Err(ScrapeError::Session(last_error))
}

/// Log a WebDriver command failure and turn it into a page failure
fn navigation_error(
    error: fantoccini::error::CmdError,
    context: &str,
    url: &str,
) -> RetrievalError {
    if error.to_string().contains("Unable to find session") {
        ::log::warn!("Lost session while {} {}", context, url);
    } else {
        ::log::error!("Failed {} {}: {}", context, url, error);
    }
    error.into()
}

#[async_trait]
impl PageRetriever for BrowserRetriever {
    async fn retrieve(&self, url: &str) -> Result<String, RetrievalError> {
        self.client
            .goto(url)
            .await
            .map_err(|e| navigation_error(e, "navigating to", url))?;

        // A missing selector is not fatal: the DOM is read as-is and the
        // content check decides.
        match self
            .client
            .wait()
            .at_most(self.render_wait)
            .for_element(Locator::Css(&self.content_selector))
            .await
        {
            Ok(_) => ::log::debug!("Content selector appeared on {}", url),
            Err(e) => ::log::debug!("Content selector not seen on {}: {}", url, e),
        }

        let html = self
            .client
            .source()
            .await
            .map_err(|e| navigation_error(e, "reading source of", url))?;

        self.check.validate(html)
    }

    async fn close(&self) -> Result<(), RetrievalError> {
        self.client.clone().close().await?;
        ::log::debug!("Closed WebDriver session");
        Ok(())
    }
}
