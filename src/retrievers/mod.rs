//! Page retrieval: one trait, two interchangeable strategies.

pub mod browser;
#[cfg(test)]
pub(crate) mod fake;
pub mod http;

pub use browser::BrowserRetriever;
pub use http::HttpRetriever;

use crate::config::ScraperConfig;
use crate::error::RetrievalError;
use async_trait::async_trait;
use url::Url;

/// Produces the HTML of one search-results page.
#[async_trait]
pub trait PageRetriever: Send + Sync {
    /// Fetch `url`, failing on bad status, short bodies and soft-error pages
    async fn retrieve(&self, url: &str) -> Result<String, RetrievalError>;

    /// Release whatever the retriever holds open. Called once after the last page.
    async fn close(&self) -> Result<(), RetrievalError> {
        Ok(())
    }
}

/// Soft-failure rules applied to a body that arrived with a success status
#[derive(Debug, Clone)]
pub struct ContentCheck {
    pub min_length: usize,
    pub not_found_markers: Vec<String>,
}

impl ContentCheck {
    pub fn from_config(config: &ScraperConfig) -> Self {
        Self {
            min_length: config.min_content_length,
            not_found_markers: config.not_found_markers.clone(),
        }
    }

    /// Pass the body through if it looks like a real results page
    pub fn validate(&self, body: String) -> Result<String, RetrievalError> {
        if let Some(marker) = self
            .not_found_markers
            .iter()
            .find(|m| !m.is_empty() && body.contains(m.as_str()))
        {
            return Err(RetrievalError::NotFoundMarker(marker.clone()));
        }
        if body.len() < self.min_length {
            return Err(RetrievalError::ContentTooShort {
                len: body.len(),
                min: self.min_length,
            });
        }
        Ok(body)
    }
}

/// Build the URL of one page by setting `param` on the base URL's query.
///
/// Any existing occurrence of `param` is replaced; other pairs keep their order.
pub fn page_url(base: &str, param: &str, page: u32) -> Result<String, RetrievalError> {
    let mut url = Url::parse(base)
        .map_err(|e| RetrievalError::Transport(format!("invalid URL {}: {}", base, e)))?;

    let has_param = url.query_pairs().any(|(k, _)| k == param);
    if has_param {
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(k, _)| k != param)
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        url.query_pairs_mut().clear().extend_pairs(kept);
    }
    url.query_pairs_mut()
        .append_pair(param, &page.to_string());

    Ok(url.to_string())
}
