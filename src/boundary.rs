//! Inbound validation and outbound envelopes.

use crate::config::ScraperConfig;
use crate::error::ValidationError;
use crate::format::FormatConfig;
use crate::results::ScrapeStats;
use crate::utils::format_processing_time;
use serde::{Deserialize, Serialize};
use url::Url;

/// Request envelope as sent by a client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeRequest {
    pub url: String,
    pub start_page: i64,
    pub end_page: i64,
    #[serde(default)]
    pub config: FormatConfig,
}

/// A request that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeJob {
    pub base_url: String,
    pub start_page: u32,
    pub end_page: u32,
    pub format: FormatConfig,
}

impl ScrapeJob {
    pub fn page_count(&self) -> u32 {
        self.end_page - self.start_page + 1
    }
}

impl ScrapeRequest {
    /// Check domain and page range before any page is requested
    pub fn validate(self, config: &ScraperConfig) -> Result<ScrapeJob, ValidationError> {
        if !references_domain(&self.url, &config.origin_domain) {
            return Err(ValidationError::InvalidDomain {
                site: config.site_label.clone(),
            });
        }

        if self.start_page < 1 || self.end_page < 1 || self.start_page > self.end_page {
            return Err(ValidationError::InvalidRange);
        }

        if self.end_page - self.start_page > i64::from(config.max_page_span) {
            return Err(ValidationError::RangeTooLarge {
                max: config.max_page_span,
            });
        }

        let start_page = u32::try_from(self.start_page).map_err(|_| ValidationError::InvalidRange)?;
        let end_page = u32::try_from(self.end_page).map_err(|_| ValidationError::InvalidRange)?;

        Ok(ScrapeJob {
            base_url: self.url,
            start_page,
            end_page,
            format: self.config,
        })
    }
}

/// True when `url` parses and its host is `domain` or a subdomain of it
fn references_domain(url: &str, domain: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else {
        return false;
    };
    let Some(host) = parsed.host_str() else {
        return false;
    };
    let host = host.to_ascii_lowercase();
    let domain = domain.to_ascii_lowercase();
    host == domain || host.ends_with(&format!(".{}", domain))
}

/// `stats` object of the response envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsBody {
    pub total_pages: u32,
    pub successful_pages: u32,
    pub failed_pages: u32,
    pub total_prompts: usize,
    pub processing_time: String,
}

impl From<&ScrapeStats> for StatsBody {
    fn from(stats: &ScrapeStats) -> Self {
        Self {
            total_pages: stats.total_pages,
            successful_pages: stats.successful_pages,
            failed_pages: stats.failed_pages,
            total_prompts: stats.total_prompts,
            processing_time: format_processing_time(stats.elapsed),
        }
    }
}

/// Response envelope for a run that was accepted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompts: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub stats: StatsBody,
}

impl ScrapeResponse {
    pub fn success(prompts: Vec<String>, stats: &ScrapeStats) -> Self {
        Self {
            success: true,
            prompts: Some(prompts),
            error: None,
            stats: stats.into(),
        }
    }

    /// Whole-run failure: no prompts, every counter zero
    pub fn failure(error: impl std::fmt::Display) -> Self {
        Self {
            success: false,
            prompts: None,
            error: Some(error.to_string()),
            stats: (&ScrapeStats::default()).into(),
        }
    }
}

/// Body returned for a rejected request; carries no stats
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl From<&ValidationError> for ErrorBody {
    fn from(err: &ValidationError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}
