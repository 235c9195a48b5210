pub mod titles;


use regex::Regex;
use std::sync::LazyLock;

pub use titles::TitleExtractor;

static DOCUMENT_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").expect("static regex"));

/// Anything that mines candidate titles out of one HTML document
pub trait Extractor: Send + Sync {
    /// Returns titles in document order; an empty vec means nothing matched
    fn extract(&self, html: &str) -> Vec<String>;
}

/// Enum to represent the extraction strategies, in cascade order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// `content` of `<meta itemprop="name">`
    MetaName,
    /// `alt` of `<img>`
    ImageAlt,
    /// Any `title` attribute
    TitleAttribute,
    /// Any `aria-label` attribute
    AriaLabel,
    /// Generic title-ish selectors, `data-title` preferred over text
    CandidateSelectors,
}

impl Strategy {
    /// Most precise first. Later strategies only run when every earlier one found nothing.
    pub const CASCADE: [Strategy; 5] = [
        Strategy::MetaName,
        Strategy::ImageAlt,
        Strategy::TitleAttribute,
        Strategy::AriaLabel,
        Strategy::CandidateSelectors,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::MetaName => "meta[itemprop=name]",
            Strategy::ImageAlt => "img[alt]",
            Strategy::TitleAttribute => "[title]",
            Strategy::AriaLabel => "[aria-label]",
            Strategy::CandidateSelectors => "candidate selectors",
        }
    }
}

/// Text of the document's `<title>`, used for diagnostics only
pub fn document_title(html: &str) -> Option<String> {
    DOCUMENT_TITLE
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|t| !t.is_empty())
}
