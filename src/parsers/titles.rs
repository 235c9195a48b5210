use crate::parsers::{Extractor, Strategy};
use scraper::{ElementRef, Html, Selector};

/// Selectors tried by the last strategy, in order
pub const CANDIDATE_SELECTORS: &[&str] = &[
    "[data-title]",
    ".asset-title",
    ".title",
    r#"[data-testid*="title"]"#,
    r#"[data-testid*="name"]"#,
    "h2",
    "h3",
    "h4",
    ".js-asset-title",
    ".asset-name",
];

/// Attribute candidates must be longer than this many characters
const MIN_ATTRIBUTE_LEN: usize = 10;

/// Selector candidates must be strictly between these lengths
const MIN_SELECTOR_LEN: usize = 5;
const MAX_SELECTOR_LEN: usize = 200;

/// Cascade of title heuristics for search-result pages.
///
/// Strategies run in [`Strategy::CASCADE`] order and the first one producing
/// at least one title wins; its results are returned as-is, duplicates
/// included.
#[derive(Debug, Clone)]
pub struct TitleExtractor {
    site_name: String,
}

impl Default for TitleExtractor {
    fn default() -> Self {
        Self::new("adobe")
    }
}

impl TitleExtractor {
    /// `site_name` is matched case-insensitively against attribute candidates
    pub fn new(site_name: &str) -> Self {
        Self {
            site_name: site_name.to_lowercase(),
        }
    }

    /// Run one strategy against a parsed document
    pub fn run_strategy(&self, doc: &Html, strategy: Strategy) -> Vec<String> {
        match strategy {
            Strategy::MetaName => meta_names(doc),
            Strategy::ImageAlt => self.attribute_values(doc, "img[alt]", "alt"),
            Strategy::TitleAttribute => self.attribute_values(doc, "[title]", "title"),
            Strategy::AriaLabel => self.attribute_values(doc, "[aria-label]", "aria-label"),
            Strategy::CandidateSelectors => candidate_selector_values(doc),
        }
    }

    fn attribute_values(&self, doc: &Html, css: &str, attr: &str) -> Vec<String> {
        let selector = selector(css);
        doc.select(&selector)
            .filter_map(|e| e.value().attr(attr))
            .map(str::trim)
            .filter(|value| self.is_descriptive(value))
            .map(str::to_string)
            .collect()
    }

    /// Long enough to be a description and not site branding
    fn is_descriptive(&self, value: &str) -> bool {
        value.chars().count() > MIN_ATTRIBUTE_LEN
            && (self.site_name.is_empty() || !value.to_lowercase().contains(&self.site_name))
    }
}

impl Extractor for TitleExtractor {
    fn extract(&self, html: &str) -> Vec<String> {
        let doc = Html::parse_document(html);

        for strategy in Strategy::CASCADE {
            let titles = self.run_strategy(&doc, strategy);
            ::log::debug!(
                "Strategy {} produced {} titles",
                strategy.name(),
                titles.len()
            );
            if !titles.is_empty() {
                return titles;
            }
        }

        Vec::new()
    }
}

fn meta_names(doc: &Html) -> Vec<String> {
    let selector = selector(r#"meta[itemprop="name"]"#);
    doc.select(&selector)
        .filter_map(|e| e.value().attr("content"))
        .map(str::trim)
        .filter(|content| !content.is_empty())
        .map(str::to_string)
        .collect()
}

fn candidate_selector_values(doc: &Html) -> Vec<String> {
    let mut titles = Vec::new();

    for css in CANDIDATE_SELECTORS {
        let selector = selector(css);
        for element in doc.select(&selector) {
            let title = element_title(&element);
            let len = title.chars().count();
            if len > MIN_SELECTOR_LEN && len < MAX_SELECTOR_LEN {
                titles.push(title);
            }
        }
    }

    titles
}

/// Non-empty `data-title` if present, otherwise the element's trimmed text
fn element_title(element: &ElementRef) -> String {
    element
        .value()
        .attr("data-title")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| element.text().collect::<String>().trim().to_string())
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}
