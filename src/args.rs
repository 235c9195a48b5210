use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use stock_prompts::format::random_prefix;
use stock_prompts::{FormatConfig, RetrieverKind, ScrapeRequest};

#[derive(Parser, Debug)]
#[command(name = "stock-prompts")]
#[command(about = "Turns stock-photo search results into formatted prompt lines")]
#[command(version)]
pub struct Args {
    /// Search results URL to scrape
    #[arg(required_unless_present_any = ["request", "preview"])]
    pub url: Option<String>,

    /// First page to fetch
    #[arg(short, long, default_value_t = 1)]
    pub start: i64,

    /// Last page to fetch (inclusive)
    #[arg(short, long, default_value_t = 5)]
    pub end: i64,

    /// JSON request envelope; replaces URL, page range and formatting flags
    #[arg(long, conflicts_with = "url")]
    pub request: Option<PathBuf>,

    /// JSON scraper configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Page retrieval strategy
    #[arg(short, long, value_enum, default_value_t = RetrieverArg::Http)]
    pub retriever: RetrieverArg,

    /// Prefix placed before each prompt, followed by its number
    #[arg(long)]
    pub prefix: Option<String>,

    /// Use a random 7-digit number as the prefix
    #[arg(long, conflicts_with = "prefix")]
    pub random_prefix: bool,

    /// Text appended right after the title
    #[arg(long)]
    pub suffix: Option<String>,

    /// Append today's date as DDMMYYYY
    #[arg(long)]
    pub date: bool,

    /// Extra parameters appended to each prompt
    #[arg(long)]
    pub params: Option<String>,

    /// Aspect ratio appended as `--ar <value>`
    #[arg(long)]
    pub aspect_ratio: Option<String>,

    /// Lower-case every title
    #[arg(long)]
    pub lowercase: bool,

    /// Follow each prompt with an empty line
    #[arg(long)]
    pub empty_line: bool,

    /// Write prompts to `<NAME>_<timestamp>.txt`
    #[arg(short, long, value_name = "NAME")]
    pub output: Option<String>,

    /// Log the first N scraped prompts
    #[arg(long, default_value_t = 0)]
    pub show: usize,

    /// Print a sample prompt for the current formatting and exit without scraping
    #[arg(long)]
    pub preview: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum RetrieverArg {
    Http,
    Browser,
}

impl From<RetrieverArg> for RetrieverKind {
    fn from(arg: RetrieverArg) -> Self {
        match arg {
            RetrieverArg::Http => RetrieverKind::Http,
            RetrieverArg::Browser => RetrieverKind::Browser,
        }
    }
}

impl Args {
    /// Formatting rules from flags; a value flag switches its segment on
    pub fn format_config(&self) -> FormatConfig {
        let prefix = if self.random_prefix {
            Some(random_prefix())
        } else {
            self.prefix.clone()
        };

        FormatConfig {
            include_prefix: prefix.is_some(),
            include_suffix: self.suffix.is_some(),
            include_date: self.date,
            include_params: self.params.is_some(),
            include_aspect_ratio: self.aspect_ratio.is_some(),
            to_lower_case: self.lowercase,
            add_empty_line: self.empty_line,
            prefix: prefix.unwrap_or_default(),
            suffix: self.suffix.clone().unwrap_or_default(),
            aspect_ratio: self.aspect_ratio.clone().unwrap_or_default(),
            additional_params: self.params.clone().unwrap_or_default(),
        }
    }

    /// Request assembled from the positional URL and flags
    pub fn inline_request(&self) -> Option<ScrapeRequest> {
        self.url.as_ref().map(|url| ScrapeRequest {
            url: url.clone(),
            start_page: self.start,
            end_page: self.end,
            config: self.format_config(),
        })
    }
}
