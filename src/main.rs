use chrono::Local;
use clap::Parser;
use serde::Serialize;
use std::process::ExitCode;
use stock_prompts::format::preview_line;
use stock_prompts::utils::output_filename;
use stock_prompts::{
    ErrorBody, FormatConfig, PageProgress, RetrieverKind, Scrape, ScrapeError, ScrapeRequest,
    ScrapeResponse,
};

mod args;
use args::Args;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    if args.preview {
        return match preview_format(&args) {
            Ok(format) => {
                println!("{}", preview_line(&format, Local::now().date_naive()));
                ExitCode::SUCCESS
            }
            Err(e) => fail(e),
        };
    }

    let scrape = match build_scrape(&args) {
        Ok(scrape) => scrape,
        Err(e) => return fail(e),
    };

    let request = match load_request(&args) {
        Ok(request) => request,
        Err(e) => return fail(e),
    };

    ::log::info!("Starting scrape of {}", request.url);

    if scrape_uses_browser(&args) {
        eprintln!("Note: browser retrieval requires a WebDriver server (e.g., ChromeDriver).");
        eprintln!(
            "Set WEBDRIVER_URL environment variable if not using the default http://localhost:4444"
        );
    }

    let progress = |p: &PageProgress| {
        ::log::info!(
            "[{:>3}%] {}/{} {}",
            p.percentage,
            p.current_page,
            p.total_pages,
            p.message
        );
    };

    let response = match scrape.respond(request, &progress).await {
        Ok(response) => response,
        Err(e) => {
            ::log::error!("Rejected request: {}", e);
            print_json(&ErrorBody::from(&e));
            return ExitCode::from(2);
        }
    };

    print_json(&response);
    if !response.success {
        return ExitCode::FAILURE;
    }

    let prompts = response.prompts.unwrap_or_default();
    for line in prompts.iter().filter(|l| !l.is_empty()).take(args.show) {
        ::log::info!("Preview: {}", line);
    }

    if let Some(name) = &args.output {
        let filename = output_filename(name, Local::now().naive_local());
        if let Err(e) = std::fs::write(&filename, prompts.join("\n")) {
            ::log::error!("Failed to write {}: {}", filename, e);
            return ExitCode::FAILURE;
        }
        ::log::info!("Wrote {} lines to {}", prompts.len(), filename);
    }

    ExitCode::SUCCESS
}

fn scrape_uses_browser(args: &Args) -> bool {
    RetrieverKind::from(args.retriever) == RetrieverKind::Browser
}

fn build_scrape(args: &Args) -> Result<Scrape, ScrapeError> {
    let scrape = Scrape::new(args.retriever.into());
    match &args.config {
        Some(path) => scrape.with_config_file(path),
        None => Ok(scrape),
    }
}

fn load_request(args: &Args) -> Result<ScrapeRequest, ScrapeError> {
    if let Some(path) = &args.request {
        let body = std::fs::read_to_string(path)?;
        return Ok(serde_json::from_str(&body)?);
    }
    args.inline_request()
        .ok_or_else(|| ScrapeError::Config("a URL or --request file is required".to_string()))
}

/// Formatting rules for a dry run: the request file's, else the flags'
fn preview_format(args: &Args) -> Result<FormatConfig, ScrapeError> {
    match &args.request {
        Some(_) => Ok(load_request(args)?.config),
        None => Ok(args.format_config()),
    }
}

/// Whole-run failure before scraping started: zeroed envelope, exit 1
fn fail(error: ScrapeError) -> ExitCode {
    ::log::error!("Scraping error: {}", error);
    print_json(&ScrapeResponse::failure(error));
    ExitCode::FAILURE
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => ::log::error!("Failed to serialize response: {}", e),
    }
}
