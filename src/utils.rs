use chrono::NaiveDateTime;
use std::time::Duration;

/// Render an elapsed time the way the response envelope reports it, e.g. `3.27s`
pub fn format_processing_time(elapsed: Duration) -> String {
    format!("{:.2}s", elapsed.as_secs_f64())
}

/// Convert a user-supplied name into something safe to use as a filename
pub fn sanitize_filename(name: &str) -> String {
    let mut name = name
        .trim()
        .replace(['/', '\\', ':', '?', '&', '=', '#', '%', '*', '"', '<', '>', '|'], "_");

    // Limit filename length
    if name.chars().count() > 100 {
        name = name.chars().take(100).collect();
    }
    if name.is_empty() {
        "prompts".to_string()
    } else {
        name
    }
}

/// `<name>_<YYYY-MM-DDTHH-MM-SS>.txt`
pub fn output_filename(name: &str, at: NaiveDateTime) -> String {
    format!(
        "{}_{}.txt",
        sanitize_filename(name),
        at.format("%Y-%m-%dT%H-%M-%S")
    )
}
