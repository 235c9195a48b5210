use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Title used to preview formatting rules without scraping
pub const SAMPLE_TITLE: &str = "A cheerful real estate agent exhibits a spacious, empty office with large windows. The setting radiates opportunity and potential, ideal for businesses ready to move forward.";

/// Decoration rules applied to every title
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormatConfig {
    pub include_prefix: bool,
    pub include_suffix: bool,
    pub include_date: bool,
    pub include_params: bool,
    pub include_aspect_ratio: bool,
    pub to_lower_case: bool,
    pub add_empty_line: bool,
    pub prefix: String,
    pub suffix: String,
    pub aspect_ratio: String,
    pub additional_params: String,
}

/// Output of [`format_prompts`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormattedPrompts {
    /// Prompt lines, each optionally followed by an empty separator line
    pub lines: Vec<String>,
    /// Number of prompt lines, separators excluded
    pub prompt_count: usize,
}

/// Drop repeated titles, keeping the first occurrence of each
pub fn dedup_titles(titles: &[String]) -> Vec<&str> {
    let mut seen = HashSet::with_capacity(titles.len());
    titles
        .iter()
        .map(String::as_str)
        .filter(|title| seen.insert(*title))
        .collect()
}

/// `DDMMYYYY`, no separators
pub fn date_stamp(date: NaiveDate) -> String {
    date.format("%d%m%Y").to_string()
}

/// Turn raw titles into prompt lines.
///
/// `date` is the batch completion date; every line gets the same stamp.
/// Numbering follows the position in the deduplicated list, starting at 1.
pub fn format_prompts(
    titles: &[String],
    config: &FormatConfig,
    date: NaiveDate,
) -> FormattedPrompts {
    let stamp = date_stamp(date);
    let mut formatted = FormattedPrompts::default();

    for (index, title) in dedup_titles(titles).into_iter().enumerate() {
        if title.is_empty() {
            continue;
        }

        formatted.lines.push(format_line(title, index + 1, config, &stamp));
        formatted.prompt_count += 1;

        if config.add_empty_line {
            formatted.lines.push(String::new());
        }
    }

    formatted
}

/// Random 7-digit prefix, zero-padded
pub fn random_prefix() -> String {
    format!("{:07}", rand::rng().random_range(0..10_000_000u32))
}

/// What the first prompt of a run would look like under `config`
pub fn preview_line(config: &FormatConfig, date: NaiveDate) -> String {
    format_line(SAMPLE_TITLE, 1, config, &date_stamp(date))
}

fn format_line(title: &str, position: usize, config: &FormatConfig, stamp: &str) -> String {
    let mut line = String::new();

    if config.include_prefix {
        line.push_str(&format!("{} {:02} ", config.prefix, position));
    }

    if config.to_lower_case {
        line.push_str(&title.to_lowercase());
    } else {
        line.push_str(title);
    }

    if config.include_date {
        line.push(' ');
        line.push_str(stamp);
    }

    if config.include_suffix {
        line.push_str(&config.suffix);
    }

    if config.include_params {
        line.push(' ');
        line.push_str(&config.additional_params);
    }

    if config.include_aspect_ratio {
        line.push_str(" --ar ");
        line.push_str(&config.aspect_ratio);
    }

    line
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 7).unwrap()
    }

    #[test]
    fn test_dedup_preserves_first_occurrence_order() {
        let input = titles(&["A", "B", "A", "C"]);
        assert_eq!(dedup_titles(&input), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_prefix_is_zero_padded() {
        let config = FormatConfig {
            include_prefix: true,
            prefix: "000001".into(),
            ..FormatConfig::default()
        };
        let out = format_prompts(&titles(&["Sunset"]), &config, date());
        assert_eq!(out.lines, vec!["000001 01 Sunset"]);
    }

    #[test]
    fn test_numbering_past_two_digits() {
        let config = FormatConfig {
            include_prefix: true,
            prefix: "p".into(),
            ..FormatConfig::default()
        };
        let input: Vec<String> = (0..100).map(|i| format!("title {}", i)).collect();
        let out = format_prompts(&input, &config, date());
        assert_eq!(out.lines[8], "p 09 title 8");
        assert_eq!(out.lines[99], "p 100 title 99");
    }

    #[test]
    fn test_lower_case_toggle() {
        let input = titles(&["Sunset View"]);
        let lower = FormatConfig {
            to_lower_case: true,
            ..FormatConfig::default()
        };
        assert_eq!(format_prompts(&input, &lower, date()).lines, vec!["sunset view"]);
        assert_eq!(
            format_prompts(&input, &FormatConfig::default(), date()).lines,
            vec!["Sunset View"]
        );
    }

    #[test]
    fn test_all_segments_in_order() {
        let config = FormatConfig {
            include_prefix: true,
            include_suffix: true,
            include_date: true,
            include_params: true,
            include_aspect_ratio: true,
            prefix: "1234567".into(),
            suffix: "dumnaf".into(),
            aspect_ratio: "16:9".into(),
            additional_params: "--no dust --p 5y3izqx".into(),
            ..FormatConfig::default()
        };
        let out = format_prompts(&titles(&["Cat"]), &config, date());
        assert_eq!(
            out.lines,
            vec!["1234567 01 Cat 07032024dumnaf --no dust --p 5y3izqx --ar 16:9"]
        );
    }

    #[test]
    fn test_empty_lines_follow_each_prompt() {
        let input = titles(&["Cat", "Dog", "Cat"]);
        let spaced = FormatConfig {
            add_empty_line: true,
            ..FormatConfig::default()
        };
        let out = format_prompts(&input, &spaced, date());
        assert_eq!(out.lines, vec!["Cat", "", "Dog", ""]);
        assert_eq!(out.prompt_count, 2);

        let plain = format_prompts(&input, &FormatConfig::default(), date());
        assert_eq!(plain.prompt_count, out.prompt_count);
    }

    #[test]
    fn test_empty_title_is_skipped_without_separator() {
        let input = titles(&["", "Cat"]);
        let config = FormatConfig {
            add_empty_line: true,
            ..FormatConfig::default()
        };
        let out = format_prompts(&input, &config, date());
        assert_eq!(out.lines, vec!["Cat", ""]);
        assert_eq!(out.prompt_count, 1);
    }

    #[test]
    fn test_random_prefix_is_seven_digits() {
        for _ in 0..50 {
            let prefix = random_prefix();
            assert_eq!(prefix.len(), 7);
            assert!(prefix.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_preview_line_matches_first_prompt() {
        let config = FormatConfig {
            include_prefix: true,
            include_date: true,
            include_suffix: true,
            include_aspect_ratio: true,
            to_lower_case: true,
            prefix: "0042137".into(),
            suffix: "dumnaf".into(),
            aspect_ratio: "16:9".into(),
            ..FormatConfig::default()
        };
        let preview = preview_line(&config, date());
        assert!(preview.starts_with("0042137 01 a cheerful real estate agent"));
        assert!(preview.ends_with("move forward. 07032024dumnaf --ar 16:9"));

        let scraped = format_prompts(&titles(&[SAMPLE_TITLE]), &config, date());
        assert_eq!(scraped.lines, vec![preview]);
    }

    #[test]
    fn test_preview_ignores_empty_line_flag() {
        let config = FormatConfig {
            add_empty_line: true,
            ..FormatConfig::default()
        };
        assert_eq!(preview_line(&config, date()), SAMPLE_TITLE);
    }

    #[test]
    fn test_date_stamp() {
        assert_eq!(date_stamp(date()), "07032024");
    }

    #[test]
    fn test_config_deserializes_from_camel_case() {
        let config: FormatConfig = serde_json::from_str(
            r#"{"includePrefix": true, "toLowerCase": true, "prefix": "abc", "aspectRatio": "1:1"}"#,
        )
        .unwrap();
        assert!(config.include_prefix);
        assert!(config.to_lower_case);
        assert!(!config.add_empty_line);
        assert_eq!(config.prefix, "abc");
        assert_eq!(config.aspect_ratio, "1:1");
    }
}
