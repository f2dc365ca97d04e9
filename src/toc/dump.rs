use anyhow::{Context, Result};
use regex::Regex;

/// One extracted line of the page-segmented dump. Owned by the extractor
/// boundary; the pipeline only ever borrows it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub page: u32,
    pub line_number: u32,
    pub text: String,
}

/// Parses the extractor's dump format: `=== N페이지 ===` page separators
/// followed by `N줄: text` lines. Preview and metadata lines carry no line
/// prefix and are skipped.
pub fn parse_page_dump(content: &str) -> Result<Vec<Line>> {
    let page_marker =
        Regex::new(r"^=== (\d+)페이지 ===$").context("failed to compile page marker regex")?;
    let line_prefix =
        Regex::new(r"^(\d+)줄: ?(.*)$").context("failed to compile line prefix regex")?;

    let mut lines = Vec::new();
    let mut current_page: Option<u32> = None;

    for raw in content.lines() {
        let trimmed = raw.trim();

        if let Some(captures) = page_marker.captures(trimmed) {
            current_page = captures.get(1).and_then(|m| m.as_str().parse::<u32>().ok());
            continue;
        }

        let Some(page) = current_page else {
            continue;
        };

        if let Some(captures) = line_prefix.captures(trimmed) {
            let line_number = captures
                .get(1)
                .and_then(|m| m.as_str().parse::<u32>().ok())
                .unwrap_or(0);
            let text = captures.get(2).map(|m| m.as_str()).unwrap_or("").to_string();

            lines.push(Line {
                page,
                line_number,
                text,
            });
        }
    }

    Ok(lines)
}
