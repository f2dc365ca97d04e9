use anyhow::{Context, Result};
use regex::Regex;

use super::ParserConfig;

/// Classification of a single TOC line, with the fields the tree builder
/// needs extracted up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClassification {
    /// A `제N장` marker line. `page` and `title` come from the lookahead line
    /// when it matched; a failed lookahead leaves the title empty and the
    /// page unset, and the builder falls back to the marker's source page.
    Chapter {
        number: String,
        title: String,
        page: Option<u32>,
        consumed_next: bool,
    },
    /// A dash-numbered entry (`1-1`, `1-1-1`, ...) with an optional title.
    Item {
        number: String,
        title: String,
        page: u32,
    },
    /// A titled entry with no leading numeral (appendix/reference style).
    Other { title: String, page: u32 },
}

/// Ordered rule set over one line plus an optional lookahead. Rules are
/// checked in precedence order and the first match wins; a line matching
/// nothing is noise and classifies as `None`.
#[derive(Debug)]
pub struct LineClassifier {
    chapter_marker: Regex,
    titled_entry: Regex,
    item_entry: Regex,
}

impl LineClassifier {
    pub fn new() -> Result<Self> {
        Self::with_config(&ParserConfig::default())
    }

    pub fn with_config(config: &ParserConfig) -> Result<Self> {
        let run = config.filler_min_run.max(1);

        Ok(Self {
            chapter_marker: Regex::new(r"^제(\d+)장$")
                .context("failed to compile chapter marker regex")?,
            titled_entry: Regex::new(&format!(
                r"^([가-힣A-Za-z0-9\-\(\)\s]+?)[·. ]{{{run},}}(\d+)$"
            ))
            .context("failed to compile titled entry regex")?,
            item_entry: Regex::new(&format!(
                r"^(\d+(?:-\d+)+)\s*([가-힣A-Za-z0-9\-\(\)\s]*?)\s*[·. ]{{{run},}}(\d+)$"
            ))
            .context("failed to compile item entry regex")?,
        })
    }

    pub fn classify(&self, text: &str, next_text: Option<&str>) -> Option<LineClassification> {
        let line = text.trim();

        if let Some(captures) = self.chapter_marker.captures(line) {
            let number = captures.get(1)?.as_str().to_string();

            // The title line is only meaningful directly after a marker; a
            // missing or malformed lookahead degrades to an empty title.
            if let Some(next) = next_text {
                if let Some((title, page)) = self.match_titled_entry(next) {
                    return Some(LineClassification::Chapter {
                        number,
                        title,
                        page: Some(page),
                        consumed_next: true,
                    });
                }
            }

            return Some(LineClassification::Chapter {
                number,
                title: String::new(),
                page: None,
                consumed_next: false,
            });
        }

        if let Some(captures) = self.item_entry.captures(line) {
            let number = captures.get(1)?.as_str().to_string();
            let title = captures
                .get(2)
                .map(|m| m.as_str().trim())
                .unwrap_or("")
                .to_string();
            let page = captures.get(3)?.as_str().parse::<u32>().ok()?;

            return Some(LineClassification::Item {
                number,
                title,
                page,
            });
        }

        if let Some((title, page)) = self.match_titled_entry(line) {
            return Some(LineClassification::Other { title, page });
        }

        None
    }

    fn match_titled_entry(&self, text: &str) -> Option<(String, u32)> {
        let captures = self.titled_entry.captures(text.trim())?;
        let title = captures.get(1)?.as_str().trim().to_string();
        let page = captures.get(2)?.as_str().parse::<u32>().ok()?;

        Some((title, page))
    }
}
