use std::collections::BTreeSet;

use super::ParserConfig;
use super::dump::Line;

/// Scans the dump for pages that carry printed table-of-contents text.
///
/// A page qualifies when a contents-heading line sits directly next to a line
/// holding a bare integer: heading-then-number yields that number, and
/// number-then-heading yields the preceding number. The returned set holds the
/// sorted unique printed TOC page numbers; an empty set is a valid result for
/// documents without a recognizable contents section.
pub fn detect_toc_pages(lines: &[Line], config: &ParserConfig) -> BTreeSet<u32> {
    let heading = strip_whitespace(&config.toc_heading);
    let mut toc_pages = BTreeSet::new();

    for pair in lines.windows(2) {
        let (first, second) = (&pair[0], &pair[1]);
        if first.page != second.page || second.line_number != first.line_number + 1 {
            continue;
        }

        if is_heading(&first.text, &heading) {
            if let Some(page) = bare_page_number(&second.text) {
                toc_pages.insert(page);
            }
        } else if is_heading(&second.text, &heading) {
            if let Some(page) = bare_page_number(&first.text) {
                toc_pages.insert(page);
            }
        }
    }

    toc_pages
}

fn is_heading(text: &str, normalized_heading: &str) -> bool {
    !normalized_heading.is_empty() && strip_whitespace(text) == normalized_heading
}

fn bare_page_number(text: &str) -> Option<u32> {
    let trimmed = text.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|ch| ch.is_ascii_digit()) {
        return None;
    }

    trimmed.parse::<u32>().ok()
}

fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|ch| !ch.is_whitespace()).collect()
}
