use std::fmt;

use super::ContractError;
use super::tree::ChapterRef;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterRange {
    pub chapter: ChapterRef,
    pub start_page: u32,
    pub end_page: u32,
}

/// Per-chapter validation outcomes. Rejections carry enough context to trace
/// the chapter without consulting the input again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeDiagnostic {
    /// Start page beyond the document; the chapter produced no range.
    StartBeyondTotal {
        title: String,
        start_page: u32,
        total_pages: u32,
    },
    /// End page beyond the document; clamped, range still produced.
    EndClamped {
        title: String,
        requested_end: u32,
        total_pages: u32,
    },
    /// The next chapter starts at or before this one; the chapter produced no
    /// range.
    OutOfOrder {
        title: String,
        start_page: u32,
        next_title: String,
        next_start_page: u32,
    },
}

impl RangeDiagnostic {
    pub fn kind(&self) -> &'static str {
        match self {
            RangeDiagnostic::StartBeyondTotal { .. } => "start_beyond_total",
            RangeDiagnostic::EndClamped { .. } => "end_clamped",
            RangeDiagnostic::OutOfOrder { .. } => "out_of_order",
        }
    }

    pub fn is_rejection(&self) -> bool {
        !matches!(self, RangeDiagnostic::EndClamped { .. })
    }
}

impl fmt::Display for RangeDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeDiagnostic::StartBeyondTotal {
                title,
                start_page,
                total_pages,
            } => write!(
                f,
                "{title}: start page {start_page} exceeds total pages {total_pages}"
            ),
            RangeDiagnostic::EndClamped {
                title,
                requested_end,
                total_pages,
            } => write!(
                f,
                "{title}: end page {requested_end} clamped to total pages {total_pages}"
            ),
            RangeDiagnostic::OutOfOrder {
                title,
                start_page,
                next_title,
                next_start_page,
            } => write!(
                f,
                "{title} (page {start_page}) overlaps {next_title} (page {next_start_page})"
            ),
        }
    }
}

/// Derives a contiguous `[start, end]` page range for each chapter: a chapter
/// runs up to the page before the next chapter starts, and the last chapter
/// runs to the end of the document.
///
/// Validation is applied per chapter; a rejected chapter never blocks the
/// rest. Rejections and clamps are returned as diagnostics alongside the
/// successfully resolved ranges.
pub fn resolve_chapter_ranges(
    chapters: &[ChapterRef],
    total_pages: u32,
) -> Result<(Vec<ChapterRange>, Vec<RangeDiagnostic>), ContractError> {
    if total_pages == 0 {
        return Err(ContractError::MissingTotalPages);
    }

    let mut ranges = Vec::new();
    let mut diagnostics = Vec::new();

    for (index, chapter) in chapters.iter().enumerate() {
        let start_page = chapter.target_page;
        let next = chapters.get(index + 1);
        let mut end_page = match next {
            Some(next_chapter) => next_chapter.target_page.saturating_sub(1),
            None => total_pages,
        };

        if start_page > total_pages {
            diagnostics.push(RangeDiagnostic::StartBeyondTotal {
                title: chapter.display_title(),
                start_page,
                total_pages,
            });
            continue;
        }

        if end_page > total_pages {
            diagnostics.push(RangeDiagnostic::EndClamped {
                title: chapter.display_title(),
                requested_end: end_page,
                total_pages,
            });
            end_page = total_pages;
        }

        // Only reachable with a following chapter whose page is not strictly
        // increasing; the last chapter always ends at or after its start.
        if let Some(next_chapter) = next
            && start_page > end_page
        {
            diagnostics.push(RangeDiagnostic::OutOfOrder {
                title: chapter.display_title(),
                start_page,
                next_title: next_chapter.display_title(),
                next_start_page: next_chapter.target_page,
            });
            continue;
        }

        ranges.push(ChapterRange {
            chapter: chapter.clone(),
            start_page,
            end_page,
        });
    }

    Ok((ranges, diagnostics))
}
