use thiserror::Error;

mod classify;
mod detect;
mod division;
mod dump;
mod ranges;
mod tree;

pub use classify::{LineClassification, LineClassifier};
pub use detect::detect_toc_pages;
pub use division::{Division, DivisionReport, DivisionSpan, classify_divisions};
pub use dump::{Line, parse_page_dump};
pub use ranges::{ChapterRange, RangeDiagnostic, resolve_chapter_ranges};
pub use tree::{
    ChapterRef, NodeKind, OutlineNode, PageForest, TreeDiagnostic, build_page_forest,
    chapter_display_title, flatten_chapters,
};

/// Heuristic knobs drawn from one document family's typography. The defaults
/// match the Korean standard price list layout; both are overridable from the
/// CLI.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Contents-heading literal, compared with interior whitespace removed.
    pub toc_heading: String,
    /// Minimum run of dot-leader characters between a title and its page.
    pub filler_min_run: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            toc_heading: "목차".to_string(),
            filler_min_run: 3,
        }
    }
}

/// Caller contract violations. Malformed document content never raises these;
/// it surfaces as diagnostic data alongside normal results.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContractError {
    #[error("input lines are not page-ordered: page {found} appears after page {previous}")]
    UnorderedLines { previous: u32, found: u32 },
    #[error("total page count must be greater than zero")]
    MissingTotalPages,
}
