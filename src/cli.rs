use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "tocsplit",
    version,
    about = "Table-of-contents tree extraction and chapter split planning"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a page-segmented text dump into a hierarchical TOC tree.
    Parse(ParseArgs),
    /// Compute division spans and per-chapter page ranges from a TOC tree.
    Plan(PlanArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ParseArgs {
    /// Line-numbered, page-segmented text dump produced by the extractor.
    #[arg(long)]
    pub input: PathBuf,

    #[arg(long, default_value = "output/toc_tree.json")]
    pub output: PathBuf,

    /// Optional markdown rendering of the outline.
    #[arg(long)]
    pub markdown: Option<PathBuf>,

    /// Name recorded in the output metadata; defaults to the input filename.
    #[arg(long)]
    pub source_name: Option<String>,

    /// Contents-heading literal, matched ignoring interior whitespace.
    #[arg(long, default_value = "목차")]
    pub toc_heading: String,

    /// Minimum dot-leader run separating a title from its page number.
    #[arg(long, default_value_t = 3)]
    pub filler_min_run: usize,
}

#[derive(Args, Debug, Clone)]
pub struct PlanArgs {
    /// TOC tree JSON produced by the parse command.
    #[arg(long)]
    pub toc: PathBuf,

    /// Total page count of the paginated source the splitter will cut.
    #[arg(long)]
    pub total_pages: u32,

    #[arg(long, default_value = "output/split_plan.json")]
    pub output: PathBuf,
}
