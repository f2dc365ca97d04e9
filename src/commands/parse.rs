use std::fs;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::cli::ParseArgs;
use crate::model::{TocMetadata, TocNode, TocStatistics, TocTreeDocument, count_toc_nodes, toc_tree_from_forest};
use crate::toc::{
    LineClassifier, ParserConfig, TreeDiagnostic, build_page_forest, detect_toc_pages,
    parse_page_dump,
};
use crate::util::{now_utc_string, sha256_file, write_json_pretty, write_text};

pub fn run(args: ParseArgs) -> Result<()> {
    let content = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let source_sha256 = sha256_file(&args.input)?;
    let source_name = args.source_name.clone().unwrap_or_else(|| {
        args.input
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| args.input.display().to_string())
    });

    let config = ParserConfig {
        toc_heading: args.toc_heading.clone(),
        filler_min_run: args.filler_min_run,
    };
    let classifier = LineClassifier::with_config(&config)?;

    let lines = parse_page_dump(&content)?;
    info!(line_count = lines.len(), source = %source_name, "parsed page dump");

    let toc_pages = detect_toc_pages(&lines, &config);
    if toc_pages.is_empty() {
        warn!("no TOC pages detected; writing an empty tree");
    } else {
        info!(toc_page_count = toc_pages.len(), "detected TOC pages");
    }

    let (forest, diagnostics) = build_page_forest(&toc_pages, &lines, &classifier)?;
    for diagnostic in &diagnostics {
        let TreeDiagnostic::DuplicateSibling {
            page,
            number,
            title,
        } = diagnostic;
        warn!(
            page = page,
            number = %number,
            title = %title,
            "duplicate sibling number in outline"
        );
    }

    let toc_tree = toc_tree_from_forest(&forest);
    let total_nodes = count_toc_nodes(&toc_tree);
    let document = TocTreeDocument {
        metadata: TocMetadata {
            source_name,
            generated_at: now_utc_string(),
            total_pages: toc_tree.len(),
            source_sha256: Some(source_sha256),
        },
        toc_tree,
        statistics: TocStatistics { total_nodes },
    };

    write_json_pretty(&args.output, &document)?;
    info!(path = %args.output.display(), total_nodes, "wrote toc tree");

    if let Some(markdown_path) = &args.markdown {
        let markdown = render_markdown_outline(&document);
        write_text(markdown_path, &markdown)?;
        info!(path = %markdown_path.display(), "wrote markdown outline");
    }

    Ok(())
}

fn render_markdown_outline(document: &TocTreeDocument) -> String {
    let mut out = String::new();
    out.push_str("# 목차\n\n");

    for (page, nodes) in &document.toc_tree {
        out.push_str(&format!("## {page}페이지\n\n"));
        for node in nodes {
            render_node(node, &mut out);
        }
        out.push('\n');
    }

    out.push_str(&format!(
        "총 노드 수: {}\n",
        document.statistics.total_nodes
    ));
    out
}

fn render_node(node: &TocNode, out: &mut String) {
    let indent = "  ".repeat(node.level as usize);
    match &node.number {
        Some(number) => out.push_str(&format!(
            "{indent}- **{} {}** (p.{})\n",
            number, node.title, node.page
        )),
        None => out.push_str(&format!("{indent}- **{}** (p.{})\n", node.title, node.page)),
    }

    for child in &node.children {
        render_node(child, out);
    }
}
