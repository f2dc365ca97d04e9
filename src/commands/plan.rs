use std::fs;

use anyhow::{Context, Result};
use regex::Regex;
use tracing::{info, warn};

use crate::cli::PlanArgs;
use crate::model::{
    DivisionPlan, PlanChapter, PlanChapterRef, PlanDiagnostic, PlanMetadata, PlanStatistics,
    SplitPlanDocument, TocTreeDocument,
};
use crate::toc::{ChapterRef, Division, classify_divisions, resolve_chapter_ranges};
use crate::util::{now_utc_string, write_json_pretty};

pub fn run(args: PlanArgs) -> Result<()> {
    let raw = fs::read(&args.toc)
        .with_context(|| format!("failed to read {}", args.toc.display()))?;
    let document: TocTreeDocument = serde_json::from_slice(&raw)
        .with_context(|| format!("failed to parse {}", args.toc.display()))?;

    let chapters = collect_chapters(&document)?;
    info!(
        chapter_count = chapters.len(),
        total_pages = args.total_pages,
        "collected chapters from toc tree"
    );

    let report = classify_divisions(&chapters, args.total_pages);
    let (ranges, diagnostics) = resolve_chapter_ranges(&chapters, args.total_pages)?;

    for diagnostic in &diagnostics {
        warn!(kind = diagnostic.kind(), "{diagnostic}");
    }
    for chapter in &report.unclassified {
        warn!(
            title = %chapter.display_title(),
            page = chapter.target_page,
            "chapter title not in division table"
        );
    }

    // Ranges come back in chapter order with rejected entries missing, so a
    // single forward pass re-aligns them to the chapter list.
    let mut range_lookup = Vec::with_capacity(chapters.len());
    let mut pending = ranges.iter().peekable();
    for chapter in &chapters {
        if pending.peek().is_some_and(|range| range.chapter == *chapter) {
            range_lookup.push(pending.next());
        } else {
            range_lookup.push(None);
        }
    }

    let mut divisions = Vec::with_capacity(Division::ALL.len());
    for division in Division::ALL {
        let span = report.spans.get(&division).cloned().unwrap_or_default();
        if span.chapters.is_empty() {
            warn!(
                division = division.as_str(),
                label = division.label(),
                "division not found in toc"
            );
        }

        let mut plan_chapters = Vec::with_capacity(span.chapters.len());
        let mut cursor = 0;
        for chapter in &span.chapters {
            let mut resolved = None;
            if let Some(offset) = chapters[cursor..]
                .iter()
                .position(|candidate| candidate == chapter)
            {
                let index = cursor + offset;
                cursor = index + 1;
                resolved = range_lookup[index];
            }

            plan_chapters.push(PlanChapter {
                title: chapter.display_title(),
                page: chapter.target_page,
                source_page: chapter.source_page,
                start_page: resolved.map(|range| range.start_page),
                end_page: resolved.map(|range| range.end_page),
            });
        }

        divisions.push(DivisionPlan {
            name: division.as_str().to_string(),
            label: division.label().to_string(),
            start_page: span.start_page,
            end_page: span.end_page,
            chapters: plan_chapters,
        });
    }

    let rejected_chapters = diagnostics
        .iter()
        .filter(|diagnostic| diagnostic.is_rejection())
        .count();
    let plan = SplitPlanDocument {
        metadata: PlanMetadata {
            source_name: document.metadata.source_name.clone(),
            generated_at: now_utc_string(),
            total_pages: args.total_pages,
        },
        divisions,
        unclassified_chapters: report
            .unclassified
            .iter()
            .map(|chapter| PlanChapterRef {
                title: chapter.display_title(),
                page: chapter.target_page,
            })
            .collect(),
        diagnostics: diagnostics
            .iter()
            .map(|diagnostic| PlanDiagnostic {
                kind: diagnostic.kind().to_string(),
                message: diagnostic.to_string(),
            })
            .collect(),
        statistics: PlanStatistics {
            total_chapters: chapters.len(),
            planned_chapters: ranges.len(),
            rejected_chapters,
            unclassified_chapters: report.unclassified.len(),
        },
    };

    write_json_pretty(&args.output, &plan)?;
    info!(
        path = %args.output.display(),
        planned = plan.statistics.planned_chapters,
        rejected = plan.statistics.rejected_chapters,
        "wrote split plan"
    );

    Ok(())
}

fn collect_chapters(document: &TocTreeDocument) -> Result<Vec<ChapterRef>> {
    let marker =
        Regex::new(r"^제(\d+)장\s*(.*)$").context("failed to compile chapter title regex")?;

    let mut chapters = Vec::new();
    for (page, nodes) in &document.toc_tree {
        for node in nodes {
            if node.node_type != "chapter" {
                continue;
            }

            let Some(captures) = marker.captures(node.title.trim()) else {
                warn!(title = %node.title, "chapter title missing 제N장 marker; skipped");
                continue;
            };

            chapters.push(ChapterRef {
                number: captures
                    .get(1)
                    .map(|m| m.as_str())
                    .unwrap_or_default()
                    .to_string(),
                title: captures
                    .get(2)
                    .map(|m| m.as_str().trim())
                    .unwrap_or_default()
                    .to_string(),
                target_page: node.page,
                source_page: *page,
            });
        }
    }

    Ok(chapters)
}
