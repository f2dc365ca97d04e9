use std::collections::{BTreeMap, BTreeSet};

use super::ContractError;
use super::classify::{LineClassification, LineClassifier};
use super::dump::Line;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Chapter { number: String },
    Item { number: String },
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineNode {
    pub kind: NodeKind,
    pub title: String,
    /// Printed target page parsed from the line, not the dump page the line
    /// appears on.
    pub page: u32,
    pub level: u32,
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    /// Printed form of the title: chapters render as `제N장 <title>`, other
    /// kinds as the bare title.
    pub fn display_title(&self) -> String {
        match &self.kind {
            NodeKind::Chapter { number } => chapter_display_title(number, &self.title),
            _ => self.title.clone(),
        }
    }

    pub fn node_count(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(OutlineNode::node_count)
            .sum::<usize>()
    }
}

pub fn chapter_display_title(number: &str, title: &str) -> String {
    if title.is_empty() {
        format!("제{number}장")
    } else {
        format!("제{number}장 {title}")
    }
}

/// Root nodes per source page, in document order. Pages without outline
/// content are absent rather than stored empty.
pub type PageForest = BTreeMap<u32, Vec<OutlineNode>>;

/// Content anomalies found while building the forest. These never interrupt
/// parsing; the offending node is still kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeDiagnostic {
    /// The same number appeared twice among siblings under one parent. The
    /// later occurrence is reported, not merged.
    DuplicateSibling {
        page: u32,
        number: String,
        title: String,
    },
}

/// Flattened view of one top-level chapter, handed to the division and range
/// stages. A copy of the canonical tree's fields, never a second owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterRef {
    pub number: String,
    pub title: String,
    pub target_page: u32,
    pub source_page: u32,
}

impl ChapterRef {
    pub fn display_title(&self) -> String {
        chapter_display_title(&self.number, &self.title)
    }
}

/// Builds the per-page outline forest from classified lines using an explicit
/// open-node stack.
///
/// Chapters always clear the stack and open a new root. Items pop open nodes
/// at their own level or deeper, then attach under whatever remains open; with
/// nothing open they become flat roots so malformed pages still parse. Other
/// entries append to the roots without disturbing the stack. A chapter marker
/// and its matched title line advance as a single two-line step.
pub fn build_page_forest(
    toc_pages: &BTreeSet<u32>,
    lines: &[Line],
    classifier: &LineClassifier,
) -> Result<(PageForest, Vec<TreeDiagnostic>), ContractError> {
    let page_blocks = group_lines_by_page(lines)?;

    let mut forest = PageForest::new();
    let mut diagnostics = Vec::new();

    for (page, page_lines) in page_blocks {
        if !toc_pages.contains(&page) {
            continue;
        }

        let roots = build_page_trees(page, &page_lines, classifier, &mut diagnostics);
        if !roots.is_empty() {
            forest.insert(page, roots);
        }
    }

    Ok((forest, diagnostics))
}

pub fn flatten_chapters(forest: &PageForest) -> Vec<ChapterRef> {
    let mut chapters = Vec::new();

    for (page, roots) in forest {
        for node in roots {
            if let NodeKind::Chapter { number } = &node.kind {
                chapters.push(ChapterRef {
                    number: number.clone(),
                    title: node.title.clone(),
                    target_page: node.page,
                    source_page: *page,
                });
            }
        }
    }

    chapters
}

fn group_lines_by_page(lines: &[Line]) -> Result<Vec<(u32, Vec<Line>)>, ContractError> {
    let mut blocks: Vec<(u32, Vec<Line>)> = Vec::new();

    for line in lines {
        match blocks.last_mut() {
            Some((page, block)) if *page == line.page => block.push(line.clone()),
            Some((page, _)) if *page > line.page => {
                return Err(ContractError::UnorderedLines {
                    previous: *page,
                    found: line.page,
                });
            }
            _ => blocks.push((line.page, vec![line.clone()])),
        }
    }

    Ok(blocks)
}

fn build_page_trees(
    page: u32,
    page_lines: &[Line],
    classifier: &LineClassifier,
    diagnostics: &mut Vec<TreeDiagnostic>,
) -> Vec<OutlineNode> {
    let mut roots = Vec::new();
    // Index paths into `roots` for the chain of open nodes, innermost last.
    let mut stack: Vec<(u32, Vec<usize>)> = Vec::new();

    let mut index = 0;
    while index < page_lines.len() {
        let text = page_lines[index].text.as_str();
        let next_text = page_lines.get(index + 1).map(|line| line.text.as_str());

        let Some(classification) = classifier.classify(text, next_text) else {
            index += 1;
            continue;
        };

        match classification {
            LineClassification::Chapter {
                number,
                title,
                page: target_page,
                consumed_next,
            } => {
                let node = OutlineNode {
                    kind: NodeKind::Chapter {
                        number: number.clone(),
                    },
                    title,
                    page: target_page.unwrap_or(page),
                    level: 0,
                    children: Vec::new(),
                };

                check_duplicate_sibling(&roots, &number, &node.title, page, diagnostics);
                roots.push(node);
                stack.clear();
                stack.push((0, vec![roots.len() - 1]));

                index += if consumed_next { 2 } else { 1 };
            }
            LineClassification::Item {
                number,
                title,
                page: target_page,
            } => {
                let level = number.matches('-').count() as u32;
                let node = OutlineNode {
                    kind: NodeKind::Item {
                        number: number.clone(),
                    },
                    title,
                    page: target_page,
                    level,
                    children: Vec::new(),
                };

                while stack.last().is_some_and(|(open, _)| *open >= level) {
                    stack.pop();
                }

                match stack.last().cloned() {
                    Some((_, parent_path)) => {
                        let parent = node_at_path(&mut roots, &parent_path);
                        check_duplicate_sibling(
                            &parent.children,
                            &number,
                            &node.title,
                            page,
                            diagnostics,
                        );

                        parent.children.push(node);
                        let child_index = parent.children.len() - 1;

                        let mut path = parent_path;
                        path.push(child_index);
                        stack.push((level, path));
                    }
                    None => {
                        // No open chapter: keep the node as a flat root so the
                        // page still yields a usable forest.
                        check_duplicate_sibling(&roots, &number, &node.title, page, diagnostics);
                        roots.push(node);
                        stack.push((level, vec![roots.len() - 1]));
                    }
                }

                index += 1;
            }
            LineClassification::Other { title, page: target_page } => {
                roots.push(OutlineNode {
                    kind: NodeKind::Other,
                    title,
                    page: target_page,
                    level: 0,
                    children: Vec::new(),
                });

                index += 1;
            }
        }
    }

    roots
}

fn node_at_path<'a>(roots: &'a mut Vec<OutlineNode>, path: &[usize]) -> &'a mut OutlineNode {
    let mut node = &mut roots[path[0]];
    for &child_index in &path[1..] {
        node = &mut node.children[child_index];
    }
    node
}

fn check_duplicate_sibling(
    siblings: &[OutlineNode],
    number: &str,
    title: &str,
    page: u32,
    diagnostics: &mut Vec<TreeDiagnostic>,
) {
    let duplicate = siblings.iter().any(|sibling| match &sibling.kind {
        NodeKind::Chapter { number: existing } | NodeKind::Item { number: existing } => {
            existing == number
        }
        NodeKind::Other => false,
    });

    if duplicate {
        diagnostics.push(TreeDiagnostic::DuplicateSibling {
            page,
            number: number.to_string(),
            title: title.to_string(),
        });
    }
}
