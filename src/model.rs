use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::toc::{NodeKind, OutlineNode, PageForest};

/// Persisted TOC tree document consumed by the external splitter and report
/// renderer. Field names and nesting are stable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TocTreeDocument {
    pub metadata: TocMetadata,
    pub toc_tree: BTreeMap<u32, Vec<TocNode>>,
    pub statistics: TocStatistics,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TocMetadata {
    pub source_name: String,
    pub generated_at: String,
    /// Number of source pages carrying outline trees.
    pub total_pages: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_sha256: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TocNode {
    #[serde(rename = "type")]
    pub node_type: String,
    pub title: String,
    pub page: u32,
    pub level: u32,
    /// Present only for item nodes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    pub children: Vec<TocNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TocStatistics {
    pub total_nodes: usize,
}

impl TocNode {
    pub fn from_outline(node: &OutlineNode) -> Self {
        let (node_type, number) = match &node.kind {
            NodeKind::Chapter { .. } => ("chapter", None),
            NodeKind::Item { number } => ("item", Some(number.clone())),
            NodeKind::Other => ("other", None),
        };

        Self {
            node_type: node_type.to_string(),
            title: node.display_title(),
            page: node.page,
            level: node.level,
            number,
            children: node.children.iter().map(TocNode::from_outline).collect(),
        }
    }
}

pub fn toc_tree_from_forest(forest: &PageForest) -> BTreeMap<u32, Vec<TocNode>> {
    forest
        .iter()
        .map(|(page, roots)| (*page, roots.iter().map(TocNode::from_outline).collect()))
        .collect()
}

pub fn count_toc_nodes(tree: &BTreeMap<u32, Vec<TocNode>>) -> usize {
    fn count(node: &TocNode) -> usize {
        1 + node.children.iter().map(count).sum::<usize>()
    }

    tree.values().flatten().map(count).sum()
}

/// Persisted split plan: division spans plus validated per-chapter page
/// ranges, the input the external page-range splitter materializes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitPlanDocument {
    pub metadata: PlanMetadata,
    pub divisions: Vec<DivisionPlan>,
    pub unclassified_chapters: Vec<PlanChapterRef>,
    pub diagnostics: Vec<PlanDiagnostic>,
    pub statistics: PlanStatistics,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanMetadata {
    pub source_name: String,
    pub generated_at: String,
    pub total_pages: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DivisionPlan {
    pub name: String,
    pub label: String,
    pub start_page: Option<u32>,
    pub end_page: Option<u32>,
    pub chapters: Vec<PlanChapter>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanChapter {
    pub title: String,
    /// Printed start page as listed in the contents.
    pub page: u32,
    pub source_page: u32,
    /// Resolved range; absent when range validation rejected the chapter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_page: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanChapterRef {
    pub title: String,
    pub page: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanDiagnostic {
    pub kind: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanStatistics {
    pub total_chapters: usize,
    pub planned_chapters: usize,
    pub rejected_chapters: usize,
    pub unclassified_chapters: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outline_chapter() -> OutlineNode {
        OutlineNode {
            kind: NodeKind::Chapter {
                number: "1".to_string(),
            },
            title: "적용기준".to_string(),
            page: 3,
            level: 0,
            children: vec![OutlineNode {
                kind: NodeKind::Item {
                    number: "1-1".to_string(),
                },
                title: "일반사항".to_string(),
                page: 3,
                level: 1,
                children: Vec::new(),
            }],
        }
    }

    #[test]
    fn chapter_nodes_render_display_title_without_number_field() {
        let node = TocNode::from_outline(&outline_chapter());

        assert_eq!(node.node_type, "chapter");
        assert_eq!(node.title, "제1장 적용기준");
        assert_eq!(node.number, None);
        assert_eq!(node.children[0].node_type, "item");
        assert_eq!(node.children[0].number.as_deref(), Some("1-1"));
        assert_eq!(node.children[0].title, "일반사항");
    }

    #[test]
    fn wire_format_uses_type_key_and_omits_absent_number() {
        let node = TocNode::from_outline(&outline_chapter());
        let value = serde_json::to_value(&node).expect("node serializes");

        assert_eq!(value["type"], "chapter");
        assert!(value.get("number").is_none());
        assert_eq!(value["children"][0]["number"], "1-1");
    }

    #[test]
    fn metadata_omits_absent_checksum() {
        let metadata = TocMetadata {
            source_name: "dump.txt".to_string(),
            generated_at: "2026-01-01T00:00:00Z".to_string(),
            total_pages: 2,
            source_sha256: None,
        };
        let value = serde_json::to_value(&metadata).expect("metadata serializes");

        assert!(value.get("source_sha256").is_none());
    }

    #[test]
    fn count_toc_nodes_walks_children() {
        let mut tree = BTreeMap::new();
        tree.insert(3, vec![TocNode::from_outline(&outline_chapter())]);

        assert_eq!(count_toc_nodes(&tree), 2);
    }
}
