use std::collections::BTreeMap;

use super::tree::ChapterRef;

/// The five fixed top-level groupings of the standard price list, in their
/// canonical printed order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Division {
    Common,
    Civil,
    Architecture,
    Mechanical,
    Maintenance,
}

impl Division {
    pub const ALL: [Division; 5] = [
        Division::Common,
        Division::Civil,
        Division::Architecture,
        Division::Mechanical,
        Division::Maintenance,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Division::Common => "common",
            Division::Civil => "civil",
            Division::Architecture => "architecture",
            Division::Mechanical => "mechanical",
            Division::Maintenance => "maintenance",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Division::Common => "공통부문",
            Division::Civil => "토목부문",
            Division::Architecture => "건축부문",
            Division::Mechanical => "기계설비부문",
            Division::Maintenance => "유지관리부문",
        }
    }
}

// Chapter titles as printed in the contents, keyed by division. Division
// membership is a closed vocabulary, so classification is exact-title lookup
// rather than keyword matching.
const COMMON_CHAPTERS: [&str; 8] = [
    "제1장 적용기준",
    "제2장 가설공사",
    "제3장 토공사",
    "제4장 조경공사",
    "제5장 기초공사",
    "제6장 철근콘크리트공사",
    "제7장 돌공사",
    "제8장 건설기계",
];

const CIVIL_CHAPTERS: [&str; 9] = [
    "제1장 도로포장공사",
    "제2장 하천공사",
    "제3장 터널공사",
    "제4장 궤도공사",
    "제5장 강구조공사",
    "제6장 관부설 및 접합공사",
    "제7장 항만공사",
    "제8장 지반조사",
    "제9장 측 량",
];

const ARCHITECTURE_CHAPTERS: [&str; 11] = [
    "제1장 철골공사",
    "제2장 조적공사",
    "제3장 타일공사",
    "제4장 목공사",
    "제5장 수장공사",
    "제6장 방수공사",
    "제7장 지붕 및 홈통공사",
    "제8장 금속공사",
    "제9장 미장공사",
    "제10장 창호 및 유리공사",
    "제11장 칠공사",
];

const MECHANICAL_CHAPTERS: [&str; 13] = [
    "제1장 배관공사",
    "제2장 덕트공사",
    "제3장 보온공사",
    "제4장 펌프 및 공기설비공사",
    "제5장 밸브설비공사",
    "제6장 측정기기공사",
    "제7장 위생기구설비공사",
    "제8장 공기조화설비공사",
    "제9장 기타공사",
    "제10장 소방설비공사",
    "제11장 가스설비공사",
    "제12장 자동제어설비공사",
    "제13장 플랜트설비공사",
];

const MAINTENANCE_CHAPTERS: [&str; 4] = [
    "제1장 공 통",
    "제2장 토 목",
    "제3장 건 축",
    "제4장 기계설비",
];

fn division_for_title(display_title: &str) -> Option<Division> {
    for division in Division::ALL {
        let table: &[&str] = match division {
            Division::Common => &COMMON_CHAPTERS,
            Division::Civil => &CIVIL_CHAPTERS,
            Division::Architecture => &ARCHITECTURE_CHAPTERS,
            Division::Mechanical => &MECHANICAL_CHAPTERS,
            Division::Maintenance => &MAINTENANCE_CHAPTERS,
        };

        if table.contains(&display_title) {
            return Some(division);
        }
    }

    None
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DivisionSpan {
    pub start_page: Option<u32>,
    pub end_page: Option<u32>,
    pub chapters: Vec<ChapterRef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DivisionReport {
    /// Always carries all five divisions; unpopulated ones keep `None` spans.
    pub spans: BTreeMap<Division, DivisionSpan>,
    /// Chapters whose title is not in the fixed table. Surfaced for the
    /// caller to decide on, never silently folded into a default division.
    pub unclassified: Vec<ChapterRef>,
}

/// Assigns each chapter to its division by exact title lookup, then derives
/// every division's page span.
///
/// A division's `start_page` is its first chapter's target page, first write
/// wins. End pages come from one backward pass: each populated division ends
/// one page before the next populated division starts, and the last populated
/// one ends at `last_known_page`.
pub fn classify_divisions(chapters: &[ChapterRef], last_known_page: u32) -> DivisionReport {
    let mut spans: BTreeMap<Division, DivisionSpan> = Division::ALL
        .into_iter()
        .map(|division| (division, DivisionSpan::default()))
        .collect();
    let mut unclassified = Vec::new();

    for chapter in chapters {
        match division_for_title(&chapter.display_title()) {
            Some(division) => {
                let span = spans.entry(division).or_default();
                if span.start_page.is_none() {
                    span.start_page = Some(chapter.target_page);
                }
                span.chapters.push(chapter.clone());
            }
            None => unclassified.push(chapter.clone()),
        }
    }

    let mut next_start: Option<u32> = None;
    for span in spans.values_mut().rev() {
        if let Some(start) = span.start_page {
            span.end_page = Some(match next_start {
                Some(next) => next.saturating_sub(1),
                None => last_known_page,
            });
            next_start = Some(start);
        }
    }

    DivisionReport { spans, unclassified }
}
