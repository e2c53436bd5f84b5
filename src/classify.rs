//! Heading classification.
//!
//! Maps a section heading to one of the CV categories via case-insensitive
//! keyword containment. The table is ordered; the first category with a
//! matching keyword wins.

use crate::models::ChunkKind;

/// Category keyword table, in tie-break order.
const CATEGORY_KEYWORDS: &[(ChunkKind, &[&str])] = &[
    (
        ChunkKind::Experience,
        &[
            "experience",
            "work",
            "career",
            "employment",
            "professional",
            "positions",
            "roles",
            "history",
        ],
    ),
    (
        ChunkKind::Education,
        &[
            "education",
            "qualifications",
            "academic",
            "degree",
            "university",
            "college",
            "school",
            "certification",
            "training",
        ],
    ),
    (
        ChunkKind::Skills,
        &[
            "skills",
            "technical",
            "expertise",
            "competencies",
            "technologies",
            "tools",
            "languages",
            "programming",
        ],
    ),
    (
        ChunkKind::Projects,
        &[
            "projects",
            "portfolio",
            "achievements",
            "publications",
            "presentations",
            "leadership",
            "volunteering",
        ],
    ),
    (
        ChunkKind::Personal,
        &[
            "contact",
            "personal",
            "details",
            "information",
            "summary",
            "profile",
        ],
    ),
];

/// Classify a section heading into a CV category.
///
/// Total and deterministic for any input; unrecognized headings (including
/// the empty string) classify as [`ChunkKind::General`].
pub fn classify(heading: &str) -> ChunkKind {
    let lowered = heading.to_lowercase();
    for (kind, keywords) in CATEGORY_KEYWORDS {
        if keywords.iter().any(|kw| lowered.contains(kw)) {
            return *kind;
        }
    }
    ChunkKind::General
}
