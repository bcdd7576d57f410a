//! Line Classifier: decides whether a résumé line opens a new section.
//!
//! Default: `KeywordLineClassifier` (case-insensitive substring heuristic).
//! `AppState` holds an `Arc<dyn LineClassifier>`, so an alternative strategy can
//! be swapped in without touching the accumulator.

use serde::{Deserialize, Serialize};

/// The closed set of section tags a résumé line can belong to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SectionKind {
    Education,
    #[serde(rename = "Work Experience")]
    WorkExperience,
    #[serde(rename = "Research Experience")]
    ResearchExperience,
    #[serde(rename = "Skills & Interests")]
    SkillsAndInterests,
    #[default]
    Unclassified,
}

impl SectionKind {
    /// Kinds that collect content. `Unclassified` never does.
    pub const TRACKED: [SectionKind; 4] = [
        SectionKind::Education,
        SectionKind::WorkExperience,
        SectionKind::ResearchExperience,
        SectionKind::SkillsAndInterests,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SectionKind::Education => "Education",
            SectionKind::WorkExperience => "Work Experience",
            SectionKind::ResearchExperience => "Research Experience",
            SectionKind::SkillsAndInterests => "Skills & Interests",
            SectionKind::Unclassified => "Unclassified",
        }
    }

    pub fn is_tracked(self) -> bool {
        self != SectionKind::Unclassified
    }
}

/// Result of classifying a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineClass {
    pub section: SectionKind,
    pub is_heading: bool,
}

/// A single-capability strategy: classify one line given the open section.
pub trait LineClassifier: Send + Sync {
    fn classify(&self, line: &str, current: SectionKind) -> LineClass;
}

/// Heading triggers in priority order. First match wins, so a line mentioning
/// both "SKILLS" and "EDUCATION" resolves to `Education`.
const HEADING_TRIGGERS: &[(SectionKind, &[&str])] = &[
    (SectionKind::Education, &["EDUCATION"]),
    (
        SectionKind::WorkExperience,
        &["PROFESSIONAL EXPERIENCES", "WORK EXPERIENCE"],
    ),
    (
        SectionKind::ResearchExperience,
        &["RESEARCH EXPERIENCES", "RESEARCH EXPERIENCE"],
    ),
    (SectionKind::SkillsAndInterests, &["SKILLS & INTERESTS", "SKILLS"]),
];

/// Case-insensitive substring matcher over `HEADING_TRIGGERS`.
pub struct KeywordLineClassifier;

impl LineClassifier for KeywordLineClassifier {
    fn classify(&self, line: &str, current: SectionKind) -> LineClass {
        let upper = line.trim().to_uppercase();

        if !upper.is_empty() {
            for (kind, triggers) in HEADING_TRIGGERS {
                if triggers.iter().any(|t| upper.contains(*t)) {
                    return LineClass {
                        section: *kind,
                        is_heading: true,
                    };
                }
            }
        }

        LineClass {
            section: current,
            is_heading: false,
        }
    }
}
