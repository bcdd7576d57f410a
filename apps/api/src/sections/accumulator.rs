use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::sections::classifier::{KeywordLineClassifier, LineClassifier, SectionKind};

/// Section content in document order, keyed by tracked `SectionKind`.
/// All four tracked kinds are always present, possibly empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionMap {
    sections: BTreeMap<SectionKind, Vec<String>>,
}

impl Default for SectionMap {
    fn default() -> Self {
        Self {
            sections: SectionKind::TRACKED
                .into_iter()
                .map(|kind| (kind, Vec::new()))
                .collect(),
        }
    }
}

impl SectionMap {
    pub fn get(&self, kind: SectionKind) -> &[String] {
        self.sections.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (SectionKind, &[String])> {
        self.sections.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    /// Tracked kinds with no content, in fixed order.
    pub fn empty_sections(&self) -> Vec<SectionKind> {
        self.iter()
            .filter(|(_, lines)| lines.is_empty())
            .map(|(kind, _)| kind)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.values().all(Vec::is_empty)
    }

    fn push(&mut self, kind: SectionKind, line: &str) {
        if let Some(bucket) = self.sections.get_mut(&kind) {
            bucket.push(line.to_string());
        }
    }
}

/// Parses `text` with the default keyword classifier.
pub fn accumulate(text: &str) -> SectionMap {
    accumulate_with(&KeywordLineClassifier, text)
}

/// Drives `classifier` over every line of `text`.
///
/// Content before the first recognised heading is dropped. Heading lines only
/// switch the open section; they are never stored as content.
pub fn accumulate_with(classifier: &dyn LineClassifier, text: &str) -> SectionMap {
    let mut map = SectionMap::default();
    let mut current = SectionKind::Unclassified;

    for raw in text.lines() {
        let line = raw.trim();
        let class = classifier.classify(line, current);

        if class.is_heading {
            current = class.section;
            continue;
        }
        if line.is_empty() || !current.is_tracked() {
            continue;
        }
        map.push(current, line);
    }

    map
}

/// Soft notice shown when a tracked section came back empty.
pub fn missing_section_warning(kind: SectionKind) -> Option<&'static str> {
    match kind {
        SectionKind::Education => Some("No education experience detected."),
        SectionKind::WorkExperience => Some("No work experience found."),
        SectionKind::ResearchExperience => {
            Some("No research experience found. Consider adding research or project experience.")
        }
        SectionKind::SkillsAndInterests => Some(
            "No skills or interests found. Consider listing relevant tools or languages.",
        ),
        SectionKind::Unclassified => None,
    }
}
