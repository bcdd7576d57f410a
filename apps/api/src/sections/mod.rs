// Résumé Section Classifier
// Implements: line classification (pluggable), section accumulation, document
// text extraction and the stateless parse handler.

pub mod accumulator;
pub mod classifier;
pub mod document;
pub mod handlers;

pub use accumulator::SectionMap;
pub use classifier::{KeywordLineClassifier, LineClassifier, SectionKind};
