//! Context Budgeter: picks what of the résumé and running memory goes out
//! with each advisory request.

use crate::chat::prompts::{
    ADVISOR_GENERIC_SYSTEM, ADVISOR_WITH_RESUME_SYSTEM, NO_RESUME_CONTEXT_TEMPLATE,
    RESUME_CONTEXT_TEMPLATE,
};

/// Hard cap on embedded résumé text, in characters (not tokens).
/// Bounds outbound payload size; semantic completeness is not a goal.
pub const RESUME_EXCERPT_CHARS: usize = 1200;

/// The two leading messages of every advisory request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvisoryContext {
    pub system_prompt: String,
    pub context_block: String,
}

/// Builds the system prompt and background block.
///
/// `memory_notes` is embedded whole; only the résumé is capped.
pub fn build_context(resume_text: Option<&str>, memory_notes: &str) -> AdvisoryContext {
    match resume_text {
        Some(resume) => AdvisoryContext {
            system_prompt: ADVISOR_WITH_RESUME_SYSTEM.to_string(),
            context_block: RESUME_CONTEXT_TEMPLATE
                .replace("{memory}", memory_notes)
                .replacen("{resume}", resume_excerpt(resume), 1),
        },
        None => AdvisoryContext {
            system_prompt: ADVISOR_GENERIC_SYSTEM.to_string(),
            context_block: NO_RESUME_CONTEXT_TEMPLATE.replace("{memory}", memory_notes),
        },
    }
}

/// The first `RESUME_EXCERPT_CHARS` characters of `text`, cut on a char boundary.
pub fn resume_excerpt(text: &str) -> &str {
    match text.char_indices().nth(RESUME_EXCERPT_CHARS) {
        Some((byte_idx, _)) => text.get(..byte_idx).unwrap_or(text),
        None => text,
    }
}
