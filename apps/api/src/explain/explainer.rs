//! Explainer: asks the advisory service for a short, résumé-grounded
//! justification of a job title.

use std::time::Duration;

use tracing::warn;

use crate::chat::budget::resume_excerpt;
use crate::explain::prompts::{EXPLAIN_PROMPT_TEMPLATE, EXPLAIN_SYSTEM};
use crate::llm_client::{AdvisoryError, CompletionParams, LlmClient, OutboundMessage};

const EXPLAIN_TIMEOUT: Duration = Duration::from_secs(15);

/// Service defaults for sampling; only the request is time-boxed.
const EXPLAIN_PARAMS: CompletionParams = CompletionParams {
    temperature: None,
    max_tokens: None,
    timeout: Some(EXPLAIN_TIMEOUT),
};

pub fn build_explain_messages(resume_text: &str, job_title: &str) -> Vec<OutboundMessage> {
    let prompt = EXPLAIN_PROMPT_TEMPLATE
        .replace("{job_title}", job_title)
        .replacen("{resume}", resume_excerpt(resume_text), 1);
    vec![
        OutboundMessage::system(EXPLAIN_SYSTEM),
        OutboundMessage::user(prompt),
    ]
}

/// Returns the trimmed explanation, or a parenthesised notice on failure.
pub async fn explain_fit(llm: &LlmClient, resume_text: &str, job_title: &str) -> String {
    let messages = build_explain_messages(resume_text, job_title);

    match llm.complete_with(&messages, EXPLAIN_PARAMS).await {
        Ok(text) => text.trim().to_string(),
        // Any error the service itself reported, whatever the status.
        Err(AdvisoryError::Auth(detail))
        | Err(AdvisoryError::Protocol {
            detail: Some(detail),
            ..
        }) => {
            warn!("Explanation rejected by advisory API: {detail}");
            format!("(Advisory API error: {detail})")
        }
        Err(e) => {
            warn!("Explanation failed: {e}");
            format!("(Explanation unavailable: {e})")
        }
    }
}
