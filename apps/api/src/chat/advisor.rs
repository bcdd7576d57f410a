//! The interaction boundary: one question in, one displayable string out.

use tracing::{debug, info, warn};

use crate::chat::budget::build_context;
use crate::chat::sequencer::build_messages;
use crate::chat::session::Session;
use crate::llm_client::LlmClient;

/// Answers `question` within `session`.
///
/// On success the reply is recorded in the session's history and memory. On
/// failure history and memory are left untouched and the mapped error message is
/// returned in place of a reply; no failure escapes this function.
pub async fn ask(llm: &LlmClient, session: &mut Session, question: &str) -> String {
    session.touch();
    let context = build_context(session.resume_text.as_deref(), session.memory.as_str());
    let messages = build_messages(&context, session.history.turns(), question);

    debug!(
        session_id = %session.id,
        has_resume = session.resume_text.is_some(),
        history_turns = session.history.len(),
        memory_bytes = session.memory.len(),
        outbound_messages = messages.len(),
        "Assembled advisory request"
    );

    match llm.complete(&messages).await {
        Ok(reply) => {
            session.record_exchange(question, &reply);
            info!(session_id = %session.id, "Advisory reply recorded");
            reply
        }
        Err(e) => {
            warn!(session_id = %session.id, "Advisory call failed: {e}");
            e.user_message()
        }
    }
}
