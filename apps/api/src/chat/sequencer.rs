use crate::chat::budget::AdvisoryContext;
use crate::chat::session::ChatTurn;
use crate::llm_client::OutboundMessage;

/// Orders the complete request body for one advisory call:
/// system prompt, context block, replayed history, then the new question.
///
/// History is replayed two turns at a time, the first as `user` and the
/// second (when present) as `assistant`. A trailing unanswered turn goes out
/// as a lone `user` message.
pub fn build_messages(
    context: &AdvisoryContext,
    history: &[ChatTurn],
    new_input: &str,
) -> Vec<OutboundMessage> {
    let mut messages = Vec::with_capacity(history.len() + 3);
    messages.push(OutboundMessage::system(context.system_prompt.as_str()));
    messages.push(OutboundMessage::user(context.context_block.as_str()));

    for pair in history.chunks(2) {
        messages.push(OutboundMessage::user(pair[0].text.as_str()));
        if let Some(answer) = pair.get(1) {
            messages.push(OutboundMessage::assistant(answer.text.as_str()));
        }
    }

    messages.push(OutboundMessage::user(new_input));
    messages
}
