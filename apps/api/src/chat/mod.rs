// Conversational Context Assembler
// Implements: context budgeting, message sequencing, per-session state and the ask boundary.
// All model calls go through llm_client; nothing here talks HTTP.

pub mod advisor;
pub mod budget;
pub mod handlers;
pub mod prompts;
pub mod sequencer;
pub mod session;
