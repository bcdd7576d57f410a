use std::sync::Arc;

use crate::chat::session::{HistoryPolicy, SessionStore};
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::sections::LineClassifier;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    pub sessions: Arc<SessionStore>,
    /// Pluggable heading classifier. Default: KeywordLineClassifier.
    pub classifier: Arc<dyn LineClassifier>,
}

impl AppState {
    pub fn new(config: &Config, llm: LlmClient, classifier: Arc<dyn LineClassifier>) -> Self {
        let policy = HistoryPolicy::from_capacity(config.chat_history_capacity);
        Self {
            llm,
            sessions: Arc::new(SessionStore::new(policy, config.session_idle_ttl)),
            classifier,
        }
    }
}
