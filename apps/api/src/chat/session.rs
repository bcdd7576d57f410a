//! Per-session conversation state and the store that isolates sessions.

use std::collections::HashMap;
use std::fmt::Write;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Speaker {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub speaker: Speaker,
    pub text: String,
}

/// How much turn history a session keeps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HistoryPolicy {
    /// Keep every turn for the life of the session.
    #[default]
    Unbounded,
    /// Keep at most this many turns, dropping the oldest whole exchanges.
    Capacity(usize),
}

impl HistoryPolicy {
    pub fn from_capacity(capacity: Option<usize>) -> Self {
        capacity.map_or(HistoryPolicy::Unbounded, HistoryPolicy::Capacity)
    }
}

/// Ordered turns, appended user-then-assistant per exchange.
#[derive(Debug, Clone, Default)]
pub struct ConversationHistory {
    turns: Vec<ChatTurn>,
    policy: HistoryPolicy,
}

impl ConversationHistory {
    pub fn new(policy: HistoryPolicy) -> Self {
        Self {
            turns: Vec::new(),
            policy,
        }
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    fn push_exchange(&mut self, question: &str, reply: &str) {
        self.turns.push(ChatTurn {
            speaker: Speaker::User,
            text: question.to_string(),
        });
        self.turns.push(ChatTurn {
            speaker: Speaker::Assistant,
            text: reply.to_string(),
        });

        if let HistoryPolicy::Capacity(cap) = self.policy {
            if self.turns.len() > cap {
                // Evict in pairs so replay keeps user/assistant alignment.
                let excess = self.turns.len() - cap;
                let evict = (excess + excess % 2).min(self.turns.len());
                self.turns.drain(..evict);
            }
        }
    }
}

/// Running "User asked / Assistant answered" notes. Append-only and never
/// compacted; only `ConversationHistory` has a bound.
#[derive(Debug, Clone, Default)]
pub struct MemoryNotes(String);

impl MemoryNotes {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    fn record(&mut self, question: &str, reply: &str) {
        // Writing into a String cannot fail.
        let _ = write!(
            self.0,
            "User asked: {question}\nAssistant answered: {reply}\n"
        );
    }
}

#[derive(Debug)]
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
    pub resume_text: Option<String>,
    pub history: ConversationHistory,
    pub memory: MemoryNotes,
}

impl Session {
    pub fn new(policy: HistoryPolicy) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            last_active: now,
            resume_text: None,
            history: ConversationHistory::new(policy),
            memory: MemoryNotes::default(),
        }
    }

    /// Records one successful exchange in both history and memory.
    pub fn record_exchange(&mut self, question: &str, reply: &str) {
        self.history.push_exchange(question, reply);
        self.memory.record(question, reply);
    }

    pub fn touch(&mut self) {
        self.last_active = Utc::now();
    }

    /// True once nothing has happened in the session for at least `ttl`.
    pub fn is_idle(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        (now - self.last_active)
            .to_std()
            .is_ok_and(|idle| idle >= ttl)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id,
            created_at: self.created_at,
            last_active: self.last_active,
            has_resume: self.resume_text.is_some(),
            history: self.history.turns().to_vec(),
            memory_notes: self.memory.as_str().to_string(),
            memory_bytes: self.memory.len(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
    pub has_resume: bool,
    pub history: Vec<ChatTurn>,
    pub memory_notes: String,
    pub memory_bytes: usize,
}

pub type SessionHandle = Arc<Mutex<Session>>;

/// Sessions keyed by id. Each session sits behind its own lock, so exchanges
/// within a session are serialised while separate sessions never contend.
///
/// With an idle TTL set, `sweep_idle` drops sessions untouched for that long.
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, SessionHandle>>,
    policy: HistoryPolicy,
    idle_ttl: Option<Duration>,
}

impl SessionStore {
    pub fn new(policy: HistoryPolicy, idle_ttl: Option<Duration>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            policy,
            idle_ttl,
        }
    }

    pub async fn create(&self) -> Uuid {
        let session = Session::new(self.policy);
        let id = session.id;
        self.sessions
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(session)));
        id
    }

    pub async fn get(&self, id: Uuid) -> Option<SessionHandle> {
        self.sessions.read().await.get(&id).cloned()
    }

    pub async fn remove(&self, id: Uuid) -> bool {
        self.sessions.write().await.remove(&id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Removes every session idle for at least the TTL as of `now` and
    /// returns how many went. Sessions locked mid-exchange are kept.
    pub async fn sweep_idle(&self, now: DateTime<Utc>) -> usize {
        let Some(ttl) = self.idle_ttl else {
            return 0;
        };
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, handle| match handle.try_lock() {
            Ok(session) => !session.is_idle(now, ttl),
            Err(_) => true,
        });
        before - sessions.len()
    }
}

/// Runs `sweep_idle` every `every` until the runtime shuts down.
pub fn spawn_idle_sweeper(store: Arc<SessionStore>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        info!("Idle session sweeper started ({}s interval)", every.as_secs());

        loop {
            ticker.tick().await;
            let evicted = store.sweep_idle(Utc::now()).await;
            if evicted > 0 {
                let remaining = store.len().await;
                info!(evicted, remaining, "Evicted idle sessions");
            } else {
                debug!("Idle sweep found nothing to evict");
            }
        }
    })
}
