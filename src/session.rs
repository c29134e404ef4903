//! Per-session conversation history.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use uuid::Uuid;

/// One completed query/answer pair.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub query: String,
    pub answer: String,
}

#[derive(Debug, Default)]
struct Session {
    exchanges: VecDeque<Exchange>,
}

/// Manages bounded conversation history per session.
///
/// Sessions are created on demand and live for the process lifetime. All
/// mutation goes through one lock, so concurrent queries against different
/// sessions never lose updates.
pub struct SessionManager {
    sessions: Mutex<HashMap<String, Session>>,
    max_history: usize,
}

impl SessionManager {
    /// Create a manager keeping at most `max_history` recent exchanges
    /// per session.
    pub fn new(max_history: usize) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            max_history,
        }
    }

    /// Allocate a new session with a unique id.
    pub fn create_session(&self) -> String {
        let id = Uuid::new_v4().to_string();
        self.sessions
            .lock()
            .unwrap()
            .insert(id.clone(), Session::default());
        id
    }

    /// Rendered summary of the most recent exchanges, oldest first.
    ///
    /// Returns `None` for unknown sessions or sessions with no history.
    pub fn get_conversation_history(&self, session_id: &str) -> Option<String> {
        let sessions = self.sessions.lock().unwrap();
        let session = sessions.get(session_id)?;
        if session.exchanges.is_empty() {
            return None;
        }

        let rendered = session
            .exchanges
            .iter()
            .map(|e| format!("User: {}\nAssistant: {}", e.query, e.answer))
            .collect::<Vec<_>>()
            .join("\n");
        Some(rendered)
    }

    /// Append an exchange, evicting the oldest once the window is full.
    pub fn add_exchange(&self, session_id: &str, query: &str, answer: &str) {
        let mut sessions = self.sessions.lock().unwrap();
        let session = sessions
            .entry(session_id.to_string())
            .or_default();

        session.exchanges.push_back(Exchange {
            query: query.to_string(),
            answer: answer.to_string(),
        });
        while session.exchanges.len() > self.max_history {
            session.exchanges.pop_front();
        }
    }

    /// Number of exchanges currently held for a session.
    pub fn exchange_count(&self, session_id: &str) -> usize {
        self.sessions
            .lock()
            .unwrap()
            .get(session_id)
            .map(|s| s.exchanges.len())
            .unwrap_or(0)
    }
}
