//! Conversation turns, sessions, and the history store seam.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;

/// Who produced a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The human user.
    User,
    /// The character's reply.
    Assistant,
}

/// A single turn in a conversation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversationTurn {
    /// Who produced the turn.
    pub role: Role,
    /// The turn's text content.
    pub content: String,
    /// When the turn was recorded.
    pub timestamp: DateTime<Utc>,
}

impl ConversationTurn {
    /// Create a turn stamped with the current time.
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self { role, content: content.into(), timestamp: Utc::now() }
    }
}

/// An ordered chat history owned by one session.
///
/// The engine only ever consumes a bounded suffix of the turns; the full
/// history remains here (and in whatever store persists it).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    /// Unique session identifier.
    pub session_id: String,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// All turns, oldest first.
    pub turns: Vec<ConversationTurn>,
}

impl Session {
    /// Create a new session with a random identifier.
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4().to_string())
    }

    /// Create a new empty session with the given identifier.
    pub fn with_id(session_id: impl Into<String>) -> Self {
        Self { session_id: session_id.into(), created_at: Utc::now(), turns: Vec::new() }
    }

    /// Append a turn stamped with the current time.
    pub fn push(&mut self, role: Role, content: impl Into<String>) -> &ConversationTurn {
        let index = self.turns.len();
        self.turns.push(ConversationTurn::new(role, content));
        &self.turns[index]
    }

    /// The most recent `limit` turns, oldest first.
    pub fn recent_turns(&self, limit: usize) -> &[ConversationTurn] {
        let start = self.turns.len().saturating_sub(limit);
        &self.turns[start..]
    }

    /// Drop the oldest turns until the history fits a token budget.
    ///
    /// Uses the rough estimate of one token per four characters; a hard
    /// cut, not a summarization.
    pub fn trim_to_token_budget(&mut self, max_tokens: usize) {
        let max_chars = max_tokens * 4;
        let mut total_chars: usize =
            self.turns.iter().map(|t| t.content.chars().count()).sum();
        if total_chars <= max_chars {
            return;
        }

        let mut drop = 0;
        while drop < self.turns.len() && total_chars > max_chars {
            total_chars -= self.turns[drop].content.chars().count();
            drop += 1;
        }
        self.turns.drain(..drop);
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// A read-only view of the external session-persistence collaborator.
///
/// Storage mechanics (files, databases) live behind this seam; the engine
/// only asks for a session's ordered turns and never mutates them.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Load the ordered turns for a session, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::History`](crate::error::ContextError::History)
    /// if the session's turns cannot be read.
    async fn load_history(&self, session_id: &str) -> Result<Vec<ConversationTurn>>;
}
