//! Tests for sessions, history bounds, and the history store seam.

use std::collections::HashMap;

use async_trait::async_trait;
use echo_context::{
    ContextError, ConversationTurn, HistoryStore, Result, Role, Session,
};

#[test]
fn push_appends_in_order() {
    let mut session = Session::with_id("s-1");
    session.push(Role::User, "hello");
    session.push(Role::Assistant, "well met");

    assert_eq!(session.turns.len(), 2);
    assert_eq!(session.turns[0].role, Role::User);
    assert_eq!(session.turns[1].role, Role::Assistant);
    assert!(session.turns[0].timestamp <= session.turns[1].timestamp);
}

#[test]
fn recent_turns_returns_bounded_suffix_oldest_first() {
    let mut session = Session::with_id("s-1");
    for i in 0..10 {
        session.push(Role::User, format!("turn {i}"));
    }

    let recent = session.recent_turns(4);
    let contents: Vec<&str> = recent.iter().map(|t| t.content.as_str()).collect();
    assert_eq!(contents, ["turn 6", "turn 7", "turn 8", "turn 9"]);

    assert_eq!(session.recent_turns(100).len(), 10);
    assert!(session.recent_turns(0).is_empty());
}

#[test]
fn token_budget_trim_drops_oldest_turns_first() {
    let mut session = Session::with_id("s-1");
    for i in 0..5 {
        // 40 characters each: ten tokens under the 4-chars-per-token estimate.
        session.push(Role::User, format!("{i}{}", "x".repeat(39)));
    }

    // Budget of 30 tokens = 120 characters: keeps the last three turns.
    session.trim_to_token_budget(30);

    assert_eq!(session.turns.len(), 3);
    assert!(session.turns[0].content.starts_with('2'));
}

#[test]
fn trim_is_a_noop_when_under_budget() {
    let mut session = Session::with_id("s-1");
    session.push(Role::User, "short");
    session.trim_to_token_budget(100);
    assert_eq!(session.turns.len(), 1);
}

/// In-memory fake of the external session-persistence collaborator.
struct FakeHistoryStore {
    sessions: HashMap<String, Vec<ConversationTurn>>,
}

#[async_trait]
impl HistoryStore for FakeHistoryStore {
    async fn load_history(&self, session_id: &str) -> Result<Vec<ConversationTurn>> {
        self.sessions
            .get(session_id)
            .cloned()
            .ok_or_else(|| ContextError::History(format!("unknown session '{session_id}'")))
    }
}

#[tokio::test]
async fn history_store_loads_ordered_turns() {
    let turns = vec![
        ConversationTurn::new(Role::User, "first"),
        ConversationTurn::new(Role::Assistant, "second"),
    ];
    let store = FakeHistoryStore {
        sessions: HashMap::from([("s-1".to_string(), turns.clone())]),
    };

    let loaded = store.load_history("s-1").await.unwrap();
    assert_eq!(loaded, turns);

    let err = store.load_history("missing").await.unwrap_err();
    assert!(matches!(err, ContextError::History(_)));
}
