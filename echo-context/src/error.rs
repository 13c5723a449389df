//! Error types for the `echo-context` crate.

use thiserror::Error;

/// Errors that can occur while handling personas and conversation history.
#[derive(Debug, Error)]
pub enum ContextError {
    /// A character profile failed validation.
    #[error("Profile error: {0}")]
    Profile(String),

    /// The history store failed to load a session's turns.
    #[error("History error: {0}")]
    History(String),
}

/// A convenience result type for persona and context operations.
pub type Result<T> = std::result::Result<T, ContextError>;
