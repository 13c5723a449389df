//! Persona and context assembly for the Echo character chat.
//!
//! This crate provides:
//! - Character profile parsing and persona prompt rendering
//! - Conversation turns, sessions, and history trimming
//! - The context assembler that merges persona, retrieved knowledge, and
//!   recent history into one bounded prompt

mod assembler;
mod character;
mod error;
mod session;

pub use assembler::{AssembledContext, ContextAssembler, SourceAttribution, sources};
pub use character::CharacterProfile;
pub use error::{ContextError, Result};
pub use session::{ConversationTurn, HistoryStore, Role, Session};
