//! Context assembly: persona + retrieved knowledge + bounded history.
//!
//! The [`ContextAssembler`] merges the character profile, the retriever's
//! ranked results, and a trimmed suffix of the conversation history into a
//! single [`AssembledContext`]. Assembly is a pure function of its inputs
//! (identical inputs produce byte-identical output) and never performs I/O
//! or network calls.

use echo_rag::SearchResult;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::character::CharacterProfile;
use crate::session::ConversationTurn;

/// Instruction appended after the persona block so the character answers
/// in the user's language.
const LANGUAGE_INSTRUCTION: &str = "\n\nIMPORTANT: Always respond in the same language as \
    the user's message. If the user writes in English, respond in English. If they write in \
    Russian, respond in Russian. If they write in any other language, respond in that same \
    language.";

/// The final assembled prompt context, consumed by the external LLM client.
///
/// `system_prompt` plus the ordered `turns` are the sole contract with the
/// LLM client; the engine does not format model-specific request bodies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssembledContext {
    /// The persona-and-knowledge instruction block.
    pub system_prompt: String,
    /// The retrieved chunks backing the knowledge section, in ranked order.
    pub retrieved: Vec<SearchResult>,
    /// The selected conversation turns, oldest first.
    pub turns: Vec<ConversationTurn>,
}

/// A retrieved result's source reference, for attribution in API responses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceAttribution {
    /// Identifier of the knowledge source the chunk came from.
    pub source_id: String,
    /// Similarity to the query, rounded to three decimals.
    pub relevance: f32,
}

/// Assembles prompt contexts for one character.
///
/// Holds the read-only [`CharacterProfile`] shared by all requests.
#[derive(Debug, Clone)]
pub struct ContextAssembler {
    profile: CharacterProfile,
}

impl ContextAssembler {
    /// Create an assembler for the given character.
    pub fn new(profile: CharacterProfile) -> Self {
        Self { profile }
    }

    /// Return the character profile this assembler renders.
    pub fn profile(&self) -> &CharacterProfile {
        &self.profile
    }

    /// Merge persona, retrieved knowledge, and recent history into one
    /// bounded context.
    ///
    /// The system prompt opens with the persona fields in their fixed
    /// order, then the language instruction, then (only when
    /// `retrieval_results` is non-empty) a relevant-knowledge section
    /// listing each chunk with its source in the retriever's ranked order.
    /// The most recent `history_limit` turns are selected oldest-first;
    /// older turns are dropped silently (the full history remains in the
    /// owning session store).
    pub fn assemble(
        &self,
        retrieval_results: Vec<SearchResult>,
        history: &[ConversationTurn],
        history_limit: usize,
    ) -> AssembledContext {
        let mut system_prompt = self.profile.system_prompt();
        system_prompt.push_str(LANGUAGE_INSTRUCTION);

        if retrieval_results.is_empty() {
            system_prompt.push_str(&format!(
                "\n\nRespond to the user as {}, staying in character.",
                self.profile.name
            ));
        } else {
            let context_text = retrieval_results
                .iter()
                .map(|r| format!("[From {}]: {}", r.chunk.source_id, r.chunk.text))
                .collect::<Vec<_>>()
                .join("\n\n");
            system_prompt.push_str(&format!(
                "\n\nRELEVANT CONTEXT FROM YOUR KNOWLEDGE:\n{context_text}\n\n\
                 Use this information to inform your response, but always stay in character \
                 as {}.",
                self.profile.name
            ));
        }

        let start = history.len().saturating_sub(history_limit);
        let turns = history[start..].to_vec();

        debug!(
            retrieved = retrieval_results.len(),
            turns = turns.len(),
            "assembled context"
        );

        AssembledContext { system_prompt, retrieved: retrieval_results, turns }
    }
}

/// Extract source attributions from retrieval results, in ranked order.
pub fn sources(results: &[SearchResult]) -> Vec<SourceAttribution> {
    results
        .iter()
        .map(|r| SourceAttribution {
            source_id: r.chunk.source_id.clone(),
            relevance: (r.similarity * 1000.0).round() / 1000.0,
        })
        .collect()
}
