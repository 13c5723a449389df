//! Character profile type, parser, and persona prompt rendering.
//!
//! Profiles are plain text with uppercase `FIELD:` headers:
//!
//! ```text
//! NAME: Marcus
//! PERSONALITY: Gruff but fair ship captain.
//! BACKGROUND:
//! Thirty years hauling freight between the outer colonies.
//! RELATIONSHIPS: Trusts his first mate Elena completely.
//! EXAMPLE_DIALOGUE:
//! "We leave at dawn. Pack light."
//! ```
//!
//! A field's value runs from its header to the next header. Only `NAME` is
//! required. Unknown uppercase headers are parsed and ignored.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{ContextError, Result};

/// Fallback personality for profiles that omit the `PERSONALITY` field.
const DEFAULT_PERSONALITY: &str = "A unique character with a distinctive personality.";

/// A scripted AI persona, loaded once and shared read-only by all queries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CharacterProfile {
    /// The character's name.
    pub name: String,
    /// Personality description.
    pub personality: String,
    /// Background story.
    pub background: String,
    /// Relationships with other characters.
    pub relationships: String,
    /// Example dialogue lines in the character's voice.
    pub example_dialogue: String,
}

/// Python-style `isupper` check: at least one cased character, none lowercase.
/// Matches headers like `NAME` and `EXAMPLE_DIALOGUE` but not `Note` or `http`.
fn is_field_header(name: &str) -> bool {
    let mut has_cased = false;
    for c in name.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            has_cased = true;
        }
    }
    has_cased
}

impl CharacterProfile {
    /// Parse a profile from its text representation.
    ///
    /// File loading stays with the external collaborator; this function
    /// only consumes the already-read content.
    ///
    /// # Errors
    ///
    /// Returns [`ContextError::Profile`] if the required `NAME` field is
    /// missing or empty.
    pub fn parse(content: &str) -> Result<Self> {
        let mut fields: HashMap<String, String> = HashMap::new();
        let mut current_field: Option<String> = None;
        let mut current_value: Vec<&str> = Vec::new();

        for line in content.lines() {
            let line = line.trim_end();
            if let Some((head, rest)) = line.split_once(':') {
                let header = head.trim();
                if is_field_header(header) {
                    if let Some(field) = current_field.take() {
                        fields.insert(field, current_value.join("\n").trim().to_string());
                    }
                    current_field = Some(header.to_lowercase());
                    current_value.clear();
                    let rest = rest.trim();
                    if !rest.is_empty() {
                        current_value.push(rest);
                    }
                    continue;
                }
            }
            if current_field.is_some() {
                current_value.push(line);
            }
        }
        if let Some(field) = current_field.take() {
            fields.insert(field, current_value.join("\n").trim().to_string());
        }

        let name = fields
            .remove("name")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| ContextError::Profile("required field 'NAME' is missing".to_string()))?;

        let personality = fields
            .remove("personality")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_PERSONALITY.to_string());

        Ok(Self {
            name,
            personality,
            background: fields.remove("background").unwrap_or_default(),
            relationships: fields.remove("relationships").unwrap_or_default(),
            example_dialogue: fields.remove("example_dialogue").unwrap_or_default(),
        })
    }

    /// Render the persona instruction block for the language model.
    ///
    /// Fields appear in a fixed order (name, personality, background,
    /// relationships, example dialogue), which is a stable contract the
    /// assembler and its tests depend on.
    pub fn system_prompt(&self) -> String {
        format!(
            "You are {name}. Respond in character, maintaining their personality, \
             speaking style, and mannerisms.\n\n\
             PERSONALITY: {personality}\n\n\
             BACKGROUND: {background}\n\n\
             RELATIONSHIPS: {relationships}\n\n\
             EXAMPLE DIALOGUE:\n{example_dialogue}\n\n\
             Always stay in character. Your responses should reflect {name}'s voice, \
             knowledge, and perspective.",
            name = self.name,
            personality = self.personality,
            background = self.background,
            relationships = self.relationships,
            example_dialogue = self.example_dialogue,
        )
    }
}
