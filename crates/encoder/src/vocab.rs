//! The serving-side vocabulary: an immutable token -> id mapping.
//!
//! The vocabulary is built once at training time (tokens meeting a minimum
//! frequency threshold, plus the two reserved entries) and persisted next to
//! the model weights as JSON. At serving time it is loaded read-only; lookups
//! never fail because absent tokens fall back to the `<unk>` id.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::{Result, VocabError};

/// Reserved token for words not present in the training vocabulary.
pub const UNKNOWN_TOKEN: &str = "<unk>";

/// Reserved token used to right-pad encoded sequences.
pub const PAD_TOKEN: &str = "<pad>";

/// Immutable mapping from token to integer id.
///
/// Invariants, checked at construction:
/// - both reserved tokens are present
/// - ids are unique
///
/// The mapping is total under lookup: [`Vocabulary::id_of`] returns the
/// `<unk>` id for any token absent from the map.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    tokens: HashMap<String, u32>,
    unknown_id: u32,
    pad_id: u32,
}

impl Vocabulary {
    /// Build a vocabulary from an existing token -> id map.
    ///
    /// Fails if a reserved token is missing or two tokens share an id.
    pub fn from_map(tokens: HashMap<String, u32>) -> Result<Self> {
        let unknown_id = *tokens
            .get(UNKNOWN_TOKEN)
            .ok_or(VocabError::MissingReservedToken {
                token: UNKNOWN_TOKEN,
            })?;
        let pad_id = *tokens.get(PAD_TOKEN).ok_or(VocabError::MissingReservedToken {
            token: PAD_TOKEN,
        })?;

        let mut seen: HashMap<u32, &str> = HashMap::with_capacity(tokens.len());
        for (token, id) in &tokens {
            if let Some(first) = seen.insert(*id, token) {
                return Err(VocabError::DuplicateId {
                    id: *id,
                    first: first.to_string(),
                    second: token.clone(),
                });
            }
        }

        Ok(Self {
            tokens,
            unknown_id,
            pad_id,
        })
    }

    /// Build a vocabulary from an ordered list of plain tokens.
    ///
    /// The reserved entries take ids 0 (`<unk>`) and 1 (`<pad>`), matching the
    /// layout the training pipeline produces; the given tokens are numbered
    /// from 2 in iteration order. Mainly useful in tests and tooling.
    pub fn from_tokens<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tokens = HashMap::new();
        tokens.insert(UNKNOWN_TOKEN.to_string(), 0);
        tokens.insert(PAD_TOKEN.to_string(), 1);
        let mut next_id = 2u32;
        for word in words {
            let word = word.into();
            tokens.entry(word).or_insert_with(|| {
                let id = next_id;
                next_id += 1;
                id
            });
        }
        Self {
            tokens,
            unknown_id: 0,
            pad_id: 1,
        }
    }

    /// Load a vocabulary from a JSON file (token -> id object).
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|_| VocabError::FileNotFound {
            path: path.display().to_string(),
        })?;
        let tokens: HashMap<String, u32> = serde_json::from_reader(BufReader::new(file))?;
        Self::from_map(tokens)
    }

    /// Look up a token's id, falling back to the `<unk>` id.
    pub fn id_of(&self, token: &str) -> u32 {
        self.tokens.get(token).copied().unwrap_or(self.unknown_id)
    }

    /// Id of the `<unk>` reserved token.
    pub fn unknown_id(&self) -> u32 {
        self.unknown_id
    }

    /// Id of the `<pad>` reserved token.
    pub fn pad_id(&self) -> u32 {
        self.pad_id
    }

    /// Total number of entries, reserved tokens included.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tokens_reserves_special_ids() {
        let vocab = Vocabulary::from_tokens(["great", "terrible"]);

        assert_eq!(vocab.unknown_id(), 0);
        assert_eq!(vocab.pad_id(), 1);
        assert_eq!(vocab.id_of("great"), 2);
        assert_eq!(vocab.id_of("terrible"), 3);
        assert_eq!(vocab.len(), 4);
    }

    #[test]
    fn test_unknown_fallback_makes_lookup_total() {
        let vocab = Vocabulary::from_tokens(["great"]);

        assert_eq!(vocab.id_of("never-seen-before"), vocab.unknown_id());
    }

    #[test]
    fn test_from_map_requires_reserved_tokens() {
        let mut tokens = HashMap::new();
        tokens.insert("great".to_string(), 0);

        let err = Vocabulary::from_map(tokens).unwrap_err();
        assert!(matches!(err, VocabError::MissingReservedToken { .. }));
    }

    #[test]
    fn test_from_map_rejects_duplicate_ids() {
        let mut tokens = HashMap::new();
        tokens.insert(UNKNOWN_TOKEN.to_string(), 0);
        tokens.insert(PAD_TOKEN.to_string(), 1);
        tokens.insert("great".to_string(), 2);
        tokens.insert("awful".to_string(), 2);

        let err = Vocabulary::from_map(tokens).unwrap_err();
        assert!(matches!(err, VocabError::DuplicateId { id: 2, .. }));
    }

    #[test]
    fn test_duplicate_words_in_from_tokens_are_deduplicated() {
        let vocab = Vocabulary::from_tokens(["great", "great", "bad"]);

        assert_eq!(vocab.len(), 4);
        assert_eq!(vocab.id_of("bad"), 3);
    }
}
