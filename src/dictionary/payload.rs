/*!
 * Request payload for word combinations and canonical pair ordering.
 *
 * The accepted wire shape is a list of exactly two word records:
 *
 * ```json
 * {"words": [{"word": "hello", "language": "en"}, {"word": "hola", "language": "es"}]}
 * ```
 */

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::DictionaryError;

/// Longest accepted word
pub const MAX_WORD_LEN: usize = 100;

/// Longest accepted language code
pub const MAX_LANGUAGE_LEN: usize = 50;

/// One language-tagged word as submitted by a caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordInput {
    pub word: String,
    pub language: String,
}

impl WordInput {
    pub fn new(word: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            language: language.into(),
        }
    }

    /// Trim surrounding whitespace and check both fields.
    ///
    /// `position` is the 1-based slot used in error messages.
    pub fn normalized(&self, position: usize) -> Result<WordInput, DictionaryError> {
        let word = self.word.trim();
        let language = self.language.trim();

        if word.is_empty() {
            return Err(DictionaryError::Format(format!(
                "word {} has an empty word",
                position
            )));
        }
        if language.is_empty() {
            return Err(DictionaryError::Format(format!(
                "word {} has an empty language",
                position
            )));
        }
        if word.chars().count() > MAX_WORD_LEN {
            return Err(DictionaryError::Format(format!(
                "word {} is longer than {} characters",
                position, MAX_WORD_LEN
            )));
        }
        if language.chars().count() > MAX_LANGUAGE_LEN {
            return Err(DictionaryError::Format(format!(
                "language of word {} is longer than {} characters",
                position, MAX_LANGUAGE_LEN
            )));
        }

        Ok(WordInput::new(word, language))
    }
}

/// Parses the console form `LANG=WORD`
impl FromStr for WordInput {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('=') {
            Some((language, word)) => Ok(WordInput::new(word, language)),
            None => Err(format!("expected LANG=WORD, got '{}'", s)),
        }
    }
}

/// Body of a create or update request
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CombinationPayload {
    #[serde(default)]
    pub words: Vec<WordInput>,
}

impl CombinationPayload {
    pub fn new(words: Vec<WordInput>) -> Self {
        Self { words }
    }

    /// Convenience constructor for the common two-word case
    pub fn pair(first: WordInput, second: WordInput) -> Self {
        Self::new(vec![first, second])
    }

    /// Validate the payload shape and return both normalized words
    pub fn validated(&self) -> Result<(WordInput, WordInput), DictionaryError> {
        match self.words.as_slice() {
            [first, second] => Ok((first.normalized(1)?, second.normalized(2)?)),
            words => Err(DictionaryError::Format(format!(
                "expected exactly 2 words, got {}",
                words.len()
            ))),
        }
    }
}

/// Two entry ids ordered ascending; equal for (A,B) and (B,A)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CanonicalPair {
    pub low: i64,
    pub high: i64,
}

impl CanonicalPair {
    pub fn new(a: i64, b: i64) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }
}
