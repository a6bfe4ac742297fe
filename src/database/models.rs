/*!
 * Database entity models and DTOs.
 *
 * These structures map directly to database tables and provide
 * type-safe access to persisted data.
 */

use rusqlite::Row;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single language-tagged word
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    /// Surrogate key
    pub id: i64,
    /// The word itself
    pub word: String,
    /// Short language code, e.g. "en"
    pub language: String,
}

impl DictionaryEntry {
    /// Map a row selected as `id, word, language` starting at `offset`
    pub(crate) fn from_row_at(row: &Row, offset: usize) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(offset)?,
            word: row.get(offset + 1)?,
            language: row.get(offset + 2)?,
        })
    }
}

impl fmt::Display for DictionaryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.word, self.language)
    }
}

/// A translation pair of two entries, stored in canonical order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCombination {
    /// Surrogate key
    pub id: i64,
    /// Entry with the lower id
    pub word1: DictionaryEntry,
    /// Entry with the higher id
    pub word2: DictionaryEntry,
}

impl WordCombination {
    /// Ids of both referenced entries, in storage order
    pub fn entry_ids(&self) -> (i64, i64) {
        (self.word1.id, self.word2.id)
    }

    /// Map a row selected with [`COMBINATION_COLUMNS`]
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            word1: DictionaryEntry::from_row_at(row, 1)?,
            word2: DictionaryEntry::from_row_at(row, 4)?,
        })
    }
}

impl fmt::Display for WordCombination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.word1.word, self.word2.word)
    }
}

/// Column list and joins for selecting a hydrated combination
pub(crate) const COMBINATION_COLUMNS: &str = r#"
    wc.id,
    e1.id, e1.word, e1.language,
    e2.id, e2.word, e2.language
    FROM word_combinations wc
    JOIN dictionary_entries e1 ON e1.id = wc.word1_id
    JOIN dictionary_entries e2 ON e2.id = wc.word2_id
"#;

/// A named, shareable group of word combinations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    /// Surrogate key
    pub id: i64,
    /// Display name
    pub name: String,
    /// Free-form description, may be empty
    pub description: String,
    /// Username of the creator
    pub creator: String,
    /// Language pair the collection trains, e.g. "en-es"
    pub language_combination: String,
    /// Stored image path, if any
    pub image: Option<String>,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
}

impl Collection {
    pub(crate) fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            creator: row.get(3)?,
            language_combination: row.get(4)?,
            image: row.get(5)?,
            created_at: row.get(6)?,
        })
    }
}

/// Fields for creating a collection
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewCollection {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub creator: String,
    pub language_combination: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// Partial update of a collection; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language_combination: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}
