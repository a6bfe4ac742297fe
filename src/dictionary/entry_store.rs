/*!
 * Entry store: get-or-create and reference-counted deletion of dictionary
 * entries.
 *
 * Every entry write goes through this module. Entries are only ever deleted
 * here, once no word combination references them any more.
 */

use log::debug;
use rusqlite::{params, Connection, OptionalExtension};

use super::payload::WordInput;
use crate::database::{DatabaseConnection, DictionaryEntry};
use crate::errors::DictionaryError;
use crate::pagination::PageRequest;

/// Store for dictionary entries
#[derive(Clone)]
pub struct EntryStore {
    db: DatabaseConnection,
}

impl EntryStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Look up the entry for an exact (word, language) match, creating it
    /// when none exists. Runs inside the caller's transaction.
    pub fn resolve_or_create(
        conn: &Connection,
        input: &WordInput,
    ) -> Result<DictionaryEntry, DictionaryError> {
        let inserted = conn.execute(
            "INSERT INTO dictionary_entries (word, language) VALUES (?1, ?2)
             ON CONFLICT(word, language) DO NOTHING",
            params![input.word, input.language],
        )?;

        let entry = conn.query_row(
            "SELECT id, word, language FROM dictionary_entries WHERE word = ?1 AND language = ?2",
            params![input.word, input.language],
            |row| DictionaryEntry::from_row_at(row, 0),
        )?;

        if inserted > 0 {
            debug!("Created dictionary entry {} for '{}'", entry.id, entry);
        }

        Ok(entry)
    }

    /// Number of combination slots pointing at the entry
    pub fn reference_count(conn: &Connection, entry_id: i64) -> Result<i64, DictionaryError> {
        let count = conn.query_row(
            "SELECT
                (SELECT COUNT(*) FROM word_combinations WHERE word1_id = ?1) +
                (SELECT COUNT(*) FROM word_combinations WHERE word2_id = ?1)",
            [entry_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Delete the entry if nothing references it. Returns whether it was
    /// deleted; an already missing entry counts as not deleted.
    pub fn cleanup_if_orphaned(conn: &Connection, entry_id: i64) -> Result<bool, DictionaryError> {
        let references = Self::reference_count(conn, entry_id)?;
        if references > 0 {
            debug!("Keeping entry {} ({} references)", entry_id, references);
            return Ok(false);
        }

        let deleted = conn.execute("DELETE FROM dictionary_entries WHERE id = ?1", [entry_id])?;
        if deleted > 0 {
            debug!("Deleted orphaned entry {}", entry_id);
        }
        Ok(deleted > 0)
    }

    /// Run orphan cleanup for each id in its own transaction and return how
    /// many entries were removed.
    pub async fn cleanup_entries(&self, entry_ids: Vec<i64>) -> Result<usize, DictionaryError> {
        self.db
            .transaction_async(move |tx| {
                let mut removed = 0;
                for entry_id in entry_ids {
                    if Self::cleanup_if_orphaned(tx, entry_id)? {
                        removed += 1;
                    }
                }
                Ok(removed)
            })
            .await
    }

    /// Delete every entry without references
    pub async fn sweep_orphans(&self) -> Result<usize, DictionaryError> {
        self.db
            .transaction_async(|tx| {
                let removed = tx.execute(
                    r#"
                    DELETE FROM dictionary_entries
                    WHERE NOT EXISTS (
                        SELECT 1 FROM word_combinations wc
                        WHERE wc.word1_id = dictionary_entries.id
                           OR wc.word2_id = dictionary_entries.id
                    )
                    "#,
                    [],
                )?;
                Ok(removed)
            })
            .await
    }

    /// Get an entry by id
    pub async fn get(&self, entry_id: i64) -> Result<Option<DictionaryEntry>, DictionaryError> {
        self.db
            .execute_async(move |conn| {
                let entry = conn
                    .query_row(
                        "SELECT id, word, language FROM dictionary_entries WHERE id = ?1",
                        [entry_id],
                        |row| DictionaryEntry::from_row_at(row, 0),
                    )
                    .optional()?;
                Ok(entry)
            })
            .await
    }

    /// Find an entry by exact word and language
    pub async fn find(
        &self,
        word: &str,
        language: &str,
    ) -> Result<Option<DictionaryEntry>, DictionaryError> {
        let word = word.to_string();
        let language = language.to_string();

        self.db
            .execute_async(move |conn| {
                let entry = conn
                    .query_row(
                        "SELECT id, word, language FROM dictionary_entries WHERE word = ?1 AND language = ?2",
                        params![word, language],
                        |row| DictionaryEntry::from_row_at(row, 0),
                    )
                    .optional()?;
                Ok(entry)
            })
            .await
    }

    /// List entries ordered by id, optionally restricted to one language
    pub async fn list(
        &self,
        language: Option<&str>,
        page: PageRequest,
    ) -> Result<Vec<DictionaryEntry>, DictionaryError> {
        let language = language.map(str::to_string);

        self.db
            .execute_async(move |conn| {
                let mut stmt = conn.prepare(
                    r#"
                    SELECT id, word, language FROM dictionary_entries
                    WHERE ?1 IS NULL OR language = ?1
                    ORDER BY id
                    LIMIT ?2 OFFSET ?3
                    "#,
                )?;

                let entries = stmt
                    .query_map(params![language, page.limit(), page.offset()], |row| {
                        DictionaryEntry::from_row_at(row, 0)
                    })?
                    .collect::<rusqlite::Result<Vec<_>>>()?;

                Ok(entries)
            })
            .await
    }

    /// Total number of entries
    pub async fn count(&self) -> Result<i64, DictionaryError> {
        self.db
            .execute_async(|conn| {
                let count = conn.query_row("SELECT COUNT(*) FROM dictionary_entries", [], |row| {
                    row.get(0)
                })?;
                Ok(count)
            })
            .await
    }
}
