/*!
 * Combination manager: lifecycle of word combinations.
 *
 * Keeps two invariants over the store:
 * - an unordered pair of entries is stored at most once;
 * - an entry left without references after an update or delete is removed.
 *
 * The primary mutation and the entry cleanup run as two separate
 * transactions. Cleanup starts only after the mutation committed, and a
 * failing cleanup is logged without undoing or failing the mutation.
 */

use log::{debug, info, warn};
use rusqlite::{params, Connection, OptionalExtension};

use super::entry_store::EntryStore;
use super::payload::{CanonicalPair, CombinationPayload};
use crate::database::models::COMBINATION_COLUMNS;
use crate::database::{DatabaseConnection, WordCombination};
use crate::errors::{constraint_kind, ConstraintKind, DictionaryError};
use crate::language_utils::parse_language_pair;
use crate::pagination::PageRequest;

/// Manager for creating, updating and deleting word combinations
#[derive(Clone)]
pub struct CombinationManager {
    db: DatabaseConnection,
    entries: EntryStore,
}

impl CombinationManager {
    pub fn new(db: DatabaseConnection) -> Self {
        let entries = EntryStore::new(db.clone());
        Self { db, entries }
    }

    /// The entry store used for resolution and cleanup
    pub fn entries(&self) -> &EntryStore {
        &self.entries
    }

    /// Create a combination for the two submitted words.
    ///
    /// With `allow_existing` an already stored pair is returned unchanged;
    /// without it the call fails with a conflict naming the stored id.
    pub async fn create(
        &self,
        payload: CombinationPayload,
        allow_existing: bool,
    ) -> Result<WordCombination, DictionaryError> {
        let combination = self
            .db
            .transaction_async(move |tx| Self::create_in(tx, &payload, allow_existing))
            .await?;

        info!("Stored word combination {} ({})", combination.id, combination);
        Ok(combination)
    }

    /// Transaction body of [`create`](Self::create), shared with callers that
    /// need it inside a larger transaction.
    pub fn create_in(
        conn: &Connection,
        payload: &CombinationPayload,
        allow_existing: bool,
    ) -> Result<WordCombination, DictionaryError> {
        let (first, second) = payload.validated()?;

        let word1 = EntryStore::resolve_or_create(conn, &first)?;
        let word2 = EntryStore::resolve_or_create(conn, &second)?;
        let pair = CanonicalPair::new(word1.id, word2.id);

        if let Some(existing) = Self::find_pair(conn, pair, None)? {
            if allow_existing {
                debug!("Reusing existing combination {}", existing.id);
                return Ok(existing);
            }
            return Err(DictionaryError::conflict(existing.id));
        }

        let insert = conn.execute(
            "INSERT INTO word_combinations (word1_id, word2_id) VALUES (?1, ?2)",
            params![pair.low, pair.high],
        );
        if let Err(e) = insert {
            return Err(Self::map_write_error(conn, e, pair, None));
        }

        let id = conn.last_insert_rowid();
        Self::get_sync(conn, id)?.ok_or(DictionaryError::NotFound(id))
    }

    /// Point an existing combination at a new pair of words.
    ///
    /// Entries the combination referenced before are cleaned up after the
    /// change committed. With `allow_existing`, a pair already stored under
    /// another combination is returned as is and the target stays untouched.
    pub async fn update(
        &self,
        combination_id: i64,
        payload: CombinationPayload,
        allow_existing: bool,
    ) -> Result<WordCombination, DictionaryError> {
        let (combination, previous) = self
            .db
            .transaction_async(move |tx| {
                Self::update_in(tx, combination_id, &payload, allow_existing)
            })
            .await?;

        if let Some((old1, old2)) = previous {
            info!("Updated word combination {} ({})", combination.id, combination);
            self.cleanup_after_commit(old1, old2).await;
        }

        Ok(combination)
    }

    /// Transaction body of [`update`](Self::update). Returns the resulting
    /// combination and, when a row was actually repointed, the entry ids it
    /// referenced before.
    fn update_in(
        conn: &Connection,
        combination_id: i64,
        payload: &CombinationPayload,
        allow_existing: bool,
    ) -> Result<(WordCombination, Option<(i64, i64)>), DictionaryError> {
        let current = Self::get_sync(conn, combination_id)?
            .ok_or(DictionaryError::NotFound(combination_id))?;
        let (old1, old2) = current.entry_ids();

        let (first, second) = payload.validated()?;
        let word1 = EntryStore::resolve_or_create(conn, &first)?;
        let word2 = EntryStore::resolve_or_create(conn, &second)?;
        let pair = CanonicalPair::new(word1.id, word2.id);

        if let Some(other) = Self::find_pair(conn, pair, Some(combination_id))? {
            if allow_existing {
                debug!(
                    "Pair already stored as combination {}, leaving {} untouched",
                    other.id, combination_id
                );
                return Ok((other, None));
            }
            return Err(DictionaryError::conflict(other.id));
        }

        if pair == CanonicalPair::new(old1, old2) {
            return Ok((current, None));
        }

        let update = conn.execute(
            "UPDATE word_combinations SET word1_id = ?1, word2_id = ?2 WHERE id = ?3",
            params![pair.low, pair.high, combination_id],
        );
        if let Err(e) = update {
            return Err(Self::map_write_error(conn, e, pair, Some(combination_id)));
        }

        let updated = Self::get_sync(conn, combination_id)?
            .ok_or(DictionaryError::NotFound(combination_id))?;
        Ok((updated, Some((old1, old2))))
    }

    /// Delete a combination and clean up the entries it referenced.
    ///
    /// Fails with an integrity error while another owner (a collection
    /// membership) still references the combination.
    pub async fn delete(&self, combination_id: i64) -> Result<WordCombination, DictionaryError> {
        let deleted = self
            .db
            .transaction_async(move |tx| {
                let current = Self::get_sync(tx, combination_id)?
                    .ok_or(DictionaryError::NotFound(combination_id))?;

                tx.execute("DELETE FROM word_combinations WHERE id = ?1", [combination_id])?;
                Ok::<_, DictionaryError>(current)
            })
            .await?;

        info!("Deleted word combination {} ({})", deleted.id, deleted);

        let (old1, old2) = deleted.entry_ids();
        self.cleanup_after_commit(old1, old2).await;

        Ok(deleted)
    }

    /// Get a combination by id
    pub async fn get(&self, combination_id: i64) -> Result<Option<WordCombination>, DictionaryError> {
        self.db
            .execute_async(move |conn| Self::get_sync(conn, combination_id))
            .await
    }

    /// List combinations ordered by id.
    ///
    /// `language_pair` has the form `"en-es"` and matches either word order;
    /// a malformed pair yields an empty list.
    pub async fn list(
        &self,
        language_pair: Option<&str>,
        page: PageRequest,
    ) -> Result<Vec<WordCombination>, DictionaryError> {
        let languages = match language_pair {
            Some(raw) => match parse_language_pair(raw) {
                Some(pair) => Some(pair),
                None => {
                    debug!("Ignoring malformed language pair '{}'", raw);
                    return Ok(Vec::new());
                }
            },
            None => None,
        };

        self.db
            .execute_async(move |conn| {
                let (lang1, lang2) = languages.unzip();
                let sql = format!(
                    r#"
                    SELECT {}
                    WHERE ?1 IS NULL
                       OR (e1.language = ?1 AND e2.language = ?2)
                       OR (e1.language = ?2 AND e2.language = ?1)
                    ORDER BY wc.id
                    LIMIT ?3 OFFSET ?4
                    "#,
                    COMBINATION_COLUMNS
                );

                let mut stmt = conn.prepare(&sql)?;
                let combinations = stmt
                    .query_map(
                        params![lang1, lang2, page.limit(), page.offset()],
                        WordCombination::from_row,
                    )?
                    .collect::<rusqlite::Result<Vec<_>>>()?;

                Ok(combinations)
            })
            .await
    }

    /// Get a combination by id (synchronous version for use within transactions)
    pub(crate) fn get_sync(
        conn: &Connection,
        combination_id: i64,
    ) -> Result<Option<WordCombination>, DictionaryError> {
        let sql = format!("SELECT {} WHERE wc.id = ?1", COMBINATION_COLUMNS);
        let combination = conn
            .query_row(&sql, [combination_id], WordCombination::from_row)
            .optional()?;
        Ok(combination)
    }

    /// Find the combination storing `pair`, ignoring `exclude_id`
    fn find_pair(
        conn: &Connection,
        pair: CanonicalPair,
        exclude_id: Option<i64>,
    ) -> Result<Option<WordCombination>, DictionaryError> {
        let sql = format!(
            "SELECT {} WHERE wc.word1_id = ?1 AND wc.word2_id = ?2 AND (?3 IS NULL OR wc.id <> ?3)",
            COMBINATION_COLUMNS
        );
        let combination = conn
            .query_row(
                &sql,
                params![pair.low, pair.high, exclude_id],
                WordCombination::from_row,
            )
            .optional()?;
        Ok(combination)
    }

    /// Translate a failed insert/update. A uniqueness violation means a
    /// concurrent writer stored the pair first.
    fn map_write_error(
        conn: &Connection,
        error: rusqlite::Error,
        pair: CanonicalPair,
        exclude_id: Option<i64>,
    ) -> DictionaryError {
        match constraint_kind(&error) {
            Some(ConstraintKind::Unique) => {
                let combination_id = Self::find_pair(conn, pair, exclude_id)
                    .ok()
                    .flatten()
                    .map(|c| c.id);
                DictionaryError::Conflict { combination_id }
            }
            _ => error.into(),
        }
    }

    /// Release both former entries of a committed change. Failures are only
    /// logged: the change itself already succeeded and an orphaned entry is
    /// inert until the next sweep.
    async fn cleanup_after_commit(&self, old1: i64, old2: i64) {
        let mut entry_ids = vec![old1];
        if old2 != old1 {
            entry_ids.push(old2);
        }

        match self.entries.cleanup_entries(entry_ids).await {
            Ok(removed) if removed > 0 => debug!("Removed {} orphaned entries", removed),
            Ok(_) => {}
            Err(e) => warn!(
                "Failed to clean up entries {} and {}: {}",
                old1, old2, e
            ),
        }
    }
}
