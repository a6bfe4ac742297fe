/*!
 * Collection service.
 *
 * Membership edits run in one transaction each. Combinations that lose
 * their last membership are released after the commit, in the same
 * post-commit style the combination manager uses for entries.
 */

use chrono::Utc;
use log::{debug, info, warn};
use rusqlite::{params, Connection, OptionalExtension};

use crate::database::models::COMBINATION_COLUMNS;
use crate::database::{Collection, CollectionUpdate, DatabaseConnection, NewCollection, WordCombination};
use crate::dictionary::{CombinationManager, CombinationPayload};
use crate::errors::{CollectionError, DictionaryError};
use crate::language_utils::parse_language_pair;
use crate::pagination::PageRequest;

/// Longest accepted collection name
pub const MAX_NAME_LEN: usize = 200;

/// Longest accepted creator name
pub const MAX_CREATOR_LEN: usize = 50;

const COLLECTION_COLUMNS: &str =
    "id, name, description, creator, language_combination, image, created_at";

/// Service managing collections and their memberships
#[derive(Clone)]
pub struct CollectionService {
    db: DatabaseConnection,
    combinations: CombinationManager,
}

impl CollectionService {
    pub fn new(db: DatabaseConnection, combinations: CombinationManager) -> Self {
        Self { db, combinations }
    }

    // ========================================================================
    // Collection operations
    // ========================================================================

    /// Create a new collection
    pub async fn create_collection(&self, new: NewCollection) -> Result<Collection, CollectionError> {
        let name = validate_text("name", &new.name, MAX_NAME_LEN)?;
        let creator = validate_text("creator", &new.creator, MAX_CREATOR_LEN)?;
        let language_combination = validate_language_combination(&new.language_combination)?;
        let description = new.description.trim().to_string();
        let image = new.image.filter(|i| !i.trim().is_empty());

        let collection = self
            .db
            .transaction_async(move |tx| {
                tx.execute(
                    r#"
                    INSERT INTO collections (name, description, creator, language_combination, image, created_at)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                    "#,
                    params![
                        name,
                        description,
                        creator,
                        language_combination,
                        image,
                        Utc::now().to_rfc3339()
                    ],
                )?;

                let id = tx.last_insert_rowid();
                Self::get_collection_sync(tx, id)?.ok_or(CollectionError::NotFound(id))
            })
            .await?;

        info!("Created collection {} '{}'", collection.id, collection.name);
        Ok(collection)
    }

    /// Get a collection by id
    pub async fn get_collection(&self, collection_id: i64) -> Result<Collection, CollectionError> {
        self.db
            .execute_async(move |conn| {
                Self::get_collection_sync(conn, collection_id)?
                    .ok_or(CollectionError::NotFound(collection_id))
            })
            .await
    }

    /// List collections ordered by id.
    ///
    /// A filter `"en-es"` matches collections training either `en-es` or
    /// `es-en`; a malformed filter yields an empty list.
    pub async fn list_collections(
        &self,
        language_pair: Option<&str>,
        page: PageRequest,
    ) -> Result<Vec<Collection>, CollectionError> {
        let combinations = match language_pair {
            Some(raw) => match parse_language_pair(raw) {
                Some((l1, l2)) => Some((format!("{}-{}", l1, l2), format!("{}-{}", l2, l1))),
                None => {
                    debug!("Ignoring malformed language pair '{}'", raw);
                    return Ok(Vec::new());
                }
            },
            None => None,
        };

        self.db
            .execute_async(move |conn| {
                let (forward, backward) = combinations.unzip();
                let sql = format!(
                    r#"
                    SELECT {} FROM collections
                    WHERE ?1 IS NULL OR language_combination IN (?1, ?2)
                    ORDER BY id
                    LIMIT ?3 OFFSET ?4
                    "#,
                    COLLECTION_COLUMNS
                );

                let mut stmt = conn.prepare(&sql)?;
                let collections = stmt
                    .query_map(
                        params![forward, backward, page.limit(), page.offset()],
                        Collection::from_row,
                    )?
                    .collect::<rusqlite::Result<Vec<_>>>()?;

                Ok(collections)
            })
            .await
    }

    /// Apply a partial update to a collection. Memberships are not touched.
    pub async fn update_collection(
        &self,
        collection_id: i64,
        changes: CollectionUpdate,
    ) -> Result<Collection, CollectionError> {
        let name = changes
            .name
            .as_deref()
            .map(|n| validate_text("name", n, MAX_NAME_LEN))
            .transpose()?;
        let language_combination = changes
            .language_combination
            .as_deref()
            .map(validate_language_combination)
            .transpose()?;
        let description = changes.description.map(|d| d.trim().to_string());
        let image = changes.image;

        let collection = self
            .db
            .transaction_async(move |tx| {
                let current = Self::get_collection_sync(tx, collection_id)?
                    .ok_or(CollectionError::NotFound(collection_id))?;

                tx.execute(
                    r#"
                    UPDATE collections
                    SET name = ?1, description = ?2, language_combination = ?3, image = ?4
                    WHERE id = ?5
                    "#,
                    params![
                        name.unwrap_or(current.name),
                        description.unwrap_or(current.description),
                        language_combination.unwrap_or(current.language_combination),
                        image.or(current.image),
                        collection_id
                    ],
                )?;

                Self::get_collection_sync(tx, collection_id)?
                    .ok_or(CollectionError::NotFound(collection_id))
            })
            .await?;

        info!("Updated collection {} '{}'", collection.id, collection.name);
        Ok(collection)
    }

    /// Delete a collection and release every combination that was only
    /// referenced by it.
    pub async fn delete_collection(&self, collection_id: i64) -> Result<Collection, CollectionError> {
        let (collection, member_ids) = self
            .db
            .transaction_async(move |tx| {
                let collection = Self::get_collection_sync(tx, collection_id)?
                    .ok_or(CollectionError::NotFound(collection_id))?;
                let member_ids = Self::member_ids_sync(tx, collection_id)?;

                tx.execute("DELETE FROM collections WHERE id = ?1", [collection_id])?;
                Ok::<_, CollectionError>((collection, member_ids))
            })
            .await?;

        info!(
            "Deleted collection {} '{}' with {} members",
            collection.id,
            collection.name,
            member_ids.len()
        );

        for combination_id in member_ids {
            self.release(combination_id).await;
        }

        Ok(collection)
    }

    // ========================================================================
    // Membership operations
    // ========================================================================

    /// Add combinations to a collection.
    ///
    /// Each payload reuses an existing combination when the pair is already
    /// stored. All payloads are applied in one transaction; if any resolves
    /// to a combination already in the collection nothing is written.
    pub async fn add_combinations(
        &self,
        collection_id: i64,
        payloads: Vec<CombinationPayload>,
    ) -> Result<Vec<WordCombination>, CollectionError> {
        let added = self
            .db
            .transaction_async(move |tx| {
                Self::require_collection(tx, collection_id)?;

                let mut added = Vec::with_capacity(payloads.len());
                for payload in &payloads {
                    let combination = CombinationManager::create_in(tx, payload, true)?;

                    if Self::is_member(tx, collection_id, combination.id)? {
                        return Err(CollectionError::AlreadyInCollection(combination.id));
                    }
                    Self::attach(tx, collection_id, combination.id)?;
                    added.push(combination);
                }

                Ok(added)
            })
            .await?;

        info!("Added {} combinations to collection {}", added.len(), collection_id);
        Ok(added)
    }

    /// List the combinations of a collection ordered by id
    pub async fn list_members(
        &self,
        collection_id: i64,
        page: PageRequest,
    ) -> Result<Vec<WordCombination>, CollectionError> {
        self.db
            .execute_async(move |conn| {
                Self::require_collection(conn, collection_id)?;

                let sql = format!(
                    r#"
                    SELECT {}
                    JOIN collection_combinations cc ON cc.combination_id = wc.id
                    WHERE cc.collection_id = ?1
                    ORDER BY wc.id
                    LIMIT ?2 OFFSET ?3
                    "#,
                    COMBINATION_COLUMNS
                );

                let mut stmt = conn.prepare(&sql)?;
                let members = stmt
                    .query_map(
                        params![collection_id, page.limit(), page.offset()],
                        WordCombination::from_row,
                    )?
                    .collect::<rusqlite::Result<Vec<_>>>()?;

                Ok(members)
            })
            .await
    }

    /// Replace a member with the combination for a new pair of words.
    ///
    /// The member itself is never modified since other collections may
    /// share it. The new combination is attached, the old one detached, and
    /// the old one released after commit.
    pub async fn update_member(
        &self,
        collection_id: i64,
        combination_id: i64,
        payload: CombinationPayload,
    ) -> Result<WordCombination, CollectionError> {
        let (combination, replaced) = self
            .db
            .transaction_async(move |tx| {
                Self::require_collection(tx, collection_id)?;
                Self::require_member(tx, collection_id, combination_id)?;

                let combination = CombinationManager::create_in(tx, &payload, true)?;
                if combination.id == combination_id {
                    return Ok((combination, false));
                }
                if Self::is_member(tx, collection_id, combination.id)? {
                    return Err(CollectionError::AlreadyInCollection(combination.id));
                }

                Self::attach(tx, collection_id, combination.id)?;
                Self::detach(tx, collection_id, combination_id)?;
                Ok((combination, true))
            })
            .await?;

        if replaced {
            info!(
                "Replaced combination {} with {} in collection {}",
                combination_id, combination.id, collection_id
            );
            self.release(combination_id).await;
        }

        Ok(combination)
    }

    /// Remove a combination from a collection and release it
    pub async fn remove_member(
        &self,
        collection_id: i64,
        combination_id: i64,
    ) -> Result<WordCombination, CollectionError> {
        let combination = self
            .db
            .transaction_async(move |tx| {
                Self::require_collection(tx, collection_id)?;
                Self::require_member(tx, collection_id, combination_id)?;

                let combination = CombinationManager::get_sync(tx, combination_id)?
                    .ok_or(DictionaryError::NotFound(combination_id))?;
                Self::detach(tx, collection_id, combination_id)?;
                Ok::<_, CollectionError>(combination)
            })
            .await?;

        info!("Removed combination {} from collection {}", combination_id, collection_id);
        self.release(combination_id).await;

        Ok(combination)
    }

    /// Delete the combination if no collection references it any more.
    ///
    /// Returns whether it was deleted. Failures are logged and reported as
    /// not deleted.
    pub async fn release(&self, combination_id: i64) -> bool {
        let memberships = self
            .db
            .execute_async(move |conn| Self::membership_count(conn, combination_id))
            .await;

        match memberships {
            Ok(0) => match self.combinations.delete(combination_id).await {
                Ok(_) => true,
                Err(DictionaryError::NotFound(_)) => false,
                Err(e) => {
                    warn!("Failed to release combination {}: {}", combination_id, e);
                    false
                }
            },
            Ok(count) => {
                debug!("Keeping combination {} ({} memberships)", combination_id, count);
                false
            }
            Err(e) => {
                warn!("Failed to count memberships of combination {}: {}", combination_id, e);
                false
            }
        }
    }

    // ========================================================================
    // Synchronous helpers for use within transactions
    // ========================================================================

    fn get_collection_sync(
        conn: &Connection,
        collection_id: i64,
    ) -> Result<Option<Collection>, CollectionError> {
        let sql = format!("SELECT {} FROM collections WHERE id = ?1", COLLECTION_COLUMNS);
        let collection = conn
            .query_row(&sql, [collection_id], Collection::from_row)
            .optional()?;
        Ok(collection)
    }

    fn require_collection(conn: &Connection, collection_id: i64) -> Result<(), CollectionError> {
        let exists: bool = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM collections WHERE id = ?1)",
            [collection_id],
            |row| row.get(0),
        )?;
        if exists {
            Ok(())
        } else {
            Err(CollectionError::NotFound(collection_id))
        }
    }

    fn require_member(
        conn: &Connection,
        collection_id: i64,
        combination_id: i64,
    ) -> Result<(), CollectionError> {
        if Self::is_member(conn, collection_id, combination_id)? {
            Ok(())
        } else {
            Err(CollectionError::MemberNotFound {
                collection_id,
                combination_id,
            })
        }
    }

    fn is_member(
        conn: &Connection,
        collection_id: i64,
        combination_id: i64,
    ) -> Result<bool, CollectionError> {
        let exists = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM collection_combinations WHERE collection_id = ?1 AND combination_id = ?2)",
            [collection_id, combination_id],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn attach(conn: &Connection, collection_id: i64, combination_id: i64) -> Result<(), CollectionError> {
        conn.execute(
            "INSERT INTO collection_combinations (collection_id, combination_id) VALUES (?1, ?2)",
            [collection_id, combination_id],
        )?;
        Ok(())
    }

    fn detach(conn: &Connection, collection_id: i64, combination_id: i64) -> Result<(), CollectionError> {
        conn.execute(
            "DELETE FROM collection_combinations WHERE collection_id = ?1 AND combination_id = ?2",
            [collection_id, combination_id],
        )?;
        Ok(())
    }

    fn member_ids_sync(conn: &Connection, collection_id: i64) -> Result<Vec<i64>, CollectionError> {
        let mut stmt = conn.prepare(
            "SELECT combination_id FROM collection_combinations WHERE collection_id = ?1 ORDER BY combination_id",
        )?;
        let ids = stmt
            .query_map([collection_id], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<i64>>>()?;
        Ok(ids)
    }

    fn membership_count(conn: &Connection, combination_id: i64) -> Result<i64, CollectionError> {
        let count = conn.query_row(
            "SELECT COUNT(*) FROM collection_combinations WHERE combination_id = ?1",
            [combination_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

fn validate_text(field: &str, value: &str, max_len: usize) -> Result<String, CollectionError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CollectionError::Format(format!("{} must not be empty", field)));
    }
    if value.chars().count() > max_len {
        return Err(CollectionError::Format(format!(
            "{} is longer than {} characters",
            field, max_len
        )));
    }
    Ok(value.to_string())
}

fn validate_language_combination(value: &str) -> Result<String, CollectionError> {
    match parse_language_pair(value) {
        Some((l1, l2)) => Ok(format!("{}-{}", l1, l2)),
        None => Err(CollectionError::Format(format!(
            "language combination '{}' is not of the form l1-l2",
            value
        ))),
    }
}
