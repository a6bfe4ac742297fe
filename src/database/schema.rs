/*!
 * Database schema definitions.
 *
 * This module contains the SQL schema for all database tables and records
 * the schema version. Databases written by an unknown schema version are
 * refused rather than migrated.
 */

use anyhow::{Context, Result};
use log::{debug, info};
use rusqlite::Connection;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Initialize the database schema
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    let current_version = get_schema_version(conn)?;

    if current_version == 0 {
        info!("Initializing database schema v{}", SCHEMA_VERSION);
        create_all_tables(conn)?;
        set_schema_version(conn, SCHEMA_VERSION)?;
    } else if current_version != SCHEMA_VERSION {
        return Err(anyhow::anyhow!(
            "Unsupported schema version: {} (expected v{})",
            current_version,
            SCHEMA_VERSION
        ));
    } else {
        debug!("Database schema is up to date (v{})", current_version);
    }

    Ok(())
}

/// Get the current schema version from the database
fn get_schema_version(conn: &Connection) -> Result<i32> {
    let table_exists: bool = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='schema_version'",
            [],
            |row| row.get(0),
        )
        .context("Failed to check schema_version table existence")?;

    if !table_exists {
        return Ok(0);
    }

    let version: i32 = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .unwrap_or(0);

    Ok(version)
}

/// Set the schema version in the database
fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO schema_version (id, version, updated_at) VALUES (1, ?1, datetime('now'))",
        [version],
    )?;
    Ok(())
}

/// Create all database tables
fn create_all_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            version INTEGER NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )?;

    // One row per (word, language); the UNIQUE constraint backs get-or-create
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS dictionary_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            word TEXT NOT NULL,
            language TEXT NOT NULL,
            UNIQUE(word, language)
        );

        CREATE INDEX IF NOT EXISTS idx_entries_language ON dictionary_entries(language);
        "#,
    )?;

    // Pairs are stored in canonical order, so UNIQUE(word1_id, word2_id)
    // also rejects the mirrored pair
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS word_combinations (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            word1_id INTEGER NOT NULL REFERENCES dictionary_entries(id),
            word2_id INTEGER NOT NULL REFERENCES dictionary_entries(id),
            CHECK (word1_id <= word2_id),
            UNIQUE(word1_id, word2_id)
        );

        CREATE INDEX IF NOT EXISTS idx_combinations_word2 ON word_combinations(word2_id);
        "#,
    )?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS collections (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            creator TEXT NOT NULL,
            language_combination TEXT NOT NULL,
            image TEXT,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_collections_languages ON collections(language_combination);
        "#,
    )?;

    // Membership edge. Deleting a collection drops its edges; a combination
    // with edges left cannot be deleted.
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS collection_combinations (
            collection_id INTEGER NOT NULL REFERENCES collections(id) ON DELETE CASCADE,
            combination_id INTEGER NOT NULL REFERENCES word_combinations(id),
            PRIMARY KEY (collection_id, combination_id)
        );

        CREATE INDEX IF NOT EXISTS idx_membership_combination ON collection_combinations(combination_id);
        "#,
    )?;

    info!("Database schema created successfully");
    Ok(())
}
