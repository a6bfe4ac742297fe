/*!
 * Database module for persistent storage of the vocabulary.
 *
 * This module provides SQLite-based persistence for:
 * - Dictionary entries (word + language)
 * - Word combinations referencing two entries
 * - Collections and their combination memberships
 */

pub mod schema;
pub mod connection;
pub mod models;

// Re-export main types
pub use connection::{DatabaseConnection, DatabaseStats};
pub use models::{Collection, CollectionUpdate, DictionaryEntry, NewCollection, WordCombination};
