/*!
 * # vocab-trainer
 *
 * Storage backend of a vocabulary trainer: language-tagged dictionary
 * entries, word combinations pairing two entries, and collections grouping
 * combinations.
 *
 * ## Features
 *
 * - Get-or-create of dictionary entries by exact (word, language)
 * - Word combinations stored once per unordered pair of entries
 * - Automatic removal of entries no combination references any more
 * - Collections sharing combinations, released when their last
 *   membership goes away
 * - SQLite persistence with foreign-key enforcement
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `database`: SQLite connection, schema and row models
 * - `dictionary`: Entry store and combination manager:
 *   - `dictionary::payload`: Two-word request shape and canonical ordering
 *   - `dictionary::entry_store`: Entry resolution and orphan cleanup
 *   - `dictionary::combinations`: Combination lifecycle
 * - `collection`: Collections and their memberships
 * - `api`: Response envelope and error codes
 * - `pagination`: Page requests
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]
// Test names follow the test_subject_condition_shouldOutcome pattern
#![cfg_attr(test, allow(non_snake_case))]

// Public modules
pub mod app_config;
pub mod api;
pub mod app_controller;
pub mod collection;
pub mod database;
pub mod dictionary;
pub mod errors;
pub mod language_utils;
pub mod pagination;

// Re-export main types for easier usage
pub use app_config::Config;
pub use api::{ApiError, ApiResponse};
pub use app_controller::Controller;
pub use collection::CollectionService;
pub use database::{Collection, DatabaseConnection, DictionaryEntry, WordCombination};
pub use dictionary::{CombinationManager, CombinationPayload, EntryStore, WordInput};
pub use errors::{AppError, CollectionError, DictionaryError};
pub use language_utils::{get_language_name, parse_language_pair};
pub use pagination::PageRequest;
