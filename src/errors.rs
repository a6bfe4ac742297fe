/*!
 * Error types for the vocab-trainer application.
 *
 * This module contains custom error types for the dictionary and collection
 * layers, using the thiserror crate for ergonomic error definitions.
 */

use rusqlite::ErrorCode;
use thiserror::Error;

/// Kind of storage-level constraint a statement tripped over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    /// UNIQUE or PRIMARY KEY violation
    Unique,
    /// FOREIGN KEY, CHECK or any other constraint
    Integrity,
}

/// Classify a rusqlite error by its extended result code.
///
/// Returns `None` when the error is not a constraint violation at all.
pub fn constraint_kind(error: &rusqlite::Error) -> Option<ConstraintKind> {
    match error {
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation =>
        {
            match failure.extended_code {
                rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                | rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY => Some(ConstraintKind::Unique),
                _ => Some(ConstraintKind::Integrity),
            }
        }
        _ => None,
    }
}

/// Errors raised by the entry store and the combination manager
#[derive(Error, Debug)]
pub enum DictionaryError {
    /// Payload does not describe exactly two valid words
    #[error("Word combination has an invalid structure: {0}")]
    Format(String),

    /// The unordered pair is already stored
    #[error("{}", conflict_message(.combination_id))]
    Conflict {
        /// Id of the combination already holding the pair, when known
        combination_id: Option<i64>,
    },

    /// Storage rejected the change because of a referential constraint
    #[error("Integrity violation: {0}")]
    Integrity(String),

    /// No combination with this id
    #[error("Word combination {0} was not found")]
    NotFound(i64),

    /// Any other storage failure
    #[error("Storage error: {0}")]
    Storage(String),
}

fn conflict_message(combination_id: &Option<i64>) -> String {
    match combination_id {
        Some(id) => format!("Combination with ID {} already exists", id),
        None => "This word combination already exists".to_string(),
    }
}

impl DictionaryError {
    /// Shorthand for a conflict against a known combination
    pub fn conflict(combination_id: i64) -> Self {
        Self::Conflict {
            combination_id: Some(combination_id),
        }
    }
}

impl From<rusqlite::Error> for DictionaryError {
    fn from(error: rusqlite::Error) -> Self {
        match constraint_kind(&error) {
            Some(ConstraintKind::Unique) => Self::Conflict {
                combination_id: None,
            },
            Some(ConstraintKind::Integrity) => Self::Integrity(error.to_string()),
            None => Self::Storage(error.to_string()),
        }
    }
}

impl From<anyhow::Error> for DictionaryError {
    fn from(error: anyhow::Error) -> Self {
        Self::Storage(format!("{:#}", error))
    }
}

/// Errors raised by the collection service
#[derive(Error, Debug)]
pub enum CollectionError {
    /// No collection with this id
    #[error("Collection {0} was not found")]
    NotFound(i64),

    /// The combination is not a member of the collection
    #[error("Word combination {combination_id} is not part of collection {collection_id}")]
    MemberNotFound {
        /// Collection that was searched
        collection_id: i64,
        /// Combination that was expected in it
        combination_id: i64,
    },

    /// The combination is already a member of the collection
    #[error("Combination with ID {0} already exists in the collection")]
    AlreadyInCollection(i64),

    /// Collection fields failed validation
    #[error("Collection has an invalid structure: {0}")]
    Format(String),

    /// Error from the dictionary layer
    #[error(transparent)]
    Dictionary(#[from] DictionaryError),
}

impl From<rusqlite::Error> for CollectionError {
    fn from(error: rusqlite::Error) -> Self {
        Self::Dictionary(error.into())
    }
}

impl From<anyhow::Error> for CollectionError {
    fn from(error: anyhow::Error) -> Self {
        Self::Dictionary(error.into())
    }
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from the dictionary layer
    #[error("Dictionary error: {0}")]
    Dictionary(#[from] DictionaryError),

    /// Error from the collection layer
    #[error("Collection error: {0}")]
    Collection(#[from] CollectionError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
