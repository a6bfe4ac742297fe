/*!
 * Response envelope and error mapping for outer surfaces.
 *
 * Every response has the shape `{"status": u16, "message": String, "data": T | null}`.
 * Errors carry a stable code string next to their HTTP status.
 */

use serde::{Deserialize, Serialize};

use crate::errors::{CollectionError, DictionaryError};

/// Status and code mapping for errors surfaced to callers
pub trait ApiError: std::error::Error {
    /// HTTP status code
    fn status_code(&self) -> u16;

    /// Stable machine-readable error code
    fn error_code(&self) -> &'static str;
}

impl ApiError for DictionaryError {
    fn status_code(&self) -> u16 {
        match self {
            DictionaryError::Format(_) => 400,
            DictionaryError::Conflict { .. } => 409,
            DictionaryError::Integrity(_) => 409,
            DictionaryError::NotFound(_) => 404,
            DictionaryError::Storage(_) => 500,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            DictionaryError::Format(_) => "word_combination_format",
            DictionaryError::Conflict { .. } => "word_combination_already_exists",
            DictionaryError::Integrity(_) => "word_combination_integrity",
            DictionaryError::NotFound(_) => "word_combination_not_found",
            DictionaryError::Storage(_) => "internal_error",
        }
    }
}

impl ApiError for CollectionError {
    fn status_code(&self) -> u16 {
        match self {
            CollectionError::NotFound(_) => 404,
            CollectionError::MemberNotFound { .. } => 404,
            CollectionError::AlreadyInCollection(_) => 409,
            CollectionError::Format(_) => 400,
            CollectionError::Dictionary(e) => e.status_code(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            CollectionError::NotFound(_) => "collection_not_found",
            CollectionError::MemberNotFound { .. } => "word_combination_of_collection_not_found",
            CollectionError::AlreadyInCollection(_) => "word_combination_already_in_collection",
            CollectionError::Format(_) => "collection_format",
            CollectionError::Dictionary(e) => e.error_code(),
        }
    }
}

/// Uniform response envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: u16,
    pub message: String,
    pub data: Option<T>,
}

/// Payload of a delete response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deleted {
    pub deleted_id: i64,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            status: 200,
            message: message.into(),
            data: Some(data),
        }
    }

    pub fn created(message: impl Into<String>, data: T) -> Self {
        Self {
            status: 201,
            message: message.into(),
            data: Some(data),
        }
    }

    /// Error envelope; `data` is always null
    pub fn from_error<E: ApiError + ?Sized>(error: &E) -> Self {
        Self {
            status: error.status_code(),
            message: error.to_string(),
            data: None,
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl ApiResponse<Deleted> {
    pub fn deleted(message: impl Into<String>, deleted_id: i64) -> Self {
        Self {
            status: 204,
            message: message.into(),
            data: Some(Deleted { deleted_id }),
        }
    }
}
