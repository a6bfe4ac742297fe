/*!
 * Tests for error types and conversions
 */

use vocab_trainer::errors::{AppError, CollectionError, DictionaryError};

#[test]
fn test_dictionaryError_format_shouldDisplayCorrectly() {
    let error = DictionaryError::Format("expected exactly 2 words, got 3".to_string());
    let display = format!("{}", error);
    assert!(display.contains("invalid structure"));
    assert!(display.contains("got 3"));
}

#[test]
fn test_dictionaryError_conflictWithoutId_shouldDisplayGenericMessage() {
    let error = DictionaryError::Conflict { combination_id: None };
    assert_eq!(error.to_string(), "This word combination already exists");
}

#[test]
fn test_collectionError_alreadyInCollection_shouldMentionId() {
    let error = CollectionError::AlreadyInCollection(12);
    assert_eq!(
        error.to_string(),
        "Combination with ID 12 already exists in the collection"
    );
}

#[test]
fn test_collectionError_fromDictionaryError_shouldBeTransparent() {
    let inner = DictionaryError::NotFound(4);
    let expected = inner.to_string();

    let error: CollectionError = inner.into();
    assert_eq!(error.to_string(), expected);
}

#[test]
fn test_appError_fromCollectionError_shouldWrap() {
    let error: AppError = CollectionError::NotFound(9).into();
    let display = format!("{}", error);
    assert!(display.contains("Collection error"));
    assert!(display.contains("9"));
}

#[test]
fn test_appError_fromIoError_shouldBecomeFileError() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "conf.json missing");
    let error: AppError = io_error.into();
    assert!(matches!(error, AppError::File(_)));
}

#[test]
fn test_dictionaryError_fromAnyhow_shouldBecomeStorage() {
    let error: DictionaryError = anyhow::anyhow!("disk full").into();
    assert!(matches!(error, DictionaryError::Storage(ref m) if m.contains("disk full")));
}
