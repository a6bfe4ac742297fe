/*!
 * Tests for the response envelope and error code mapping
 */

use vocab_trainer::api::{ApiError, ApiResponse};
use vocab_trainer::errors::{CollectionError, DictionaryError};

#[test]
fn test_dictionaryErrors_shouldMapToStatusAndCode() {
    let cases = [
        (DictionaryError::Format("x".to_string()), 400, "word_combination_format"),
        (DictionaryError::conflict(1), 409, "word_combination_already_exists"),
        (DictionaryError::Integrity("fk".to_string()), 409, "word_combination_integrity"),
        (DictionaryError::NotFound(1), 404, "word_combination_not_found"),
        (DictionaryError::Storage("io".to_string()), 500, "internal_error"),
    ];

    for (error, status, code) in cases {
        assert_eq!(error.status_code(), status, "status for {:?}", error);
        assert_eq!(error.error_code(), code, "code for {:?}", error);
    }
}

#[test]
fn test_collectionErrors_shouldMapToStatusAndCode() {
    let member_missing = CollectionError::MemberNotFound {
        collection_id: 1,
        combination_id: 2,
    };

    assert_eq!(CollectionError::NotFound(1).error_code(), "collection_not_found");
    assert_eq!(member_missing.status_code(), 404);
    assert_eq!(member_missing.error_code(), "word_combination_of_collection_not_found");
    assert_eq!(CollectionError::AlreadyInCollection(3).status_code(), 409);
    assert_eq!(CollectionError::Format("x".to_string()).status_code(), 400);
}

#[test]
fn test_errorEnvelope_shouldSerializeNullData() {
    let response: ApiResponse<()> = ApiResponse::from_error(&CollectionError::NotFound(8));
    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(json["status"], 404);
    assert_eq!(json["message"], "Collection 8 was not found");
    assert!(json["data"].is_null());
}

#[test]
fn test_successEnvelopes_shouldUseExpectedStatus() {
    assert_eq!(ApiResponse::ok("fine", 1).status, 200);
    assert_eq!(ApiResponse::created("made", 1).status, 201);
    assert!(ApiResponse::created("made", 1).is_success());
    assert_eq!(ApiResponse::deleted("gone", 1).status, 204);
}
