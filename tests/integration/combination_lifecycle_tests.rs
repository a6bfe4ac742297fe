/*!
 * Integration tests for the word combination lifecycle
 */

use anyhow::Result;
use vocab_trainer::dictionary::{CombinationPayload, WordInput};
use vocab_trainer::errors::DictionaryError;
use vocab_trainer::pagination::PageRequest;
use crate::common::{self, pair};

/// Creating (A,B) then (B,A) keeps one row and reports the stored id
#[tokio::test]
async fn test_create_mirroredDuplicate_shouldKeepSingleRow() -> Result<()> {
    let controller = common::create_test_controller()?;
    let manager = controller.combinations();

    let created = manager.create(pair(("hello", "en"), ("hola", "es")), false).await?;
    let duplicate = manager.create(pair(("hola", "es"), ("hello", "en")), false).await;

    match duplicate {
        Err(DictionaryError::Conflict { combination_id }) => assert_eq!(combination_id, Some(created.id)),
        other => panic!("Expected conflict, got {:?}", other),
    }
    assert_eq!(manager.list(None, PageRequest::default()).await?.len(), 1);
    assert_eq!(controller.stats()?.combination_count, 1);

    Ok(())
}

/// Creating with allow_existing twice returns the same combination
#[tokio::test]
async fn test_create_withAllowExisting_shouldBeIdempotent() -> Result<()> {
    let controller = common::create_test_controller()?;
    let manager = controller.combinations();

    let first = manager.create(pair(("hello", "en"), ("hola", "es")), true).await?;
    let second = manager.create(pair(("hello", "en"), ("hola", "es")), true).await?;

    assert_eq!(first.id, second.id);
    assert_eq!(controller.stats()?.combination_count, 1);
    assert_eq!(controller.stats()?.entry_count, 2);

    Ok(())
}

/// Deleting the only combination removes both entries
#[tokio::test]
async fn test_delete_lastReference_shouldRemoveEntries() -> Result<()> {
    let controller = common::create_test_controller()?;
    let manager = controller.combinations();

    let created = manager.create(pair(("hello", "en"), ("hola", "es")), false).await?;
    let deleted = manager.delete(created.id).await?;

    assert_eq!(deleted.id, created.id);
    assert!(manager.get(created.id).await?.is_none());
    assert_eq!(controller.entries().count().await?, 0);

    Ok(())
}

/// An entry shared with another combination survives the delete
#[tokio::test]
async fn test_delete_sharedEntry_shouldBeRetained() -> Result<()> {
    let controller = common::create_test_controller()?;
    let manager = controller.combinations();

    let ab = manager.create(pair(("hello", "en"), ("hola", "es")), false).await?;
    manager.create(pair(("hello", "en"), ("salut", "fr")), false).await?;

    manager.delete(ab.id).await?;

    assert!(controller.entries().find("hello", "en").await?.is_some());
    assert!(controller.entries().find("hola", "es").await?.is_none());
    assert!(controller.entries().find("salut", "fr").await?.is_some());

    Ok(())
}

/// Re-linking (A,B) to (A,D) creates D, removes B and keeps the row id
#[tokio::test]
async fn test_update_relink_shouldCleanUpOldEntry() -> Result<()> {
    let controller = common::create_test_controller()?;
    let manager = controller.combinations();

    let created = manager.create(pair(("hello", "en"), ("hola", "es")), false).await?;
    let updated = manager
        .update(created.id, pair(("hello", "en"), ("bonjour", "fr")), false)
        .await?;

    assert_eq!(updated.id, created.id);
    let words = [updated.word1.word.as_str(), updated.word2.word.as_str()];
    assert!(words.contains(&"hello"));
    assert!(words.contains(&"bonjour"));
    assert!(updated.word1.id <= updated.word2.id);

    assert!(controller.entries().find("hola", "es").await?.is_none());
    assert!(controller.entries().find("bonjour", "fr").await?.is_some());
    assert_eq!(controller.entries().count().await?, 2);

    Ok(())
}

/// Updating onto another combination's pair fails and leaves the target alone
#[tokio::test]
async fn test_update_ontoExistingPair_shouldConflictAndKeepTarget() -> Result<()> {
    let controller = common::create_test_controller()?;
    let manager = controller.combinations();

    let ab = manager.create(pair(("hello", "en"), ("hola", "es")), false).await?;
    let cd = manager.create(pair(("cat", "en"), ("gato", "es")), false).await?;

    let result = manager
        .update(cd.id, pair(("hola", "es"), ("hello", "en")), false)
        .await;

    match result {
        Err(DictionaryError::Conflict { combination_id }) => assert_eq!(combination_id, Some(ab.id)),
        other => panic!("Expected conflict, got {:?}", other),
    }
    assert_eq!(manager.get(cd.id).await?, Some(cd));
    assert_eq!(controller.entries().count().await?, 4);

    Ok(())
}

/// Malformed payloads are rejected before anything is written
#[tokio::test]
async fn test_create_withWrongWordCount_shouldWriteNothing() -> Result<()> {
    let controller = common::create_test_controller()?;
    let manager = controller.combinations();

    let one = CombinationPayload::new(vec![WordInput::new("hello", "en")]);
    let three = CombinationPayload::new(vec![
        WordInput::new("hello", "en"),
        WordInput::new("hola", "es"),
        WordInput::new("salut", "fr"),
    ]);

    assert!(matches!(manager.create(one, false).await, Err(DictionaryError::Format(_))));
    assert!(matches!(manager.create(three, true).await, Err(DictionaryError::Format(_))));
    assert!(matches!(
        manager.create(CombinationPayload::default(), false).await,
        Err(DictionaryError::Format(_))
    ));

    let stats = controller.stats()?;
    assert_eq!(stats.entry_count, 0);
    assert_eq!(stats.combination_count, 0);

    Ok(())
}

/// The same word in different languages resolves to different entries
#[tokio::test]
async fn test_create_sameWordDifferentLanguages_shouldCreateTwoEntries() -> Result<()> {
    let controller = common::create_test_controller()?;

    let combination = controller
        .combinations()
        .create(pair(("chat", "en"), ("chat", "fr")), false)
        .await?;

    assert_ne!(combination.word1.id, combination.word2.id);
    assert_eq!(controller.entries().count().await?, 2);

    Ok(())
}

/// Pages are zero-based and ordered by id
#[tokio::test]
async fn test_list_withPagination_shouldReturnRequestedSlice() -> Result<()> {
    let controller = common::create_test_controller()?;
    let manager = controller.combinations();

    for (en, es) in [("one", "uno"), ("two", "dos"), ("three", "tres")] {
        manager.create(pair((en, "en"), (es, "es")), false).await?;
    }

    let first = manager.list(Some("en-es"), controller.page(Some(0), Some(2))).await?;
    let second = manager.list(Some("es-en"), controller.page(Some(1), Some(2))).await?;
    let negative = manager.list(None, controller.page(Some(-5), Some(2))).await?;

    assert_eq!(first.len(), 2);
    assert_eq!(second.len(), 1);
    assert!(first[0].id < first[1].id);
    assert_eq!(negative, first);

    Ok(())
}
