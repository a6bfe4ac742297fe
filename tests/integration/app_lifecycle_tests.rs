/*!
 * Integration tests for application lifecycle
 */

use anyhow::Result;
use tokio_test;
use vocab_trainer::app_config::Config;
use vocab_trainer::app_controller::Controller;
use vocab_trainer::database::DatabaseConnection;
use crate::common::{self, new_collection, pair};

/// Test the controller initialization with default config
#[test]
fn test_controller_initialization_withDefaultConfig_shouldSucceed() -> Result<()> {
    let controller = Controller::new_for_test()?;

    let stats = controller.stats()?;
    assert_eq!(stats.entry_count, 0);
    assert_eq!(stats.combination_count, 0);
    assert_eq!(stats.collection_count, 0);

    Ok(())
}

/// Page requests follow the configured bounds
#[test]
fn test_controller_page_withCustomConfig_shouldClampToConfiguredMax() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut config = Config::default();
    config.database.path = Some(temp_dir.path().join("vocab.db").to_string_lossy().to_string());
    config.pagination.default_page_size = 5;
    config.pagination.max_page_size = 20;

    let controller = Controller::with_config(config)?;

    assert_eq!(controller.page(None, None).page_size, 5);
    assert_eq!(controller.page(None, Some(1000)).page_size, 20);

    Ok(())
}

/// Data written through one controller is visible after reopening the file
#[test]
fn test_controller_reopenFileDatabase_shouldKeepData() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let db_path = temp_dir.path().join("vocab.db");

    let mut config = Config::default();
    config.database.path = Some(db_path.to_string_lossy().to_string());

    let created = tokio_test::block_on(async {
        let controller = Controller::with_config(config.clone())?;
        let collection = controller
            .collections()
            .create_collection(new_collection("Travel", "en-de"))
            .await?;
        controller
            .collections()
            .add_combinations(collection.id, vec![pair(("train", "en"), ("Zug", "de"))])
            .await?;
        Ok::<_, anyhow::Error>(collection)
    })?;

    let reopened = Controller::with_config(config)?;
    let members = tokio_test::block_on(async {
        reopened
            .collections()
            .list_members(created.id, reopened.page(None, None))
            .await
    })?;

    assert_eq!(members.len(), 1);
    assert_eq!(members[0].to_string(), "train - Zug");
    assert!(reopened.stats()?.file_size_bytes > 0);

    Ok(())
}

/// A database written with an unknown schema version is refused
#[test]
fn test_database_withUnknownSchemaVersion_shouldFailToOpen() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let db_path = temp_dir.path().join("vocab.db");

    {
        let db = DatabaseConnection::new(&db_path)?;
        db.execute(|conn| {
            conn.execute("UPDATE schema_version SET version = 99", [])
                .map_err(anyhow::Error::from)
        })?;
    }

    assert!(DatabaseConnection::new(&db_path).is_err());

    Ok(())
}
