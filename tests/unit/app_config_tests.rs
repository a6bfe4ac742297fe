/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use vocab_trainer::app_config::{Config, LogLevel};
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert!(config.database.path.is_none());
    assert_eq!(config.pagination.default_page_size, 10);
    assert_eq!(config.pagination.max_page_size, 100);
    assert_eq!(config.languages, vec!["en", "es", "fr", "de"]);
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();

    // Default page size above the maximum
    config.pagination.default_page_size = 500;
    assert!(config.validate().is_err());
    config.pagination.default_page_size = 10;

    // Zero maximum
    config.pagination.max_page_size = 0;
    assert!(config.validate().is_err());
    config.pagination.max_page_size = 100;

    // Unknown language code
    config.languages.push("zz".to_string());
    assert!(config.validate().is_err());
    config.languages.pop();

    // No languages at all
    config.languages.clear();
    assert!(config.validate().is_err());
}

/// Missing fields fall back to defaults
#[test]
fn test_config_deserialize_withPartialJson_shouldFillDefaults() -> Result<()> {
    let config: Config = serde_json::from_str(r#"{"log_level": "debug", "pagination": {"max_page_size": 50}}"#)?;

    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.pagination.max_page_size, 50);
    assert_eq!(config.pagination.default_page_size, 10);
    assert_eq!(config.languages.len(), 4);

    Ok(())
}

/// A missing file is created with defaults and read back unchanged
#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let created = Config::load_or_create(&path)?;
    assert!(path.exists());

    let loaded = Config::load_or_create(&path)?;
    assert_eq!(created, loaded);

    Ok(())
}

#[test]
fn test_loadOrCreate_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");
    std::fs::write(&path, "{ not json")?;

    assert!(Config::load_or_create(&path).is_err());

    Ok(())
}
