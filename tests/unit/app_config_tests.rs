/*!
 * Tests for configuration loading
 */

use anyhow::Result;
use doctrans::app_config::{Config, LogLevel};
use crate::common;

/// Test that a missing config file is created with defaults
#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("doctrans.json");

    let config = Config::load_or_create(&path)?;

    assert!(path.exists());
    assert_eq!(config.translation.model, "gpt-4o-mini");
    assert_eq!(config.pipeline.language_retries, 3);
    assert_eq!(config.pipeline.total_attempts(), 4);
    assert!(config.validate().is_ok());
    Ok(())
}

/// Test that saved values survive a reload
#[test]
fn test_loadOrCreate_withSavedFile_shouldReadItBack() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("custom.json");

    let mut config = Config::default();
    config.translation.model = "gpt-4o".to_string();
    config.pipeline.troubleshoot_sections = 5;
    config.log_level = LogLevel::Debug;
    config.save(&path)?;

    let loaded = Config::load_or_create(&path)?;
    assert_eq!(loaded.translation.model, "gpt-4o");
    assert_eq!(loaded.pipeline.troubleshoot_sections, 5);
    assert_eq!(loaded.effective_log_level(), LogLevel::Debug);
    Ok(())
}

/// Test that a translate run requires an API key
#[test]
fn test_validateForTranslation_withoutApiKey_shouldFail() {
    let mut config = Config::default();
    assert!(config.validate_for_translation().is_err());

    config.apply_env(|key| (key == "TRANSLATION_API_KEY").then(|| "sk-test".to_string()));
    assert!(config.validate_for_translation().is_ok());
}

/// Test that an unparseable config file is an error rather than a silent default
#[test]
fn test_loadOrCreate_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "broken.json", "{ not json")?;

    assert!(Config::load_or_create(&path).is_err());
    Ok(())
}

/// Test that a partial file keeps defaults for fields it does not name
#[test]
fn test_loadOrCreate_withPartialFile_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "partial.json", r#"{"translation": {"cache_enabled": false}}"#)?;

    let config = Config::load_or_create(&path)?;

    assert!(!config.translation.cache_enabled);
    assert_eq!(config.translation.max_retries, 3);
    assert_eq!(config.validation.required_fields, vec!["title", "description"]);
    assert_eq!(config.validation.product_fields, vec!["products", "product", "platform"]);
    Ok(())
}
