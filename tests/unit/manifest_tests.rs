/*!
 * Tests for task manifest parsing
 */

use anyhow::Result;
use doctrans::manifest::{Platform, TaskManifest};
use crate::common;

const MANIFEST: &str = r#"{
  "timestamp": "2026-10-15T06:00:00Z",
  "targetDate": "2026-10-14",
  "totalArticles": 2,
  "totalTasks": 4,
  "tasks": [
    {
      "title": "Add Watermark",
      "product": "pdf",
      "platform": "java",
      "articlePath": "add-watermark.md",
      "fullPath": "content/en/pdf/java/add-watermark.md",
      "targetLanguages": ["fr", "de", "FR"]
    },
    {
      "title": "Merge Documents",
      "product": "words",
      "platform": "net",
      "articlePath": "merge/merge-documents.md",
      "fullPath": "content/en/words/net/merge/merge-documents.md",
      "targetLanguages": ["zh_hant", "hy"]
    }
  ]
}"#;

/// Test that a manifest file is read with its tasks in order
#[test]
fn test_load_withManifestFile_shouldParseTasks() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "tasks.json", MANIFEST)?;

    let manifest = TaskManifest::load(&path)?;

    assert_eq!(manifest.target_date, "2026-10-14");
    assert_eq!(manifest.tasks.len(), 2);
    assert_eq!(manifest.tasks[1].article.platform, Platform::Net);
    assert_eq!(manifest.tasks[1].article.article_path, "merge/merge-documents.md");
    Ok(())
}

/// Test that language codes are normalized and de-duplicated
#[test]
fn test_languages_withDuplicatesAndUnderscore_shouldNormalize() -> Result<()> {
    let manifest = TaskManifest::from_json(MANIFEST)?;

    assert_eq!(manifest.tasks[0].languages(), vec!["fr", "de"]);
    assert_eq!(manifest.tasks[1].languages(), vec!["zh-hant", "hy"]);
    assert_eq!(manifest.unit_count(), 4);
    Ok(())
}

/// Test that a missing manifest is a file error
#[test]
fn test_load_withMissingFile_shouldFail() {
    let result = TaskManifest::load("/nonexistent/tasks.json");
    assert!(matches!(result, Err(doctrans::AppError::File(_))));
}
