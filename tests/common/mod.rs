/*!
 * Common test utilities for the doctrans test suite
 */

use std::fs;
use std::path::{Path, PathBuf};
use anyhow::Result;
use tempfile::TempDir;

use doctrans::app_config::PipelineConfig;
use doctrans::manifest::{Article, Platform, TranslationTask};

// Stub translators plugged into the orchestrator
pub mod stub_translators;

/// Article used by most pipeline scenarios
pub const WATERMARK_ARTICLE: &str = "---\ntitle: \"Add Watermark to PDF\"\ndescription: Stamp every page\nproducts: pdf\nweight: 10\nkeywords: [watermark, stamp]\n---\n\n## Step 1\nDo X.\n\n{{< gist user id >}}\n\n```java\nWatermark watermark = new Watermark(\"DRAFT\");\ndocument.add(watermark);\n```\n\n- Open the `Document`\n- Save it to https://example.com/out.pdf";

/// Route log output through the test harness; safe to call from every test
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Pipeline settings writing under `content_root` with no backoff sleeps
pub fn test_pipeline_config(content_root: &Path) -> PipelineConfig {
    PipelineConfig {
        content_root: content_root.to_path_buf(),
        backoff_base_ms: 0,
        backoff_max_ms: 0,
        ..PipelineConfig::default()
    }
}

/// Writes `content` as an English source article and returns its task
pub fn create_task(content_root: &Path, article_path: &str, content: &str, languages: &[&str]) -> Result<TranslationTask> {
    let source = create_test_file(content_root, &format!("en/pdf/java/{}", article_path), content)?;
    Ok(TranslationTask::new(
        Article {
            full_path: source.to_string_lossy().to_string(),
            product: "pdf".to_string(),
            platform: Platform::Java,
            article_path: article_path.to_string(),
            title: "Add Watermark".to_string(),
        },
        languages.iter().map(|l| l.to_string()).collect(),
    ))
}

/// Expected output file of a task in a language
pub fn output_path(content_root: &Path, language: &str, article_path: &str) -> PathBuf {
    content_root.join(language).join("pdf").join("java").join(article_path)
}
