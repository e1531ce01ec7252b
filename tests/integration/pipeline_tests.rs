/*!
 * End-to-end orchestrator scenarios with stub translators
 */

use std::fs;
use std::sync::atomic::Ordering;
use anyhow::Result;

use doctrans::app_config::TranslationConfig;
use doctrans::app_controller::translate_manifest;
use doctrans::document::{parse, FrontMatter};
use doctrans::manifest::TaskManifest;
use doctrans::providers::mock::MockProvider;
use doctrans::translation::pipeline::ProgressCallback;
use doctrans::translation::{ArticleTranslator, ContentKind, TranslationClient};
use doctrans::validation::{StructuralValidator, passed};

use crate::common::stub_translators::{
    FailingLanguageTranslator, SpyTranslator, TroubleshootOnlyTranslator, UppercaseTranslator,
};
use crate::common::{self, WATERMARK_ARTICLE};

const SIMPLE_ARTICLE: &str = "---\ntitle: \"Add Watermark to PDF\"\n---\n## Step 1\nDo X.\n{{< gist user id >}}";

/// Test the basic French scenario with an uppercasing translator
#[tokio::test]
async fn test_translateArticle_withUppercaseTranslator_shouldTranslateProseOnly() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    let task = common::create_task(root, "add-watermark.md", SIMPLE_ARTICLE, &["fr"])?;
    let translator = ArticleTranslator::new(UppercaseTranslator, common::test_pipeline_config(root));

    let results = translator.translate_article(&task, None).await?;

    assert_eq!(results.len(), 1);
    assert!(results[0].success);
    assert_eq!(results[0].attempts, 1);
    assert!(!results[0].fallback_used);

    let output = fs::read_to_string(common::output_path(root, "fr", "add-watermark.md"))?;
    let document = parse(&output)?;
    assert_eq!(FrontMatter::parse(&document.front_matter).get("title"), Some("ADD WATERMARK TO PDF"));
    assert!(output.contains("\n{{< gist user id >}}"));
    assert!(output.contains("## STEP 1\nDO X."));
    Ok(())
}

/// Test that the full article keeps code, URLs and keywords intact
#[tokio::test]
async fn test_translateArticle_withFullArticle_shouldRestoreProtectedSpans() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    let task = common::create_task(root, "add-watermark.md", WATERMARK_ARTICLE, &["de"])?;
    let translator = ArticleTranslator::new(UppercaseTranslator, common::test_pipeline_config(root));

    translator.translate_article(&task, None).await?;

    let output = fs::read_to_string(common::output_path(root, "de", "add-watermark.md"))?;
    assert!(output.contains("Watermark watermark = new Watermark(\"DRAFT\");"));
    assert!(output.contains("`Document`"));
    assert!(output.contains("https://example.com/out.pdf"));
    assert!(output.contains("keywords: [\"WATERMARK\", \"STAMP\"]"));
    assert!(output.contains("weight: 10"));

    let findings = StructuralValidator::new().validate(WATERMARK_ARTICLE, &output);
    assert!(passed(&findings), "unexpected errors: {:?}", findings);
    Ok(())
}

/// Test that regular failures fall through to the troubleshooting attempt
#[tokio::test]
async fn test_translateArticle_withThreeFailures_shouldSucceedOnTroubleshootAttempt() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    let task = common::create_task(root, "add-watermark.md", WATERMARK_ARTICLE, &["hy"])?;
    let translator = ArticleTranslator::new(TroubleshootOnlyTranslator::default(), common::test_pipeline_config(root));

    let results = translator.translate_article(&task, None).await?;

    assert!(results[0].success);
    assert_eq!(results[0].attempts, 4);
    assert!(results[0].fallback_used);
    assert_eq!(translator.translator().translate_calls.load(Ordering::SeqCst), 3);
    assert_eq!(translator.translator().troubleshoot_calls.load(Ordering::SeqCst), 1);
    assert!(translator.translator().previous_errors.lock().unwrap()[0].contains("overloaded"));

    let output = fs::read_to_string(common::output_path(root, "hy", "add-watermark.md"))?;
    let front = FrontMatter::parse(&parse(&output)?.front_matter);
    assert_eq!(front.get("title"), Some("ADD WATERMARK TO PDF"));
    assert_eq!(front.get("description"), Some("STAMP EVERY PAGE"));
    assert!(output.contains("## STEP 1"));
    assert!(output.contains("https://example.com/out.pdf"));
    Ok(())
}

/// Test that code and shortcode content never reaches the translator
#[tokio::test]
async fn test_translateArticle_withSpy_shouldNeverSendCodeOrShortcodes() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    let task = common::create_task(root, "add-watermark.md", WATERMARK_ARTICLE, &["fr", "ja"])?;
    let translator = ArticleTranslator::new(SpyTranslator::default(), common::test_pipeline_config(root));

    translator.translate_article(&task, None).await?;

    let payloads = translator.translator().payloads();
    assert!(!payloads.is_empty());
    for (kind, content) in &payloads {
        assert!(!content.contains("```"), "code sent as {:?}: {}", kind, content);
        assert!(!content.contains("new Watermark"), "code sent as {:?}: {}", kind, content);
        assert!(!content.contains("{{<"), "shortcode sent as {:?}: {}", kind, content);
        assert!(!content.contains("https://"), "URL sent as {:?}: {}", kind, content);
    }
    assert!(payloads.iter().any(|(kind, _)| *kind == ContentKind::Keywords));
    assert!(payloads.iter().any(|(kind, _)| *kind == ContentKind::List));
    Ok(())
}

/// Test that a failing language does not affect the others
#[tokio::test]
async fn test_translateArticle_withOneFailingLanguage_shouldKeepOthers() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    let task = common::create_task(root, "add-watermark.md", WATERMARK_ARTICLE, &["de", "fr", "xx"])?;
    let translator = ArticleTranslator::new(FailingLanguageTranslator::new(&["de"]), common::test_pipeline_config(root));

    let reported = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
    let sink = reported.clone();
    let callback: ProgressCallback = Box::new(move |result: &doctrans::TranslationResult| {
        sink.lock().unwrap().push(result.language.clone());
    });
    let results = translator.translate_article(&task, Some(callback)).await?;

    assert_eq!(*reported.lock().unwrap(), vec!["de", "fr", "xx"]);

    let de = &results[0];
    assert!(!de.success);
    assert_eq!(de.attempts, 4);
    assert!(de.failure_reason.as_deref().unwrap_or_default().contains("overloaded"));
    assert!(!common::output_path(root, "de", "add-watermark.md").exists());

    let fr = &results[1];
    assert!(fr.success);
    assert!(common::output_path(root, "fr", "add-watermark.md").exists());

    let xx = &results[2];
    assert!(!xx.success);
    assert_eq!(xx.attempts, 0);
    Ok(())
}

/// Test that a malformed source is a critical error while later articles still run
#[tokio::test]
async fn test_translateManifest_withMalformedSource_shouldRecordCriticalError() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    let broken = common::create_task(root, "broken.md", "## No front matter here", &["fr"])?;
    let good = common::create_task(root, "add-watermark.md", WATERMARK_ARTICLE, &["fr", "de"])?;
    let manifest = TaskManifest {
        total_articles: 2,
        total_tasks: 3,
        tasks: vec![broken, good],
        ..serde_json::from_str("{}")?
    };
    let translator = ArticleTranslator::new(FailingLanguageTranslator::new(&["de"]), common::test_pipeline_config(root));

    let report = translate_manifest(&translator, &manifest, false).await?;

    assert_eq!(report.summary.total_articles, 2);
    assert_eq!(report.summary.critical_errors, 1);
    assert!(report.critical_errors[0].message.contains("Malformed"));
    assert_eq!(report.summary.processed_articles, 1);
    assert_eq!(report.summary.successful_translations, 1);
    assert_eq!(report.summary.failed_translations, 1);
    assert_eq!(report.failed_translations[0].language, "de");
    assert_eq!(report.summary.success_rate, 50.0);
    assert!(report.has_critical_errors());
    Ok(())
}

/// Test the whole stack: orchestrator, client and mock provider
#[tokio::test]
async fn test_translateArticle_withClientOverMockProvider_shouldWriteTranslation() -> Result<()> {
    common::init_test_logging();
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    let task = common::create_task(root, "add-watermark.md", WATERMARK_ARTICLE, &["fr"])?;
    let provider = MockProvider::uppercase();
    let config = TranslationConfig {
        retry_delay_ms: 0,
        ..TranslationConfig::default()
    };
    let client = TranslationClient::new(provider.clone(), config, "en");
    let translator = ArticleTranslator::new(client, common::test_pipeline_config(root));

    let results = translator.translate_article(&task, None).await?;

    assert!(results[0].success);
    // title, description, keywords, heading, list
    assert_eq!(provider.request_count(), 5);
    for payload in provider.recorded_payloads() {
        assert!(!payload.contains("new Watermark"));
    }
    let output = fs::read_to_string(common::output_path(root, "fr", "add-watermark.md"))?;
    assert!(output.contains("title: \"ADD WATERMARK TO PDF\""));
    assert!(translator.translator().usage().total_tokens > 0);
    Ok(())
}
